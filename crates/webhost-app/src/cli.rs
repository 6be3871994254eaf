use std::path::PathBuf;

use clap::Parser;

/// webhost: open a native window around a web page and expose Rust
/// functions to its script.
#[derive(Parser, Debug, Default)]
#[command(name = "webhost", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Page to load instead of the configured one.
    #[arg(long)]
    pub url: Option<String>,

    /// Window title override.
    #[arg(long)]
    pub title: Option<String>,

    /// Enable developer tools in the web view.
    #[arg(long)]
    pub debug: bool,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "webhost",
            "--config",
            "/tmp/webhost.toml",
            "--url",
            "https://example.com",
            "--debug",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/tmp/webhost.toml")));
        assert_eq!(args.url.as_deref(), Some("https://example.com"));
        assert!(args.debug);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.title.is_none());
    }

    #[test]
    fn no_arguments_is_valid() {
        let args = Args::try_parse_from(["webhost"]).unwrap();
        assert!(!args.debug);
        assert!(args.config.is_none());
    }
}
