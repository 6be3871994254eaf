mod bindings;
mod cli;
mod demo;
mod options;

use std::process::ExitCode;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use webhost_common::WebhostError;
use webhost_webview::{WebviewHost, WrySurface};

const DEFAULT_LOG_DIRECTIVE: &str = "webhost=info";

fn main() -> ExitCode {
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_DIRECTIVE);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("webhost v{} starting...", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cli::Args) -> Result<(), WebhostError> {
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = webhost_config::load_config(args.config.as_deref())?;

    let mut options = options::host_options(&config)?;
    options::apply_args(&mut options, args);
    if options.url.is_none() {
        options.url = Some(demo::demo_page_url());
    }

    let host = WebviewHost::<WrySurface>::with_options(&options).map_err(webview_error)?;
    bindings::install(&host).map_err(webview_error)?;

    tracing::info!("Entering event loop");
    host.run().map_err(webview_error)?;
    host.destroy().map_err(webview_error)
}

fn webview_error(e: webhost_webview::HostError) -> WebhostError {
    WebhostError::WebView(e.to_string())
}
