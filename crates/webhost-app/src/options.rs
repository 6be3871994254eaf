//! Turning loaded config and CLI overrides into host options.

use webhost_common::{Color, ConfigError};
use webhost_config::{HostConfig, SizeHintConfig};
use webhost_webview::{HostOptions, Rgba, SizeHint, WindowSize};

use crate::cli::Args;

pub fn host_options(config: &HostConfig) -> Result<HostOptions, ConfigError> {
    let window = &config.window;

    let color = Color::parse(&window.background).ok_or_else(|| {
        ConfigError::ValidationError(format!(
            "window.background: unrecognized color {:?}",
            window.background
        ))
    })?;
    let [r, g, b, a] = color.to_unit_rgba();

    let position = match (window.x, window.y) {
        (None, None) => None,
        (x, y) => Some((x.unwrap_or(0), y.unwrap_or(0))),
    };

    let size = WindowSize::new(window.width, window.height)
        .with_hint(size_hint(window.size_hint))
        .with_margin_top(window.margin_top);

    Ok(HostOptions {
        debug: config.debug,
        title: Some(window.title.clone()),
        position,
        size: Some(size),
        background: Some(Rgba::new(r, g, b, a)),
        url: config.content.url.clone(),
        init_scripts: config.content.init_scripts.clone(),
        visible: Some(window.visible),
        hide_from_dock: window.hide_from_dock,
    })
}

/// Command line flags win over the config file.
pub fn apply_args(options: &mut HostOptions, args: &Args) {
    if let Some(url) = &args.url {
        options.url = Some(url.clone());
    }
    if let Some(title) = &args.title {
        options.title = Some(title.clone());
    }
    if args.debug {
        options.debug = true;
    }
}

fn size_hint(hint: SizeHintConfig) -> SizeHint {
    match hint {
        SizeHintConfig::None => SizeHint::None,
        SizeHintConfig::Min => SizeHint::Min,
        SizeHintConfig::Max => SizeHint::Max,
        SizeHintConfig::Fixed => SizeHint::Fixed,
    }
}
