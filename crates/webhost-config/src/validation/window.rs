use webhost_common::Color;

use super::helpers::validate_range;
use crate::schema::HostConfig;

pub(super) fn validate_window(errors: &mut Vec<String>, config: &HostConfig) {
    let window = &config.window;

    validate_range(errors, "window.width", window.width, 1, 16384);
    validate_range(errors, "window.height", window.height, 1, 16384);
    validate_range(errors, "window.margin_top", window.margin_top, 0, 512);

    if window.margin_top >= window.height && window.height > 0 {
        errors.push(format!(
            "window.margin_top = {} leaves no room for content (height = {})",
            window.margin_top, window.height
        ));
    }

    if Color::parse(&window.background).is_none() {
        errors.push(format!(
            "window.background = {:?} is not a valid color",
            window.background
        ));
    }
}
