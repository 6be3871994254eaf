//! Geometry conversion between window sizes and wry rects.

use winit::dpi::LogicalSize;
use winit::window::{Window, WindowAttributes};

use crate::surface::{SizeHint, WindowSize};

/// Area the web view occupies inside a `width` x `height` window, below a
/// `margin_top` strip.
pub(super) fn content_rect(width: f64, height: f64, margin_top: u32) -> wry::Rect {
    let top = f64::from(margin_top).min(height.max(0.0));
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, top)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            width.max(0.0),
            (height - top).max(0.0),
        )),
    }
}

/// Bounds for the web view given the window's current inner size.
pub(super) fn window_content_rect(window: &Window, margin_top: u32) -> wry::Rect {
    let inner = window.inner_size().to_logical::<f64>(window.scale_factor());
    content_rect(inner.width, inner.height, margin_top)
}

/// Attributes for a window that does not exist yet.
pub(super) fn size_attributes(attrs: WindowAttributes, size: WindowSize) -> WindowAttributes {
    let logical = LogicalSize::new(size.width, size.height);
    let attrs = attrs.with_inner_size(logical);
    match size.hint {
        SizeHint::None => attrs.with_resizable(true),
        SizeHint::Min => attrs.with_min_inner_size(logical),
        SizeHint::Max => attrs.with_max_inner_size(logical),
        SizeHint::Fixed => attrs.with_resizable(false),
    }
}

/// Apply `size` to a live window. `Min` and `Max` only set the bound.
pub(super) fn apply_size(window: &Window, size: WindowSize) {
    let logical = LogicalSize::new(size.width, size.height);
    match size.hint {
        SizeHint::Min => window.set_min_inner_size(Some(logical)),
        SizeHint::Max => window.set_max_inner_size(Some(logical)),
        SizeHint::None | SizeHint::Fixed => {
            window.set_resizable(size.hint == SizeHint::None);
            let _ = window.request_inner_size(logical);
        }
    }
}
