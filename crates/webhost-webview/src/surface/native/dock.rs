//! Dock and taskbar presence.
//!
//! macOS controls dock visibility per application through the activation
//! policy. Windows hides individual windows from the taskbar. Other
//! platforms have no equivalent.

use winit::window::Window;

use crate::error::SurfaceError;

#[cfg(target_os = "macos")]
use objc2_app_kit::NSApplicationActivationPolicy;

#[cfg(target_os = "macos")]
fn activation_policy(hide: bool) -> NSApplicationActivationPolicy {
    if hide {
        NSApplicationActivationPolicy::Accessory
    } else {
        NSApplicationActivationPolicy::Regular
    }
}

/// Apply `hide` to the running application and, where the platform
/// works per window, to `window`.
#[cfg(target_os = "macos")]
pub(super) fn apply(hide: bool, _window: Option<&Window>) -> Result<(), SurfaceError> {
    use objc2::MainThreadMarker;
    use objc2_app_kit::NSApplication;

    let mtm = MainThreadMarker::new().ok_or_else(|| {
        SurfaceError::Window("dock visibility must be changed on the main thread".into())
    })?;
    let app = NSApplication::sharedApplication(mtm);
    if !app.setActivationPolicy(activation_policy(hide)) {
        return Err(SurfaceError::Window("activation policy change was refused".into()));
    }
    Ok(())
}

#[cfg(target_os = "windows")]
pub(super) fn apply(hide: bool, window: Option<&Window>) -> Result<(), SurfaceError> {
    use winit::platform::windows::WindowExtWindows;

    if let Some(window) = window {
        window.set_skip_taskbar(hide);
    }
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub(super) fn apply(_hide: bool, _window: Option<&Window>) -> Result<(), SurfaceError> {
    Err(SurfaceError::Unsupported("hide_from_dock"))
}

#[cfg(all(test, target_os = "macos"))]
mod tests {
    use super::*;

    #[test]
    fn hiding_uses_accessory_policy() {
        assert_eq!(activation_policy(true), NSApplicationActivationPolicy::Accessory);
        assert_eq!(activation_policy(false), NSApplicationActivationPolicy::Regular);
    }
}
