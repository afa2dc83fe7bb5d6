//! Platform focus probers.
//!
//! Exactly one prober is selected at startup. Platforms without a prober, or
//! hosts where the native one cannot be initialised, get
//! [`UnsupportedFocusProber`], which never reports any focus.

#[cfg(target_os = "macos")]
mod macos;
mod unsupported;
#[cfg(target_os = "linux")]
mod x11;

#[cfg(target_os = "macos")]
pub use macos::MacFocusProber;
pub use unsupported::UnsupportedFocusProber;
#[cfg(target_os = "linux")]
pub use x11::X11FocusProber;

use switchcost_core::FocusProber;

#[cfg(target_os = "linux")]
pub fn detect() -> Box<dyn FocusProber> {
    match X11FocusProber::new() {
        Some(prober) => {
            tracing::info!("using X11 focus prober");
            Box::new(prober)
        }
        None => {
            tracing::warn!("X11 focus detection not available, no transitions will be recorded");
            Box::new(UnsupportedFocusProber)
        }
    }
}

#[cfg(target_os = "macos")]
pub fn detect() -> Box<dyn FocusProber> {
    tracing::info!("using NSWorkspace focus prober");
    Box::new(MacFocusProber)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn detect() -> Box<dyn FocusProber> {
    tracing::warn!(
        platform = std::env::consts::OS,
        "focus detection not supported on this platform, no transitions will be recorded"
    );
    Box::new(UnsupportedFocusProber)
}
