use objc2::rc::autoreleasepool;
use objc2_app_kit::NSWorkspace;
use switchcost_core::FocusProber;

/// Reads the localized name of the frontmost application.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacFocusProber;

impl FocusProber for MacFocusProber {
    fn current_focus(&self) -> String {
        autoreleasepool(|_| unsafe {
            let workspace = NSWorkspace::sharedWorkspace();
            workspace
                .frontmostApplication()
                .and_then(|application| application.localizedName())
                .map(|name| name.to_string())
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires a logged-in macOS session
    fn reports_frontmost_application() {
        let name = MacFocusProber.current_focus();
        println!("frontmost application: {:?}", name);
    }
}
