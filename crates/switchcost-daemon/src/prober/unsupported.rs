use switchcost_core::FocusProber;

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedFocusProber;

impl FocusProber for UnsupportedFocusProber {
    fn current_focus(&self) -> String {
        String::new()
    }
}
