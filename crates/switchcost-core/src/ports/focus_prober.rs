/// Reads the identifier of the application currently holding input focus.
///
/// Implementations must answer quickly and never fail: when nothing has
/// focus, or the platform cannot tell, they return an empty string.
pub trait FocusProber: Send {
    fn current_focus(&self) -> String;
}
