mod focus_tracker;

pub use focus_tracker::FocusTrackerActor;
