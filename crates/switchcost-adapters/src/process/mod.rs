mod liveness_marker;

pub use liveness_marker::{is_process_alive, read_pid, terminate, LivenessError, LivenessMarker};
