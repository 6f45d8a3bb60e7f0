use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to indicate a frame is requested
static FRAME_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Request that the host loop render another frame.
///
/// Raised by every effective signal write and by the animation scheduler while
/// timelines are running. Safe to call from any thread.
pub fn request_frame() {
    FRAME_REQUESTED.store(true, Ordering::Relaxed);
}

/// Check if a frame has been requested and clear the flag
pub fn take_frame_request() -> bool {
    FRAME_REQUESTED.swap(false, Ordering::Relaxed)
}
