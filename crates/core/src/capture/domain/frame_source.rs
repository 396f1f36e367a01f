use crate::shared::frame::Frame;

/// Delivers camera frames in capture order.
///
/// Implementations own pacing: `next_frame` may block until the next frame
/// is due. Returns `None` when the feed ends.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Frame>;
}
