use crate::{
    FrameSize,
    MonoFrame,
    Result,
};

/// A sequence of grayscale frames, all of [`FrameSource::frame_size`].
pub trait FrameSource
{
    fn frame_size(&self) -> FrameSize;

    /// Frame count as reported up front. May be an estimate, or 0 when unknown.
    fn frame_count(&self) -> u64;

    fn frame_rate(&self) -> f64;

    /// `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<MonoFrame>>;
}
