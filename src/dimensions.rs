use std::fmt::{
    Display,
    Formatter,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::FormatResult;

/// Largest frame the console player can show (240 columns, 63 rows of half-block characters).
pub const MAX_FRAME_SIZE: FrameSize = FrameSize::new(240, 126);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSize
{
    pub width: u16,
    pub height: u16,
}

impl FrameSize
{
    pub const fn new(
        width: u16,
        height: u16,
    ) -> FrameSize
    {
        FrameSize { width, height }
    }

    pub fn pixel_count(&self) -> usize
    {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool
    {
        self.width == 0 || self.height == 0
    }

    pub fn exceeds(
        &self,
        max: FrameSize,
    ) -> bool
    {
        self.width > max.width || self.height > max.height
    }
}

impl Display for FrameSize
{
    fn fmt(
        &self,
        f: &mut Formatter,
    ) -> FormatResult
    {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How an explicitly requested width is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthMode
{
    /// Use the requested width as given.
    #[default]
    Corrected,
    /// Ignore the requested width and leave the frame size at 0x0, as older converters did
    /// whenever a width was passed.
    Legacy,
}

/// Width follows the source aspect ratio unless one was requested (see [`WidthMode`]).
/// Oversize results are returned as-is; callers decide whether that is fatal.
pub fn plan_frame_size(
    aspect_ratio: f64,
    requested_height: u16,
    requested_width: Option<u16>,
    mode: WidthMode,
) -> FrameSize
{
    match (requested_width, mode)
    {
        (None, _) =>
        {
            // `as` saturates, so absurd aspect ratios clamp to u16::MAX instead of wrapping
            let width = (aspect_ratio * requested_height as f64).floor() as u16;
            FrameSize::new(width, requested_height)
        },
        (Some(_), WidthMode::Legacy) => FrameSize::default(),
        (Some(width), WidthMode::Corrected) => FrameSize::new(width, requested_height),
    }
}
