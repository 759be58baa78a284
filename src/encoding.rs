use std::fmt::{
    Display,
    Formatter,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    FormatResult,
    MonoFrame,
    RunState,
    packed,
};

/// Payload encoding for a whole CVID file. A file never mixes the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding
{
    /// 1 bit per pixel, row-major, byte-aligned per frame.
    Packed,
    /// Alternating run lengths over row pairs, continuous across frames.
    #[default]
    RunLength,
}

impl Display for Encoding
{
    fn fmt(
        &self,
        f: &mut Formatter,
    ) -> FormatResult
    {
        match self
        {
            Self::Packed => write!(f, "packed"),
            Self::RunLength => write!(f, "run_length"),
        }
    }
}

/// Per-stream encoder state for the chosen [`Encoding`].
#[derive(Debug)]
pub enum FrameEncoder
{
    Packed,
    RunLength(RunState),
}

impl FrameEncoder
{
    pub fn new(encoding: Encoding) -> FrameEncoder
    {
        match encoding
        {
            Encoding::Packed => FrameEncoder::Packed,
            Encoding::RunLength => FrameEncoder::RunLength(RunState::new()),
        }
    }

    pub fn encode_frame(
        &mut self,
        frame: &MonoFrame,
        cutoff: u8,
        out: &mut Vec<u8>,
    )
    {
        match self
        {
            FrameEncoder::Packed => packed::pack_frame(frame, cutoff, out),
            FrameEncoder::RunLength(state) => state.encode_frame(frame, cutoff, out),
        }
    }

    pub fn finish(
        self,
        out: &mut Vec<u8>,
    )
    {
        match self
        {
            // frames are already byte-aligned
            FrameEncoder::Packed => {},
            FrameEncoder::RunLength(state) => state.finish(out),
        }
    }
}
