//! Packed encoding: one bit per pixel, row-major, most significant bit first.
//!
//! Every frame starts on a fresh byte. A frame whose pixel count is not a multiple of 8 ends with
//! a partial byte whose unused low bits are zero, so a frame always takes
//! `ceil(width * height / 8)` bytes.
//!
//! Exactly one shift per pixel: an 8x1 lit row packs to `0xFF`, a 3x1 lit row to `0xE0`.

use crate::{
    MonoFrame,
    threshold::is_lit,
};

#[derive(Debug, Default)]
pub struct ByteAccumulator
{
    partial: u8,
    bits: u8,
}

impl ByteAccumulator
{
    pub fn new() -> ByteAccumulator
    {
        ByteAccumulator::default()
    }

    #[inline]
    pub fn push(
        &mut self,
        lit: bool,
        out: &mut Vec<u8>,
    )
    {
        self.partial = (self.partial << 1) | lit as u8;
        self.bits += 1;
        if self.bits == 8
        {
            out.push(self.partial);
            self.partial = 0;
            self.bits = 0;
        }
    }

    /// Left-aligns and emits a partial byte, if any.
    pub fn flush(
        &mut self,
        out: &mut Vec<u8>,
    )
    {
        if self.bits > 0
        {
            out.push(self.partial << (8 - self.bits));
            self.partial = 0;
            self.bits = 0;
        }
    }
}

pub fn packed_frame_len(pixel_count: usize) -> usize
{
    pixel_count.div_ceil(8)
}

pub fn pack_frame(
    frame: &MonoFrame,
    cutoff: u8,
    out: &mut Vec<u8>,
)
{
    out.reserve(packed_frame_len(frame.data.len()));

    let mut acc = ByteAccumulator::new();
    for &px in &frame.data
    {
        acc.push(is_lit(px, cutoff), out);
    }
    acc.flush(out);
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    fn pack(frame: &MonoFrame) -> Vec<u8>
    {
        let mut out = vec![];
        pack_frame(frame, 128, &mut out);
        out
    }

    #[test]
    fn full_byte_of_lit_and_unlit()
    {
        assert_eq!(pack(&MonoFrame::solid_color(8, 1, 255)), vec![0xFF]);
        assert_eq!(pack(&MonoFrame::solid_color(8, 1, 0)), vec![0x00]);
    }

    #[test]
    fn partial_byte_is_left_aligned()
    {
        assert_eq!(pack(&MonoFrame::solid_color(3, 1, 255)), vec![0b1110_0000]);
    }

    #[test]
    fn bits_are_msb_first_row_major()
    {
        // 5x2: first row lit, unlit, lit, unlit, lit; second row all lit
        let frame = MonoFrame::new(vec![200, 0, 200, 0, 200, 255, 255, 255, 255, 255], 5, 2);
        assert_eq!(pack(&frame), vec![0b1010_1111, 0b1100_0000]);
    }

    #[test]
    fn cutoff_pixel_is_unlit()
    {
        let frame = MonoFrame::new(vec![128, 129, 128, 129, 128, 129, 128, 129], 8, 1);
        assert_eq!(pack(&frame), vec![0b0101_0101]);
    }

    #[test]
    fn frames_start_on_byte_boundary()
    {
        let frame = MonoFrame::solid_color(3, 3, 255);
        let mut out = vec![];
        pack_frame(&frame, 128, &mut out);
        pack_frame(&frame, 128, &mut out);
        assert_eq!(out, vec![0xFF, 0x80, 0xFF, 0x80]);
    }

    #[test]
    fn frame_len_rounds_up()
    {
        assert_eq!(packed_frame_len(0), 0);
        assert_eq!(packed_frame_len(8), 1);
        assert_eq!(packed_frame_len(9), 2);
        assert_eq!(packed_frame_len(240 * 126), 3780);
    }
}
