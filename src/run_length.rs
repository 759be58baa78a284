//! Run-length encoding: alternating run lengths of unlit and lit pixels, one byte per run.
//!
//! Pixels are visited two rows at a time, column by column: `(c0, r)`, `(c0, r + 1)`,
//! `(c1, r)`, `(c1, r + 1)`, ... Runs carry over from one frame into the next, and the stream
//! always opens with an unlit run, which may be empty.
//!
//! A run that reaches 255 is cut by flipping the polarity and emitting it, exactly as if the
//! pixel value had changed. Decoders cannot tell a cap cut from a real change, so a maximal run
//! of 300 unlit pixels comes out as `255, 0, 45`, not as one long run. This is kept for
//! compatibility with existing players.

use crate::{
    MonoFrame,
    threshold::is_lit,
};

pub const MAX_RUN_LENGTH: u8 = u8::MAX;

/// Run state for a whole stream. Not reset between frames.
#[derive(Debug, Default)]
pub struct RunState
{
    polarity: bool,
    run_length: u8,
}

impl RunState
{
    pub fn new() -> RunState
    {
        RunState::default()
    }

    pub fn polarity(&self) -> bool
    {
        self.polarity
    }

    pub fn run_length(&self) -> u8
    {
        self.run_length
    }

    pub fn push(
        &mut self,
        lit: bool,
        out: &mut Vec<u8>,
    )
    {
        // Checked before looking at the pixel, so a saturated run is cut even when the next
        // pixel would have continued it.
        if self.run_length >= MAX_RUN_LENGTH
        {
            self.polarity = !self.polarity;
            out.push(self.run_length);
            self.run_length = 0;
        }

        if lit != self.polarity
        {
            self.polarity = !self.polarity;
            out.push(self.run_length);
            self.run_length = 1;
        }
        else
        {
            self.run_length += 1;
        }
    }

    pub fn encode_frame(
        &mut self,
        frame: &MonoFrame,
        cutoff: u8,
        out: &mut Vec<u8>,
    )
    {
        for (x, y) in row_pair_order(frame.width, frame.height)
        {
            self.push(is_lit(frame.get(x, y), cutoff), out);
        }
    }

    /// Emits the trailing run. Call once, after the last frame.
    pub fn finish(
        self,
        out: &mut Vec<u8>,
    )
    {
        out.push(self.run_length);
    }
}

/// Pixel coordinates `(x, y)` in row-pair interleaved order. A lone last row is visited alone.
pub fn row_pair_order(
    width: u16,
    height: u16,
) -> impl Iterator<Item = (usize, usize)>
{
    let (width, height) = (width as usize, height as usize);
    (0..height).step_by(2).flat_map(move |row| {
        (0..width).flat_map(move |col| (row..(row + 2).min(height)).map(move |y| (col, y)))
    })
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    fn encode_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8>
    {
        let mut state = RunState::new();
        let mut out = vec![];
        for lit in bits
        {
            state.push(lit, &mut out);
        }
        state.finish(&mut out);
        out
    }

    #[test]
    fn row_pairs_interleave_by_column()
    {
        let order: Vec<_> = row_pair_order(2, 3).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn row_pair_order_covers_every_pixel_once()
    {
        for (width, height) in [(1, 1), (5, 4), (7, 5), (240, 126), (3, 0)]
        {
            let mut seen: Vec<_> = row_pair_order(width, height).collect();
            assert_eq!(seen.len(), width as usize * height as usize);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), width as usize * height as usize);
        }
    }

    #[test]
    fn unlit_frame_is_one_run()
    {
        let mut state = RunState::new();
        let mut out = vec![];
        state.encode_frame(&MonoFrame::solid_color(2, 2, 0), 128, &mut out);
        assert!(out.is_empty());
        state.finish(&mut out);
        assert_eq!(out, vec![0x04]);
    }

    #[test]
    fn lit_start_opens_with_empty_unlit_run()
    {
        assert_eq!(encode_bits([true, true, false]), vec![0, 2, 1]);
    }

    #[test]
    fn runs_alternate_on_change()
    {
        assert_eq!(encode_bits([false, false, true, false, false, false]), vec![2, 1, 3]);
    }

    #[test]
    fn frame_uses_row_pair_order()
    {
        // Row 0 lit, row 1 unlit: the interleaved walk sees lit, unlit, lit, unlit, ...
        #[rustfmt::skip]
        let frame = MonoFrame::new(vec![
            255, 255, 255,
            0,   0,   0,
        ], 3, 2);
        let mut state = RunState::new();
        let mut out = vec![];
        state.encode_frame(&frame, 128, &mut out);
        state.finish(&mut out);
        assert_eq!(out, vec![0, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn state_carries_across_frames()
    {
        let mut state = RunState::new();
        let mut out = vec![];
        state.encode_frame(&MonoFrame::solid_color(2, 1, 0), 128, &mut out);
        state.encode_frame(&MonoFrame::solid_color(2, 1, 0), 128, &mut out);
        assert!(out.is_empty());
        assert!(!state.polarity());
        assert_eq!(state.run_length(), 4);
        state.finish(&mut out);
        assert_eq!(out, vec![4]);
    }

    #[test]
    fn saturated_run_then_opposite_pixel()
    {
        // The cap cut flips to lit, so the lit pixel continues the new run
        let bits = std::iter::repeat_n(false, 255).chain([true]);
        assert_eq!(encode_bits(bits), vec![0xFF, 0x01]);
    }

    #[test]
    fn saturated_run_then_same_pixel()
    {
        // The cap cut flips to lit, the unlit pixel flips back and emits an empty lit run
        let bits = std::iter::repeat_n(false, 256);
        assert_eq!(encode_bits(bits), vec![0xFF, 0x00, 0x01]);
    }

    #[test]
    fn exactly_255_is_not_cut_until_next_pixel()
    {
        let bits = std::iter::repeat_n(false, 255);
        assert_eq!(encode_bits(bits), vec![0xFF]);
    }

    #[test]
    fn cap_cut_flips_polarity()
    {
        let mut state = RunState::new();
        let mut out = vec![];
        for _ in 0..255
        {
            state.push(false, &mut out);
        }
        assert!(!state.polarity());

        state.push(true, &mut out);
        assert_eq!(out, vec![0xFF]);
        assert!(state.polarity());
        assert_eq!(state.run_length(), 1);
    }

    #[test]
    fn long_lit_run_is_split_at_cap()
    {
        let bits = std::iter::repeat_n(true, 300);
        assert_eq!(encode_bits(bits), vec![0, 255, 0, 45]);
    }
}
