use std::path::Path;

use image::{
    ImageBuffer,
    Luma,
};
use tracing::info;

use crate::{
    FrameSize,
    ImplError,
    Result,
    threshold::is_lit,
};

/// One grayscale frame, row-major, one intensity byte per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonoFrame
{
    pub data: Vec<u8>,
    pub width: u16,
    pub height: u16,
}

impl MonoFrame
{
    pub fn new(
        data: Vec<u8>,
        width: u16,
        height: u16,
    ) -> MonoFrame
    {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        MonoFrame {
            data,
            width,
            height,
        }
    }

    pub fn solid_color(
        width: u16,
        height: u16,
        color: u8,
    ) -> MonoFrame
    {
        MonoFrame {
            data: vec![color; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Copies a plane whose rows are `stride` bytes apart, dropping the row padding.
    pub fn from_strided(
        plane: &[u8],
        stride: usize,
        width: u16,
        height: u16,
    ) -> MonoFrame
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as usize
        {
            let row_start = y * stride;
            data.extend_from_slice(&plane[row_start..row_start + width as usize]);
        }
        MonoFrame::new(data, width, height)
    }

    pub fn size(&self) -> FrameSize
    {
        FrameSize::new(self.width, self.height)
    }

    #[inline]
    pub fn get(
        &self,
        x: usize,
        y: usize,
    ) -> u8
    {
        self.data[y * self.width as usize + x]
    }

    /// Renders the lit/unlit decision as white/black, for previews.
    pub fn threshold(
        &self,
        cutoff: u8,
    ) -> MonoFrame
    {
        let data = self.data.iter().map(|&px| if is_lit(px, cutoff) { 255 } else { 0 }).collect();
        MonoFrame::new(data, self.width, self.height)
    }

    pub fn save_as(
        &self,
        filename: &Path,
    ) -> Result<()>
    {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.data.clone())
                .ok_or(ImplError::ImageCreation)?;

        img.save(filename).map_err(|e| ImplError::ImageSaving(filename.to_owned(), e))?;
        info!("Saved PNG to {}", filename.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn strided_rows_drop_padding()
    {
        #[rustfmt::skip]
        let plane = [
            1, 2, 3, 0xAA,
            4, 5, 6, 0xAA,
        ];
        let frame = MonoFrame::from_strided(&plane, 4, 3, 2);
        assert_eq!(frame.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(frame.get(2, 1), 6);
        assert_eq!(frame.size(), FrameSize::new(3, 2));
    }

    #[test]
    fn threshold_maps_to_black_and_white()
    {
        let frame = MonoFrame::new(vec![0, 128, 129, 255], 2, 2);
        assert_eq!(frame.threshold(128).data, vec![0, 0, 255, 255]);
    }

    #[test]
    fn saves_png()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        MonoFrame::solid_color(4, 2, 200).save_as(&path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!((img.width(), img.height()), (4, 2));
        assert!(img.pixels().all(|px| px.0[0] == 200));
    }
}
