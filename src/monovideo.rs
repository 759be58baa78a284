use crate::{
    FrameSize,
    MonoFrame,
    Result,
    source::FrameSource,
};

/// Frames held back to back in one buffer.
pub struct MonoVideo
{
    pub data: Vec<u8>,
    pub width: u16,
    pub height: u16,
    pub frame_rate: f64,
    cursor: usize,
}

impl MonoVideo
{
    pub fn new(
        data: Vec<u8>,
        width: u16,
        height: u16,
        frame_rate: f64,
    ) -> MonoVideo
    {
        MonoVideo {
            data,
            width,
            height,
            frame_rate,
            cursor: 0,
        }
    }

    pub fn from_frames(
        frames: &[MonoFrame],
        frame_rate: f64,
    ) -> MonoVideo
    {
        let (width, height) = frames.first().map_or((0, 0), |f| (f.width, f.height));
        let data = frames.iter().flat_map(|f| f.data.iter().copied()).collect();
        MonoVideo::new(data, width, height, frame_rate)
    }

    pub fn len(&self) -> usize
    {
        match self.frame_len()
        {
            0 => 0,
            size => self.data.len() / size,
        }
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    pub fn get_frame(
        &self,
        index: usize,
    ) -> Option<&[u8]>
    {
        let start = index * self.frame_len();
        let end = start + self.frame_len();
        self.data.get(start..end)
    }

    fn frame_len(&self) -> usize
    {
        self.width as usize * self.height as usize
    }
}

impl FrameSource for MonoVideo
{
    fn frame_size(&self) -> FrameSize
    {
        FrameSize::new(self.width, self.height)
    }

    fn frame_count(&self) -> u64
    {
        self.len() as u64
    }

    fn frame_rate(&self) -> f64
    {
        self.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<MonoFrame>>
    {
        if self.cursor >= self.len()
        {
            return Ok(None);
        }
        let frame = self
            .get_frame(self.cursor)
            .map(|data| MonoFrame::new(data.to_vec(), self.width, self.height));
        self.cursor += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn yields_frames_in_order_then_ends()
    {
        let frames = [MonoFrame::solid_color(2, 1, 1), MonoFrame::solid_color(2, 1, 2)];
        let mut video = MonoVideo::from_frames(&frames, 24.0);
        assert_eq!(video.len(), 2);
        assert_eq!(video.frame_size(), FrameSize::new(2, 1));

        assert_eq!(video.next_frame().unwrap(), Some(frames[0].clone()));
        assert_eq!(video.next_frame().unwrap(), Some(frames[1].clone()));
        assert_eq!(video.next_frame().unwrap(), None);
        assert_eq!(video.next_frame().unwrap(), None);
    }

    #[test]
    fn empty_video_has_no_frames()
    {
        let mut video = MonoVideo::from_frames(&[], 24.0);
        assert!(video.is_empty());
        assert_eq!(video.next_frame().unwrap(), None);
    }
}
