use std::path::Path;

use tracing::debug;

use crate::{
    FrameSize,
    ImplError,
    MonoFrame,
    Result,
    ffmpeg,
    source::FrameSource,
};

/// Decodes the best video stream of a file into single channel frames, one at a time.
///
/// Frames come out at the source resolution until [`VideoSource::scale_to`] picks another size.
pub struct VideoSource
{
    input: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    monochromatic_ctx: ffmpeg::software::scaling::Context,
    stream_index: usize,
    reported_frames: u64,
    frame_rate: f64,
    frame_size: FrameSize,
    eof_sent: bool,
}

impl VideoSource
{
    pub fn open<P>(video_path: P) -> Result<VideoSource>
    where
        P: AsRef<Path>,
    {
        let video_path = video_path.as_ref();
        ffmpeg::init().map_err(|e| ImplError::FFmpeg("init", e))?;

        let input = ffmpeg::format::input(video_path)
            .map_err(|e| ImplError::OpenSource(video_path.to_owned(), e))?;

        let video_stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| ImplError::FetchVideoStream(video_path.to_owned()))?;

        let stream_index = video_stream.index();
        let frame_rate = stream_frame_rate(&video_stream);
        let reported_frames = stream_frame_count(&video_stream, frame_rate);

        let decoder = ffmpeg::codec::context::Context::from_parameters(video_stream.parameters())
            .map_err(|e| ImplError::FFmpeg("decoder parameters", e))?
            .decoder()
            .video()
            .map_err(|e| ImplError::FFmpeg("open decoder", e))?;

        let frame_size = source_frame_size(decoder.width(), decoder.height()).ok_or_else(|| {
            ImplError::SourceTooLarge(video_path.to_owned(), decoder.width(), decoder.height())
        })?;
        let monochromatic_ctx = monochromatic_context(&decoder, frame_size)?;

        debug!(
            "Opened {}: {} at {:.2} fps, {} frames reported",
            video_path.display(),
            frame_size,
            frame_rate,
            reported_frames
        );

        Ok(VideoSource {
            input,
            decoder,
            monochromatic_ctx,
            stream_index,
            reported_frames,
            frame_rate,
            frame_size,
            eof_sent: false,
        })
    }

    pub fn source_width(&self) -> u32
    {
        self.decoder.width()
    }

    pub fn source_height(&self) -> u32
    {
        self.decoder.height()
    }

    pub fn aspect_ratio(&self) -> f64
    {
        self.source_width() as f64 / self.source_height() as f64
    }

    /// Resizes every frame decoded from now on (bilinear) to `frame_size`.
    pub fn scale_to(
        &mut self,
        frame_size: FrameSize,
    ) -> Result<()>
    {
        self.monochromatic_ctx = monochromatic_context(&self.decoder, frame_size)?;
        self.frame_size = frame_size;
        Ok(())
    }

    fn convert(
        &mut self,
        decoded: &ffmpeg::util::frame::video::Video,
    ) -> Result<MonoFrame>
    {
        let mut mono_video = ffmpeg::util::frame::video::Video::empty();
        self.monochromatic_ctx
            .run(decoded, &mut mono_video)
            .map_err(|e| ImplError::FFmpeg("scale frame", e))?;

        let size = self.frame_size;
        if (mono_video.width(), mono_video.height()) != (size.width as u32, size.height as u32)
        {
            return Err(ImplError::ScaledSizeMismatch(
                size,
                mono_video.width(),
                mono_video.height(),
            )
            .into());
        }

        Ok(MonoFrame::from_strided(
            mono_video.data(0), // Single channel data
            mono_video.stride(0),
            size.width,
            size.height,
        ))
    }
}

impl FrameSource for VideoSource
{
    fn frame_size(&self) -> FrameSize
    {
        self.frame_size
    }

    fn frame_count(&self) -> u64
    {
        self.reported_frames
    }

    fn frame_rate(&self) -> f64
    {
        self.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<MonoFrame>>
    {
        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        loop
        {
            match received(self.decoder.receive_frame(&mut decoded), self.eof_sent)?
            {
                Received::Frame => return self.convert(&decoded).map(Some),
                Received::Drained => return Ok(None),
                Received::NeedsPacket => (),
            }

            let mut packet = ffmpeg::Packet::empty();
            match packet.read(&mut self.input)
            {
                Ok(()) =>
                {
                    if packet.stream() == self.stream_index
                    {
                        self.decoder
                            .send_packet(&packet)
                            .map_err(|e| ImplError::FFmpeg("decode packet", e))?;
                    }
                },
                Err(ffmpeg::Error::Eof) =>
                {
                    // Flush decoder (could be storing extra frames)
                    self.decoder.send_eof().map_err(|e| ImplError::FFmpeg("flush decoder", e))?;
                    self.eof_sent = true;
                },
                Err(e) => return Err(ImplError::FFmpeg("read packet", e).into()),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Received
{
    Frame,
    NeedsPacket,
    Drained,
}

/// Only `EAGAIN` before the flush asks for more input. Every other decoder error is fatal.
fn received(
    result: std::result::Result<(), ffmpeg::Error>,
    eof_sent: bool,
) -> Result<Received>
{
    match result
    {
        Ok(()) => Ok(Received::Frame),
        Err(ffmpeg::Error::Eof) => Ok(Received::Drained),
        Err(ffmpeg::Error::Other {
            errno,
        }) if errno == ffmpeg::error::EAGAIN && !eof_sent => Ok(Received::NeedsPacket),
        Err(e) => Err(ImplError::FFmpeg("decode frame", e).into()),
    }
}

/// Source dimensions as a [`FrameSize`], or `None` when a side does not fit in 16 bits.
fn source_frame_size(
    width: u32,
    height: u32,
) -> Option<FrameSize>
{
    Some(FrameSize::new(u16::try_from(width).ok()?, u16::try_from(height).ok()?))
}

fn monochromatic_context(
    decoder: &ffmpeg::decoder::Video,
    frame_size: FrameSize,
) -> Result<ffmpeg::software::scaling::Context>
{
    let ctx = ffmpeg::software::scaling::context::Context::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        ffmpeg::format::Pixel::GRAY8, // Single channel monochromatic
        frame_size.width as u32,
        frame_size.height as u32,
        ffmpeg::software::scaling::flag::Flags::BILINEAR,
    )
    .map_err(|e| ImplError::FFmpeg("create scaler", e))?;
    Ok(ctx)
}

fn stream_frame_rate(stream: &ffmpeg::format::stream::Stream) -> f64
{
    let rate = stream.avg_frame_rate();
    let rate = if rate.denominator() != 0 && rate.numerator() != 0 { rate } else { stream.rate() };
    if rate.denominator() == 0
    {
        return 0.0;
    }
    f64::from(rate)
}

/// Container-reported frame count, else an estimate from the stream duration, else 0.
fn stream_frame_count(
    stream: &ffmpeg::format::stream::Stream,
    frame_rate: f64,
) -> u64
{
    if stream.frames() > 0
    {
        return stream.frames() as u64;
    }
    let duration = stream.duration();
    if duration > 0 && frame_rate > 0.0
    {
        let seconds = duration as f64 * f64::from(stream.time_base());
        return (seconds * frame_rate).round() as u64;
    }
    0
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode_error(
        result: std::result::Result<(), ffmpeg::Error>,
        eof_sent: bool,
    ) -> String
    {
        received(result, eof_sent).err().unwrap().to_string()
    }

    #[test]
    fn decoder_again_reads_another_packet()
    {
        let again = Err(ffmpeg::Error::Other {
            errno: ffmpeg::error::EAGAIN,
        });
        assert_eq!(received(again, false).unwrap(), Received::NeedsPacket);
        assert_eq!(received(Ok(()), false).unwrap(), Received::Frame);
        assert_eq!(received(Err(ffmpeg::Error::Eof), true).unwrap(), Received::Drained);
    }

    #[test]
    fn decoder_errors_are_fatal()
    {
        let message = decode_error(Err(ffmpeg::Error::InvalidData), false);
        assert!(message.contains("decode frame"), "{}", message);

        // A drained decoder that still reports errors must not end the stream quietly
        assert!(received(Err(ffmpeg::Error::InvalidData), true).is_err());
        let again = Err(ffmpeg::Error::Other {
            errno: ffmpeg::error::EAGAIN,
        });
        assert!(received(again, true).is_err());
    }

    #[test]
    fn source_size_must_fit_in_16_bits()
    {
        assert_eq!(source_frame_size(1920, 1080), Some(FrameSize::new(1920, 1080)));
        assert_eq!(source_frame_size(70_000, 10), None);
        assert_eq!(source_frame_size(10, 65_536), None);
    }

    #[test]
    fn missing_file_fails_to_open()
    {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        let err = VideoSource::open(&missing).err().unwrap();
        let message = err.to_string();
        assert!(message.contains("missing.mp4"), "{}", message);
    }
}
