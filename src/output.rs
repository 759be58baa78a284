use std::{
    fs::{
        self,
        File,
    },
    io::{
        BufWriter,
        Seek,
        Write,
    },
    path::Path,
    time::Instant,
};

use tracing::{
    debug,
    info,
    warn,
};

use crate::{
    CliError,
    ContainerHeader,
    CvidWriter,
    Encoding,
    FrameEncoder,
    FrameSize,
    ImplError,
    MAX_FRAME_SIZE,
    MonoFrame,
    Result,
    Settings,
    VideoSource,
    audio,
    cvid::HEADER_LEN,
    functions::{
        format_bytes,
        format_duration,
    },
    plan_frame_size,
    source::FrameSource,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionSummary
{
    pub frame_size: FrameSize,
    pub frames_encoded: u64,
    pub payload_len: u64,
}

impl ConversionSummary
{
    pub fn file_len(&self) -> u64
    {
        HEADER_LEN as u64 + self.payload_len
    }
}

/// Plans the frame size for a source of `aspect_ratio` and applies the size limits.
pub fn plan_checked(
    settings: &Settings,
    aspect_ratio: f64,
) -> Result<FrameSize>
{
    let frame_size = plan_frame_size(
        aspect_ratio,
        settings.requested_height,
        settings.requested_width,
        settings.width_mode,
    );

    if frame_size.exceeds(MAX_FRAME_SIZE)
    {
        if settings.reject_oversize
        {
            return Err(CliError::Oversize(frame_size).into());
        }
        warn!("Video dimensions {} are too big! Max is {}", frame_size, MAX_FRAME_SIZE);
    }
    if frame_size.is_empty()
    {
        return Err(CliError::EmptyFrameSize(frame_size).into());
    }
    Ok(frame_size)
}

/// Writes a whole CVID stream: header from the source's metadata, then every frame it yields.
///
/// `output_path` only labels I/O errors.
pub fn encode_stream<S, W>(
    source: &mut S,
    encoding: Encoding,
    cutoff: u8,
    output: W,
    output_path: &Path,
) -> Result<(W, ConversionSummary)>
where
    S: FrameSource,
    W: Write + Seek,
{
    let frame_size = source.frame_size();
    let header = ContainerHeader::new(frame_size, source.frame_count(), source.frame_rate());
    let mut writer = CvidWriter::new(output, header, encoding, cutoff)
        .map_err(|e| ImplError::FileWrite(output_path.to_owned(), e))?;

    while let Some(frame) = source.next_frame()?
    {
        if frame.size() != frame_size
        {
            return Err(ImplError::FrameSizeMismatch(frame_size, frame.size()).into());
        }
        if frame.data.len() != frame_size.pixel_count()
        {
            return Err(ImplError::FrameDataLength(frame_size, frame.data.len()).into());
        }
        writer.write_frame(&frame).map_err(|e| ImplError::FileWrite(output_path.to_owned(), e))?;
        debug!("Processed {} frames of {}", writer.frames_written(), writer.header().frame_count);
    }

    let summary = ConversionSummary {
        frame_size,
        frames_encoded: writer.frames_written(),
        payload_len: writer.payload_len(),
    };
    let output = writer.finish().map_err(|e| ImplError::FileWrite(output_path.to_owned(), e))?;
    Ok((output, summary))
}

pub fn convert_from_settings(settings: &Settings) -> Result<ConversionSummary>
{
    let start = Instant::now();

    let mut source = VideoSource::open(&settings.video_file)?;
    let frame_size = plan_checked(settings, source.aspect_ratio())?;
    source.scale_to(frame_size)?;
    info!(
        "Converting {} ({}x{}) to {} as {}",
        settings.video_file.display(),
        source.source_width(),
        source.source_height(),
        frame_size,
        settings.encoding
    );

    let audio_written =
        settings.audio && audio::export_wav(&settings.video_file, &settings.audio_file)?;
    let summary = write_cvid_file(&mut source, settings, audio_written)?;

    info!(
        "Encoded {} frames ({}) to {} in {}",
        summary.frames_encoded,
        format_bytes(summary.file_len()),
        settings.output_file.display(),
        format_duration(start.elapsed().as_millis())
    );
    Ok(summary)
}

/// Encodes `source` into the configured output file.
///
/// On failure the partial output is removed, along with the audio file when `audio_written`.
pub fn write_cvid_file<S>(
    source: &mut S,
    settings: &Settings,
    audio_written: bool,
) -> Result<ConversionSummary>
where
    S: FrameSource,
{
    let output_dir = settings.output_file.parent().unwrap_or(Path::new(""));
    fs::create_dir_all(output_dir)
        .map_err(|e| ImplError::CreateDirectory(output_dir.to_owned(), e))?;
    let file = File::create(&settings.output_file)
        .map_err(|e| ImplError::CreateFile(settings.output_file.clone(), e))?;

    let encoded = encode_stream(
        source,
        settings.encoding,
        settings.luminance_cutoff,
        BufWriter::new(file),
        &settings.output_file,
    );
    match encoded
    {
        Ok((_, summary)) => Ok(summary),
        Err(e) =>
        {
            remove_partial(&settings.output_file);
            if audio_written
            {
                remove_partial(&settings.audio_file);
            }
            Err(e)
        },
    }
}

fn remove_partial(path: &Path)
{
    match fs::remove_file(path)
    {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
    }
}

/// Bytes `frame` takes on its own in `encoding`, counting the trailing run of a run-length
/// stream.
pub fn encoded_frame_len(
    frame: &MonoFrame,
    encoding: Encoding,
    cutoff: u8,
) -> usize
{
    let mut encoder = FrameEncoder::new(encoding);
    let mut buffer = Vec::new();
    encoder.encode_frame(frame, cutoff, &mut buffer);
    encoder.finish(&mut buffer);
    buffer.len()
}

/// Saves the configured test frame as decoded and as thresholded, next to the output file.
pub fn test_from_settings(settings: &Settings) -> Result<()>
{
    let mut source = VideoSource::open(&settings.video_file)?;
    let frame_size = plan_checked(settings, source.aspect_ratio())?;
    source.scale_to(frame_size)?;

    let mut frames_seen = 0;
    let target_frame = loop
    {
        match source.next_frame()?
        {
            Some(frame) if frames_seen == settings.test_frame => break frame,
            Some(_) => frames_seen += 1,
            None =>
            {
                return Err(
                    CliError::InvalidTestFrame(settings.test_frame + 1, frames_seen).into()
                );
            },
        }
    };

    let output_dir = settings.output_file.parent().unwrap_or(Path::new(""));
    fs::create_dir_all(output_dir)
        .map_err(|e| ImplError::CreateDirectory(output_dir.to_owned(), e))?;

    let frame_number = settings.test_frame + 1;
    target_frame.save_as(&output_dir.join(format!("test_frame_{}.png", frame_number)))?;
    target_frame
        .threshold(settings.luminance_cutoff)
        .save_as(&output_dir.join(format!("thresholded_test_frame_{}.png", frame_number)))?;

    info!(
        "Frame {} at {} encodes to {} as {}",
        frame_number,
        frame_size,
        format_bytes(
            encoded_frame_len(&target_frame, settings.encoding, settings.luminance_cutoff) as u64
        ),
        settings.encoding
    );
    Ok(())
}
