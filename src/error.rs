use std::{
    error::Error,
    fmt::{
        Display,
        Formatter,
    },
    path::PathBuf,
};

use crate::{
    FFmpegError,
    FormatResult,
    FrameSize,
    IoError,
    MAX_FRAME_SIZE,
    SerdeJsonError,
};

#[derive(Debug)]
pub enum CliError
{
    NoCommand,
    UnknownCommand(String),
    ConfigNotFound(PathBuf),
    ConfigRead(IoError),
    ConfigParse(SerdeJsonError),
    AccessCurrentDirectory,
    MissingHeight,
    Oversize(FrameSize),
    EmptyFrameSize(FrameSize),
    InvalidTestFrame(usize, usize),
}

impl Error for CliError {}

impl Display for CliError
{
    fn fmt(
        &self,
        f: &mut Formatter,
    ) -> FormatResult
    {
        write!(f, "cvid: ")?;
        match self
        {
            Self::NoCommand => write!(f, "Type --help for usage"),
            Self::UnknownCommand(cmd) => write!(f, "Unknown command: '{}'", cmd),
            Self::ConfigNotFound(path) =>
            {
                write!(f, "Failed to find 'cvid_config.json' in directory: {}", path.display())
            },
            Self::ConfigParse(serde_err) =>
            {
                write!(f, "Failed to parse 'cvid_config.json': {}", serde_err)
            },
            Self::AccessCurrentDirectory => write!(f, "Could not access current directory"),
            Self::ConfigRead(io_err) =>
            {
                write!(f, "Failed to read 'cvid_config.json': {}", io_err)
            },
            Self::MissingHeight => write!(f, "'height' is required in 'cvid_config.json'"),
            Self::Oversize(size) =>
            {
                write!(f, "Video dimensions {} are too big! Max is {}", size, MAX_FRAME_SIZE)
            },
            Self::EmptyFrameSize(size) =>
            {
                write!(
                    f,
                    "Frame size {} is empty ('width' is ignored in legacy width mode)",
                    size
                )
            },
            Self::InvalidTestFrame(test_frame, frame_count) =>
            {
                write!(
                    f,
                    "Test frame {} is out of range of frame count: {}",
                    test_frame, frame_count
                )
            },
        }?;
        writeln!(f)
    }
}

#[derive(Debug)]
pub enum ImplError
{
    ImageCreation,
    ImageSaving(PathBuf, image::ImageError),
    FetchVideoStream(PathBuf),
    OpenSource(PathBuf, FFmpegError),
    FFmpeg(&'static str, FFmpegError),
    SourceTooLarge(PathBuf, u32, u32),
    ScaledSizeMismatch(FrameSize, u32, u32),
    FrameSizeMismatch(FrameSize, FrameSize),
    FrameDataLength(FrameSize, usize),
    WavTooLarge(usize),
    CreateFile(PathBuf, IoError),
    FileWrite(PathBuf, IoError),
    CreateDirectory(PathBuf, IoError),
    ConfigWrite(PathBuf, IoError),
    JsonPrettifier(SerdeJsonError),
}

impl Error for ImplError {}

impl Display for ImplError
{
    fn fmt(
        &self,
        f: &mut Formatter,
    ) -> FormatResult
    {
        write!(f, "cvid: ")?;
        match self
        {
            Self::ImageCreation => write!(f, "Somehow failed to create image"),
            Self::ImageSaving(path, e) =>
            {
                write!(f, "Failed to save image {}: {}", path.display(), e)
            },
            Self::FetchVideoStream(path) =>
            {
                write!(f, "No video stream found in {}", path.display())
            },
            Self::OpenSource(path, e) => write!(f, "Failed to open {}: {}", path.display(), e),
            Self::FFmpeg(operation, e) =>
            {
                write!(f, "Failed during video processing ({}): {}", operation, e)
            },
            Self::SourceTooLarge(path, width, height) =>
            {
                write!(f, "Video {} is {}x{}, too large to scale", path.display(), width, height)
            },
            Self::ScaledSizeMismatch(expected, width, height) =>
            {
                write!(f, "Scaled frame is {}x{} but {} was requested", width, height, expected)
            },
            Self::FrameDataLength(size, len) =>
            {
                write!(
                    f,
                    "Frame of size {} carries {} pixels instead of {}",
                    size,
                    len,
                    size.pixel_count()
                )
            },
            Self::WavTooLarge(len) =>
            {
                write!(f, "{} bytes of audio do not fit in a wav file", len)
            },
            Self::FrameSizeMismatch(expected, actual) =>
            {
                write!(f, "Decoded frame is {} but the stream was planned at {}", actual, expected)
            },
            Self::CreateFile(path, e) =>
            {
                write!(f, "Failed to create {}: {}", path.display(), e)
            },
            Self::FileWrite(path, e) => write!(f, "Failed to write {}: {}", path.display(), e),
            Self::CreateDirectory(path, e) =>
            {
                write!(f, "Failed to create directory {}: {}", path.display(), e)
            },
            Self::ConfigWrite(path, e) =>
            {
                write!(f, "Failed to write config {}: {}", path.display(), e)
            },
            Self::JsonPrettifier(e) =>
            {
                write!(f, "Somehow failed to prettify the config JSON: {}", e)
            },
        }?;
        writeln!(f)
    }
}
