use std::{
    error::Error,
    fmt,
    io,
};

pub use ffmpeg_next as ffmpeg;

pub mod audio;
pub mod config;
pub mod cvid;
pub mod dimensions;
pub mod encoding;
pub mod error;
pub mod functions;
pub mod monoframe;
pub mod monovideo;
pub mod output;
pub mod packed;
pub mod run_length;
pub mod source;
pub mod threshold;
pub mod video;

pub use config::{
    Config,
    Settings,
};
pub use cvid::{
    ContainerHeader,
    CvidWriter,
};
pub use dimensions::{
    FrameSize,
    MAX_FRAME_SIZE,
    WidthMode,
    plan_frame_size,
};
pub use encoding::{
    Encoding,
    FrameEncoder,
};
pub use error::{
    CliError,
    ImplError,
};
pub use monoframe::MonoFrame;
pub use monovideo::MonoVideo;
pub use run_length::RunState;
pub use source::FrameSource;
pub use threshold::is_lit;
pub use video::VideoSource;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
pub type FormatResult = fmt::Result;
pub type IoError = io::Error;
pub type SerdeJsonError = serde_json::Error;
pub type FFmpegError = ffmpeg::Error;
