use std::{
    fs,
    num::{
        NonZeroU16,
        NonZeroU32,
    },
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    CliError,
    Encoding,
    ImplError,
    Result,
    WidthMode,
    threshold::DEFAULT_LUMINANCE_CUTOFF,
};

pub const CONFIG_FILE_NAME: &str = "cvid_config.json";

/// `cvid_config.json`, as written by `cvid init`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config
{
    pub video_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub height: Option<NonZeroU16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<NonZeroU16>,
    #[serde(default)]
    pub width_mode: WidthMode,
    #[serde(default = "default_luminance_cutoff")]
    pub luminance_cutoff: u8,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default = "default_audio")]
    pub audio: bool,
    #[serde(default)]
    pub reject_oversize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_frame: Option<NonZeroU32>,
}

fn default_luminance_cutoff() -> u8
{
    DEFAULT_LUMINANCE_CUTOFF
}

fn default_audio() -> bool
{
    true
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            video_file: PathBuf::from("input.mp4"),
            output_file: None,
            height: NonZeroU16::new(60),
            width: None,
            width_mode: WidthMode::default(),
            luminance_cutoff: DEFAULT_LUMINANCE_CUTOFF,
            encoding: Encoding::default(),
            audio: true,
            reject_oversize: false,
            test_frame: NonZeroU32::new(1),
        }
    }
}

impl Config
{
    pub fn read_from(config_file: &Path) -> Result<Config>
    {
        let config_str = fs::read_to_string(config_file).map_err(CliError::ConfigRead)?;
        let config = serde_json::from_str(&config_str).map_err(CliError::ConfigParse)?;
        Ok(config)
    }

    /// Writes a default config into `dir`. An existing config is left alone; returns whether a
    /// file was written.
    pub fn write_default(dir: &Path) -> Result<bool>
    {
        let config_file = dir.join(CONFIG_FILE_NAME);
        if config_file.exists()
        {
            return Ok(false);
        }
        fs::create_dir_all(dir).map_err(|e| ImplError::CreateDirectory(dir.to_owned(), e))?;
        let config_str = serde_json::to_string_pretty(&Config::default())
            .map_err(ImplError::JsonPrettifier)?;
        fs::write(&config_file, config_str)
            .map_err(|e| ImplError::ConfigWrite(config_file.clone(), e))?;
        Ok(true)
    }

    /// Validates the config. Relative paths are resolved against `base_dir`.
    pub fn into_settings(
        self,
        base_dir: &Path,
    ) -> Result<Settings>
    {
        let requested_height = self.height.ok_or(CliError::MissingHeight)?.get();

        let video_file = base_dir.join(&self.video_file);
        let output_file = match &self.output_file
        {
            Some(output_file) => base_dir.join(output_file),
            None => video_file.with_extension("cvid"),
        };
        let audio_file = output_file.with_extension("wav");

        Ok(Settings {
            video_file,
            output_file,
            audio_file,
            requested_height,
            requested_width: self.width.map(NonZeroU16::get),
            width_mode: self.width_mode,
            luminance_cutoff: self.luminance_cutoff,
            encoding: self.encoding,
            audio: self.audio,
            reject_oversize: self.reject_oversize,
            test_frame: self.test_frame.map_or(0, |n| n.get() as usize - 1),
        })
    }
}

/// Everything one conversion needs, validated. Built once and only read afterwards.
#[derive(Clone, Debug)]
pub struct Settings
{
    pub video_file: PathBuf,
    pub output_file: PathBuf,
    pub audio_file: PathBuf,
    pub requested_height: u16,
    pub requested_width: Option<u16>,
    pub width_mode: WidthMode,
    pub luminance_cutoff: u8,
    pub encoding: Encoding,
    pub audio: bool,
    pub reject_oversize: bool,
    /// 0-based
    pub test_frame: usize,
}
