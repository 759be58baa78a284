use std::{
    fmt::{
        Display,
        Formatter,
    },
    path::{
        Path,
        PathBuf,
    },
};

use tracing::info;
use video_to_cvid::{
    CliError,
    Config,
    FormatResult,
    Result,
    config::CONFIG_FILE_NAME,
    functions::get_path_or_curr_dir,
    output,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Command
{
    Init,
    Run,
    Test,
    Help,
}

impl Command
{
    const HELP: &'static str = "help";
    const INIT: &'static str = "init";
    const RUN: &'static str = "run";
    const TEST: &'static str = "test";

    pub const USAGE: &'static str = "\
Usage: cvid <command> [directory]

Commands:
  init, -i, --init    Write a default 'cvid_config.json' into the directory
  run,  -r, --run     Convert the configured video to a .cvid file (and .wav audio)
  test, -t, --test    Save the configured test frame as PNGs, raw and thresholded
  help, -h, --help    Show this message

The directory defaults to the current directory.";

    pub fn name(&self) -> &'static str
    {
        match self
        {
            Self::Init => Self::INIT,
            Self::Run => Self::RUN,
            Self::Test => Self::TEST,
            Self::Help => Self::HELP,
        }
    }

    pub fn from_name(name: &str) -> Option<Self>
    {
        [Self::Init, Self::Run, Self::Test, Self::Help].into_iter().find(|cmd| {
            name == cmd.name() || name == cmd.alias_short() || name == cmd.alias_long()
        })
    }

    fn alias_short(&self) -> String
    {
        format!("-{}", &self.name()[..1])
    }

    fn alias_long(&self) -> String
    {
        format!("--{}", self.name())
    }

    pub fn execute(
        self,
        mut args: impl Iterator<Item = String>,
    ) -> Result<()>
    {
        let dir = get_path_or_curr_dir(args.next().map(PathBuf::from))?;
        match self
        {
            Self::Init => Self::execute_init(dir),
            Self::Run => Self::execute_run(dir),
            Self::Test => Self::execute_test(dir),
            Self::Help =>
            {
                println!("{}", Self::USAGE);
                Ok(())
            },
        }
    }

    fn execute_init(dir: PathBuf) -> Result<()>
    {
        if Config::write_default(&dir)?
        {
            info!("Wrote {}", dir.join(CONFIG_FILE_NAME).display());
        }
        else
        {
            info!("{} already exists, leaving it alone", dir.join(CONFIG_FILE_NAME).display());
        }
        Ok(())
    }

    fn execute_run(dir: PathBuf) -> Result<()>
    {
        info!("Attempting to run cvid in directory: {}", dir.display());
        let settings = Self::load_config(&dir)?.into_settings(&dir)?;
        output::convert_from_settings(&settings)?;
        Ok(())
    }

    fn execute_test(dir: PathBuf) -> Result<()>
    {
        info!("Attempting to test cvid in directory: {}", dir.display());
        let settings = Self::load_config(&dir)?.into_settings(&dir)?;
        output::test_from_settings(&settings)
    }

    fn load_config(dir: &Path) -> Result<Config>
    {
        let config_file = dir.join(CONFIG_FILE_NAME);
        if !config_file.is_file()
        {
            return Err(CliError::ConfigNotFound(dir.to_owned()).into());
        }
        Config::read_from(&config_file)
    }
}

impl Display for Command
{
    fn fmt(
        &self,
        f: &mut Formatter,
    ) -> FormatResult
    {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn names_and_aliases()
    {
        assert_eq!(Command::from_name("run"), Some(Command::Run));
        assert_eq!(Command::from_name("-t"), Some(Command::Test));
        assert_eq!(Command::from_name("--init"), Some(Command::Init));
        assert_eq!(Command::from_name("-h"), Some(Command::Help));
        assert_eq!(Command::from_name("--convert"), None);
        assert_eq!(Command::Run.to_string(), "run");
    }

    #[test]
    fn run_without_config_is_reported()
    {
        let dir = tempfile::tempdir().unwrap();
        let args = [dir.path().display().to_string()].into_iter();
        let err = Command::Run.execute(args).err().unwrap();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::ConfigNotFound(_))));
    }

    #[test]
    fn init_writes_config()
    {
        let dir = tempfile::tempdir().unwrap();
        let args = [dir.path().display().to_string()].into_iter();
        Command::Init.execute(args).unwrap();
        assert!(dir.path().join(CONFIG_FILE_NAME).is_file());
    }
}
