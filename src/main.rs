use std::{
    env,
    process::ExitCode,
};

use tracing_subscriber::EnvFilter;
use video_to_cvid::{
    CliError,
    Result,
};

mod command;

use command::Command;

// cvid init
// cvid run
// cvid test
// cvid help / --help / -h
fn run() -> Result<()>
{
    let mut args = env::args().skip(1);

    let command_str = args.next().ok_or(CliError::NoCommand)?;

    let command = Command::from_name(&command_str).ok_or(CliError::UnknownCommand(command_str))?;

    command.execute(args)
}

fn main() -> ExitCode
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match run()
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) =>
        {
            eprint!("{}", e);
            ExitCode::FAILURE
        },
    }
}
