use std::{
    env,
    path::PathBuf,
};

use crate::{
    Result,
    error::CliError,
};

pub fn get_path_or_curr_dir(path: Option<PathBuf>) -> Result<PathBuf>
{
    match path
    {
        None => env::current_dir().map_err(|_| CliError::AccessCurrentDirectory.into()),
        Some(path) => Ok(path),
    }
}

pub fn format_duration(miliseconds: u128) -> String
{
    if miliseconds < 1000
    {
        format!("{}ms", miliseconds)
    }
    else
    {
        format!("{:.2}s", miliseconds as f64 / 1000.0)
    }
}

pub fn format_bytes(bytes: u64) -> String
{
    match bytes
    {
        0..1024 => format!("{} B", bytes),
        1024..1_048_576 => format!("{:.1} KiB", bytes as f64 / 1024.0),
        _ => format!("{:.2} MiB", bytes as f64 / 1_048_576.0),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn durations()
    {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.50s");
    }

    #[test]
    fn byte_sizes()
    {
        assert_eq!(format_bytes(7), "7 B");
        assert_eq!(format_bytes(3780), "3.7 KiB");
        assert_eq!(format_bytes(3 * 1_048_576), "3.00 MiB");
    }

    #[test]
    fn explicit_path_wins()
    {
        let path = PathBuf::from("/some/where");
        assert_eq!(get_path_or_curr_dir(Some(path.clone())).unwrap(), path);
    }
}
