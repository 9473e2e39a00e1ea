//! Shared plumbing for the `seag-parse` and `seag-rom2elf` binaries.

pub mod summary;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::LevelFilter;

pub use summary::{FileSummary, NodeSummary};

/// Path that stands for stdin or stdout.
pub const STDIO_PATH: &str = "-";

/// Exit statuses shared by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0x00,
    Usage = 0x01,
    /// Input could not be read or decoded.
    Input = 0x02,
    /// Conversion to an image failed.
    Convert = 0x04,
    /// Output could not be written.
    Output = 0x08,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status as u8)
    }
}

/// An error paired with the status the process should exit with.
#[derive(Debug)]
pub struct Failure {
    pub status: Status,
    pub error: anyhow::Error,
}

impl Failure {
    /// Prints the error chain to stderr and returns the exit status.
    pub fn report(self) -> ExitCode {
        eprintln!("Error: {:#}", self.error);
        self.status.into()
    }
}

pub trait FailWith<T> {
    fn fail_with(self, status: Status) -> Result<T, Failure>;
}

impl<T, E> FailWith<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn fail_with(self, status: Status) -> Result<T, Failure> {
        self.map_err(|err| Failure {
            status,
            error: err.into(),
        })
    }
}

/// Installs `env_logger`; `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Reads a whole file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == STDIO_PATH {
        let mut data = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("unable to read stdin")?;
        return Ok(data);
    }
    fs::read(path).with_context(|| format!("unable to open file {}", path.display()))
}

/// Writes `data` to a file, or to stdout when `path` is `None` or `-`.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) if path.as_os_str() != STDIO_PATH => fs::write(path, data)
            .with_context(|| format!("unable to write file {}", path.display())),
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|()| stdout.flush())
                .context("failed to write all data to stdout")
        }
    }
}

/// Offset of the first byte where `a` and `b` disagree, counting a length
/// difference as disagreement at the end of the shorter one.
pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Renders a path for messages, naming stdin explicitly.
pub fn display_path(path: &Path) -> String {
    if path.as_os_str() == STDIO_PATH {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_with_keeps_context() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let failure = result
            .context("unable to open file a.bin")
            .fail_with(Status::Input)
            .unwrap_err();
        assert_eq!(failure.status, Status::Input);
        assert_eq!(format!("{:#}", failure.error), "unable to open file a.bin: gone");
    }

    #[test]
    fn statuses_match_tool_convention() {
        let codes: Vec<u8> = [Status::Ok, Status::Usage, Status::Input, Status::Convert, Status::Output]
            .iter()
            .map(|&status| status as u8)
            .collect();
        assert_eq!(codes, vec![0, 1, 2, 4, 8]);
    }

    #[test]
    fn first_difference_reports_offset() {
        assert_eq!(first_difference(&[1, 2, 3], &[1, 2, 3]), None);
        assert_eq!(first_difference(&[1, 2, 3], &[1, 9, 3]), Some(1));
        assert_eq!(first_difference(&[1, 2], &[1, 2, 3]), Some(2));
    }

    #[test]
    fn round_trips_through_a_file() {
        let path = std::env::temp_dir().join(format!("seag-romtools-{}.bin", std::process::id()));
        write_output(Some(path.as_path()), &[1, 2, 3]).unwrap();
        assert_eq!(read_input(&path).unwrap(), vec![1, 2, 3]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input(Path::new("/nonexistent/seag.bin")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/seag.bin"));
    }
}
