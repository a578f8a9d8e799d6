//! Error type for report and export writing.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors raised while writing the timeline report or dataset files.
#[derive(Debug)]
pub enum ReportError {
    /// An I/O error from creating or writing an output file.
    Io(io::Error),
    /// A delimited-writer error.
    Csv(csv::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Csv(e) => write!(f, "delimited write error: {e}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}
