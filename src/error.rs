use std::fmt;
use std::io;
use std::time::Duration;

/// Errors raised while planning, acquiring or loading a sweep
#[derive(Debug)]
pub enum SweepError {
    InvalidSweepPlan(String),
    TransportError(String),
    AcquisitionTimeout(Duration),
    MalformedSweepData { expected: usize, found: usize },
    FileLoadError(String),
    FileWriteError(String),
    ConfigError(String),
}

impl SweepError {
    /// Errors that leave the instrument in an unknown state
    pub fn is_acquisition_error(&self) -> bool {
        matches!(
            self,
            SweepError::TransportError(_)
                | SweepError::AcquisitionTimeout(_)
                | SweepError::MalformedSweepData { .. }
        )
    }
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SweepError::InvalidSweepPlan(msg) => write!(f, "Invalid sweep plan: {}", msg),
            SweepError::TransportError(msg) => write!(f, "Transport error: {}", msg),
            SweepError::AcquisitionTimeout(timeout) => {
                write!(
                    f,
                    "Sweep did not complete within {} ms",
                    timeout.as_millis()
                )
            }
            SweepError::MalformedSweepData { expected, found } => {
                write!(
                    f,
                    "Malformed sweep data: expected {} values, found {}",
                    expected, found
                )
            }
            SweepError::FileLoadError(msg) => write!(f, "File load error: {}", msg),
            SweepError::FileWriteError(msg) => write!(f, "File write error: {}", msg),
            SweepError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SweepError {}

impl From<io::Error> for SweepError {
    fn from(err: io::Error) -> Self {
        SweepError::TransportError(err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sweep_error_display() {
        let err = SweepError::MalformedSweepData {
            expected: 2002,
            found: 2001,
        };
        assert_eq!(
            err.to_string(),
            "Malformed sweep data: expected 2002 values, found 2001"
        );
        assert_eq!(
            SweepError::AcquisitionTimeout(Duration::from_millis(1500)).to_string(),
            "Sweep did not complete within 1500 ms"
        );
    }

    #[test]
    fn sweep_error_from_io() {
        let err: SweepError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(matches!(err, SweepError::TransportError(_)));
        assert!(err.is_acquisition_error());
        assert!(!SweepError::FileLoadError(String::new()).is_acquisition_error());
        assert!(!SweepError::FileWriteError(String::new()).is_acquisition_error());
    }
}
