/// Errors that can occur while configuring or running a checkout simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The configuration cannot produce a valid run (no stores, no checkouts,
    /// a customer nobody can serve, ...). Raised before any task starts.
    Configuration(String),
    /// A conservation rule of the engine was broken. Always a programming defect.
    InvariantViolation(String),
    /// The OS refused to start a worker or spawner thread
    Spawn(String),
    /// A worker or spawner thread panicked
    TaskPanicked(String),
    /// Reading a configuration file failed
    Io(String),
    /// A configuration file could not be decoded
    Parse(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            SimulationError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            SimulationError::Spawn(msg) => write!(f, "Failed to spawn task: {}", msg),
            SimulationError::TaskPanicked(msg) => write!(f, "Task panicked: {}", msg),
            SimulationError::Io(msg) => write!(f, "I/O error: {}", msg),
            SimulationError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<std::io::Error> for SimulationError {
    fn from(err: std::io::Error) -> Self {
        SimulationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Parse(err.to_string())
    }
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Shorthand for building a configuration error from anything printable
pub(crate) fn config_error(msg: impl Into<String>) -> SimulationError {
    SimulationError::Configuration(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = SimulationError::Configuration("no stores".to_string());
        assert_eq!(err.to_string(), "Configuration error: no stores");

        let err = SimulationError::InvariantViolation("depth below zero".to_string());
        assert_eq!(err.to_string(), "Invariant violation: depth below zero");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: SimulationError = io.into();
        assert!(matches!(err, SimulationError::Io(ref msg) if msg.contains("missing.json")));
    }
}
