//! Error types for world setup and configuration.

/// Errors that can occur while configuring or setting up a simulation
#[derive(Debug)]
pub enum WatorError {
    /// A configuration value is out of range (size, thresholds, counts, workers)
    InvalidConfiguration(String),
    /// More agents were requested than the grid has cells
    CapacityExceeded { requested: usize, capacity: usize },
    /// The per-step worker pool could not be built
    ThreadPool(String),
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl WatorError {
    /// Shorthand for an `InvalidConfiguration` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl std::fmt::Display for WatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::CapacityExceeded { requested, capacity } => write!(
                f,
                "Too many agents: prey + predators ({}) > size*size ({})",
                requested, capacity
            ),
            Self::ThreadPool(msg) => write!(f, "Worker pool error: {}", msg),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for WatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WatorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for WatorError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<serde_json::Error> for WatorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for WatorError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = WatorError::CapacityExceeded {
            requested: 10,
            capacity: 9,
        };
        assert_eq!(err.to_string(), "Too many agents: prey + predators (10) > size*size (9)");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;

        let err: WatorError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(WatorError::invalid("size").source().is_none());
    }
}
