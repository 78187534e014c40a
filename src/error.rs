use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid size: {0}")]
    InvalidGridSize(String),
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid obstacle geometry: {0}")]
    InvalidGeometry(String),

    #[error("Simulation diverged at step {step}: {reason}")]
    DivergedSimulation { step: usize, reason: String },

    #[error("Failed to write output: {0}")]
    OutputWriteFailure(String),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        SolverError::OutputWriteFailure(err.to_string())
    }
}
