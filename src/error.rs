/// Terminal failure of an extraction, parsing or simulation call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or empty route track.
    #[error("failed to parse the route: {0}")]
    Parse(String),

    /// Missing columns, unparseable values, or filters that leave nothing to work with.
    #[error("invalid dataset: {0}")]
    Data(String),

    /// Simulation inputs that cannot produce a meaningful run.
    #[error("invalid simulation parameters: {0}")]
    InvalidParameters(String),
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Data(error.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::Data(error.to_string())
    }
}

impl From<gpx::errors::GpxError> for Error {
    fn from(error: gpx::errors::GpxError) -> Self {
        Self::Parse(error.to_string())
    }
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
