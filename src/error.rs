//! Error types for the simulator.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Date picker value that is not an ISO calendar date
    #[snafu(display("Invalid date '{input}', expected YYYY-MM-DD"))]
    InvalidDate { input: String },

    /// Timezone identifier unknown to the tz database
    #[snafu(display("Unknown timezone '{id}'"))]
    UnknownTimezone { id: String },

    /// The timezone lookup itself failed
    #[snafu(display("Timezone lookup failed: {message}"))]
    TimezoneLookup { message: String },

    #[snafu(display("Failed to read config {path}: {source}"))]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config: {source}"))]
    ConfigParse { source: toml::de::Error },

    /// The simulator task is gone and no longer accepts commands
    #[snafu(display("Simulator stopped"))]
    SimulatorStopped,
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::ConfigParse { source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
