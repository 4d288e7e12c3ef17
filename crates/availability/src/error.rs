use client::ClientError;
use config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Critical error connecting to the inventory service at {server}: {source}")]
    Connection {
        server: String,
        #[source]
        source: ClientError,
    },

    #[error("End time `{end}` is before start time `{start}` - check the config offsets")]
    InvalidWindow { start: String, end: String },

    #[error("Offset of {offset} seconds puts the query window out of range")]
    WindowOutOfRange { offset: i64 },

    #[error("{context}: {source}")]
    ServiceQuery {
        context: String,
        #[source]
        source: ClientError,
    },

    #[error("Malformed inventory timestamp `{raw}`: {reason}")]
    MalformedTimestamp { raw: String, reason: &'static str },

    #[error("serializing report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("writing `{path}`: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),
}
