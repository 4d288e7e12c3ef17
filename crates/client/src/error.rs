/// Error variants for inventory service calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to open a session on {server}: {reason}")]
    Connection { server: String, reason: String },

    #[error("Network failure connecting to {url}: {source}")]
    NetworkFailure {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("Inventory service returned HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Failed to parse inventory service response: {0}")]
    ResponseParse(String),

    #[error("Invalid inventory service URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ClientError {
    pub(crate) fn from_ureq(url: &str, error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                ClientError::HttpError { status, body }
            }
            ureq::Error::Transport(transport) => ClientError::NetworkFailure {
                url: url.to_owned(),
                source: Box::new(transport),
            },
        }
    }
}
