#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure; the underlying diagnostic is shown verbatim.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("empty response")]
    EmptyResponse,

    #[error("no items found")]
    NoItemsFound,

    #[error("missing title")]
    MissingTitle,

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Network, TLS, timeout, status and empty-body failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::HttpStatus(_) | Error::EmptyResponse
        )
    }

    /// The catalog answered but nothing matched; pagination is exhausted.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Error::NoItemsFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
