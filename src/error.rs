use thiserror::Error;

/// Everything that can go wrong between the first authenticate call and the
/// credentials coming back from STS.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS or timeout failure while talking to a remote endpoint.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A reply could be read but not understood (bad JSON, HTML without a form, ...).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The identity provider rejected the login.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// An operation was called while the session was in the wrong state.
    #[error("invalid session state: {0}")]
    State(String),

    #[error("unsupported callback kind `{0}`")]
    UnsupportedCallbackKind(String),

    #[error("could not decode SAML response: {0}")]
    Decode(String),

    #[error("could not parse {0}")]
    Parse(String),

    /// The user picked a role that does not exist.
    #[error("invalid selection: {0}")]
    Selection(String),

    /// STS refused to trade the assertion for credentials.
    #[error("credential exchange failed: {0}")]
    Exchange(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Protocol(format!("malformed JSON reply: {}", e))
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Config(format!("invalid url: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
