/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Fetch { url: String, message: String },
    MalformedDocument(String),
    InvalidPattern { rule: &'static str, message: String },
    Generator(String),
    UnmatchedPatches { role: &'static str, rules: Vec<&'static str> },
    Serialization(String),
    InvalidArgument(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Fetch { url, message } => {
                write!(f, "failed to fetch OpenAPI document at {}: {}", url, message)
            }
            Error::MalformedDocument(msg) => write!(f, "malformed OpenAPI document: {}", msg),
            Error::InvalidPattern { rule, message } => {
                write!(f, "invalid pattern in patch rule '{}': {}", rule, message)
            }
            Error::Generator(msg) => write!(f, "client generator failed: {}", msg),
            Error::UnmatchedPatches { role, rules } => write!(
                f,
                "{} patch rules did not match: {}",
                role,
                rules.join(", ")
            ),
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML error: {}", err))
    }
}
