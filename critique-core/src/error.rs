/// Top-level critique error type.
///
/// Operations that can fail in more than one domain return
/// [`Result<T, CritiqueError>`](Result). Each variant wraps a
/// domain-specific error enum, allowing callers to match on the error source
/// without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum CritiqueError {
    /// Error from the upstream inference API.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Input rejected before any network call was attempted.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while collecting project files.
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),
}

/// Classified failures of an upstream inference call.
///
/// `Display` is the user-visible message; the raw upstream text is kept in
/// `detail` for logging.
#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed. Please check your OpenRouter API key.")]
    Authentication { detail: String },

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimit { detail: String },

    #[error("Quota exceeded. Please check your OpenRouter account credits.")]
    QuotaExceeded { detail: String },

    #[error("Request timed out. Please try again.")]
    Timeout { detail: String },

    /// Catch-all for anything the classifier does not recognize.
    #[error("Error: {detail}. Please try again or check your connection.")]
    Api { detail: String },
}

impl LlmError {
    /// Raw upstream text this error was classified from.
    pub fn detail(&self) -> &str {
        match self {
            Self::Authentication { detail }
            | Self::RateLimit { detail }
            | Self::QuotaExceeded { detail }
            | Self::Timeout { detail }
            | Self::Api { detail } => detail,
        }
    }
}

/// Input-validation failures detected before a request is sent.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Code input cannot be empty")]
    EmptyCode,

    #[error("Code is too short (minimum {min} characters)")]
    CodeTooShort { min: usize },

    #[error("Code is too long (maximum {max} characters)")]
    CodeTooLong { max: usize },

    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("OpenRouter API key should start with '{prefix}'")]
    ApiKeyPrefix { prefix: &'static str },

    #[error("API key appears to be too short")]
    ApiKeyTooShort,

    #[error("Unknown review mode: {0}")]
    UnknownMode(String),
}

/// Errors in critique configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors while gathering a project directory for review.
#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Project directory not found: {0}")]
    NotFound(String),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Failures inside the persistence layer.
///
/// These never cross the public store API: loads degrade to an empty
/// document and saves are best-effort. They exist so the failure can be
/// logged with its cause.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document root is not a JSON object")]
    NotAnObject,
}

/// Convenience alias for `Result<T, CritiqueError>`.
pub type Result<T> = std::result::Result<T, CritiqueError>;
