use thiserror::Error;

pub type PolyglotResult<T> = Result<T, PolyglotError>;

#[derive(Error, Debug)]
pub enum PolyglotError {
    #[error("invalid culture tag `{tag}`: {reason}")]
    InvalidCultureTag { tag: String, reason: &'static str },

    #[error("failed to parse resources for culture `{culture}`: {reason}")]
    ResourceParse { culture: String, reason: String },

    #[error("invalid localization options: {0}")]
    InvalidOptions(String),
}
