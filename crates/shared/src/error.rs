use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected at least three color components in '{0}'")]
    MissingComponents(String),
    #[error("color component {value} out of range 0-255 in '{raw}'")]
    ComponentOutOfRange { raw: String, value: u32 },
}
