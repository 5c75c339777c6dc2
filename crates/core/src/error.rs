#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: &'static str },
}
