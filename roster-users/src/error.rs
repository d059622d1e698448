use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("player name cannot be empty")]
    EmptyName,

    #[error("user not found")]
    NotFound,

    #[error("failed to load user: {0}")]
    Load(String),

    #[error("user data i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl UserError {
    /// Whether this is the ordinary "no such player" outcome rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, UserError>;
