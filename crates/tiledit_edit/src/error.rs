//! Edit command error type.
use thiserror::Error;
use tiledit_core::{MailboxError, RwError};
use tiledit_draw::DrawError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Rw(#[from] RwError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("clipboard: {0}")]
    Clipboard(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("{0} is not supported here")]
    Unsupported(&'static str),
}

impl EditError {
    /// Errors that should not reach the user.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::Rw(RwError::Cancelled)
                | Self::Draw(DrawError::Rw(RwError::Cancelled))
                | Self::NothingToUndo
                | Self::NothingToRedo
        )
    }
}

impl From<MailboxError> for EditError {
    fn from(err: MailboxError) -> Self {
        Self::Clipboard(err.to_string())
    }
}

pub type EditResult<T> = Result<T, EditError>;
