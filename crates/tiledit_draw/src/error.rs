//! Drawer error type.
use thiserror::Error;
use tiledit_core::RwError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// `draw` was called before the pending layout change was measured.
    #[error("draw requested while a measure is pending")]
    Measurement,

    #[error(transparent)]
    Rw(#[from] RwError),
}
