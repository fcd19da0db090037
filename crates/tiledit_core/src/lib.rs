//! Core text model for tiledit (buffers, scanners, search, undo, cursor).

/// Cooperative cancellation for chunked scans.
pub mod cancel;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Cursor and selection model.
pub mod cursor;
/// Error types shared by readers and writers.
pub mod error;
/// File-position references in content.
pub mod filepos;
/// Single-slot reply delivery.
pub mod mailbox;
/// Readers, writers and the rope buffer.
pub mod rw;
/// Rune, line and word scanners.
pub mod scan;
/// Folded, chunked substring search.
pub mod search;
/// Row session state.
pub mod session;
/// Undo records and history.
pub mod undo;

pub use cancel::CancelToken;
pub use config::Config;
pub use cursor::{Cursor, CursorState};
pub use error::{RwError, RwResult};
pub use filepos::FilePos;
pub use mailbox::{mailbox, Mailbox, MailboxError, MailboxSender};
pub use rw::{ReadWriter, Reader, RopeBuffer, Writer};
pub use search::FindOpt;
pub use session::RowState;
pub use undo::{Direction, History, UndoRecord};
