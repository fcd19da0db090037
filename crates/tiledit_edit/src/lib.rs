//! Editing on top of `tiledit_core` and `tiledit_draw`: commands, highlight
//! builders and input dispatch.
//!
//! Commands borrow everything they touch through an [`EditCtx`]; the host
//! shell answers geometry, clipboard and view requests through
//! [`HostFns`].

pub mod commands;
pub mod ctx;
pub mod error;
pub mod highlight;
pub mod input;

pub use commands::{run, EditCommand, PendingPaste};
pub use ctx::{ClipboardChannel, CommentSym, EditCtx, HostFns};
pub use error::{EditError, EditResult};
pub use highlight::Highlighter;
pub use input::{Dispatcher, InputEvent, Key, Modifiers, MouseButton, Trigger};
