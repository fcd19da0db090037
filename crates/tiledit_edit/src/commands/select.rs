//! Selection and clipboard commands.

use crate::commands::edit::insert_string;
use crate::ctx::{ClipboardChannel, EditCtx};
use crate::error::EditResult;
use std::time::{Duration, Instant};
use tiledit_core::scan::{line_end_index, line_start_index, word_at_index};
use tiledit_core::{mailbox, Mailbox, RwError};

/// Select the word around the cursor, or the single rune under it.
pub fn select_word(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let i = ctx.cursor.index();
    let (start, end) = match word_at_index(ctx.reader(), i) {
        Ok((word, start)) => (start, start + word.len()),
        Err(RwError::NotFound(_)) => match ctx.reader().read_rune_at(i) {
            Ok((_, size)) => (i, i + size),
            Err(RwError::EndOfRange) => return Ok(()),
            Err(err) => return Err(err.into()),
        },
        Err(err) => return Err(err.into()),
    };
    ctx.select(start, end)
}

/// Select the cursor line including its newline.
pub fn select_line(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let i = ctx.cursor.index();
    let ls = line_start_index(ctx.reader(), i)?;
    let (le, _) = line_end_index(ctx.reader(), i)?;
    ctx.select(ls, le)
}

pub fn select_all(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (min, max) = (ctx.rw.min(), ctx.rw.max());
    ctx.select(min, max)
}

pub fn copy(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    if let Some(text) = ctx.selection_text()? {
        ctx.fns.set_clipboard(ClipboardChannel::Clipboard, text);
    }
    Ok(())
}

pub fn cut(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let Some(text) = ctx.selection_text()? else {
        return Ok(());
    };
    ctx.fns.set_clipboard(ClipboardChannel::Clipboard, text);
    ctx.group(|ctx| ctx.delete_selection().map(|_| ()))
}

/// Ask the host for the channel's text. A reply sent from inside
/// `get_clipboard` is inserted right away; otherwise the request is handed
/// to the host as a [`PendingPaste`].
pub fn paste(ctx: &mut EditCtx<'_>, channel: ClipboardChannel) -> EditResult<()> {
    let (tx, rx) = mailbox();
    ctx.fns.get_clipboard(channel, tx);
    let pending = PendingPaste {
        channel,
        reply: rx,
        deadline: Instant::now() + Duration::from_millis(ctx.config.clipboard_timeout_ms),
    };
    if let Some(pending) = pending.poll(ctx)? {
        ctx.fns.paste_pending(pending);
    }
    Ok(())
}

/// A paste waiting for its clipboard reply.
///
/// The text goes in at the cursor as it stands when the reply is taken.
/// Past the deadline the paste fails and content and cursor stay as they
/// are; a reply sent after that is dropped.
#[derive(Debug)]
pub struct PendingPaste {
    channel: ClipboardChannel,
    reply: Mailbox<String>,
    deadline: Instant,
}

impl PendingPaste {
    pub fn channel(&self) -> ClipboardChannel {
        self.channel
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Insert the reply if it has arrived. Hands the paste back while it is
    /// still waiting and fails with `Clipboard` once the deadline passed.
    pub fn poll(self, ctx: &mut EditCtx<'_>) -> EditResult<Option<Self>> {
        let text = match self.reply.try_take() {
            Some(text) => text,
            None if Instant::now() < self.deadline => return Ok(Some(self)),
            None => self.reply.wait(Duration::ZERO)?,
        };
        if !text.is_empty() {
            insert_string(ctx, text.as_bytes())?;
        }
        Ok(None)
    }
}
