//! Write-event registry for buffer subscribers.

use super::WriteOp;
use std::collections::HashMap;

/// Payload of a pre-write notification. Setting `reply_err` vetoes the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreWriteEvent {
    pub op: WriteOp,
    pub reply_err: Option<String>,
}

/// Post-write notification telling whether the content actually differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedEvent {
    pub op: WriteOp,
    pub changed: bool,
}

/// Event payloads delivered to subscribers.
#[derive(Debug)]
pub enum BufferEvent<'a> {
    PreWrite(&'a mut PreWriteEvent),
    PostWrite(&'a WriteOp),
    Changed(&'a ChangedEvent),
}

impl BufferEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PreWrite(_) => EventKind::PreWrite,
            Self::PostWrite(_) => EventKind::PostWrite,
            Self::Changed(_) => EventKind::Changed,
        }
    }
}

/// Registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PreWrite,
    PostWrite,
    Changed,
}

/// Handle returned by [`EventRegister::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&mut BufferEvent<'_>) + Send>;

/// Subscribers keyed by event kind, invoked synchronously in registration order.
#[derive(Default)]
pub struct EventRegister {
    next_id: u64,
    subs: HashMap<EventKind, Vec<(SubscriptionId, Callback)>>,
}

impl std::fmt::Debug for EventRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self.subs.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventRegister").field("subs", &counts).finish()
    }
}

impl EventRegister {
    pub fn subscribe<F>(&mut self, kind: EventKind, f: F) -> SubscriptionId
    where
        F: FnMut(&mut BufferEvent<'_>) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subs.entry(kind).or_default().push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Returns false when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subs in self.subs.values_mut() {
            if let Some(pos) = subs.iter().position(|(sid, _)| *sid == id) {
                subs.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.subs.get(&kind).is_some_and(|v| !v.is_empty())
    }

    /// Deliver an event to every subscriber of its kind.
    pub fn emit(&mut self, ev: &mut BufferEvent<'_>) {
        if let Some(subs) = self.subs.get_mut(&ev.kind()) {
            for (_, cb) in subs.iter_mut() {
                cb(ev);
            }
        }
    }
}
