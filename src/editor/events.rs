use crate::document::{ItemId, PageDocument};
use crate::editor::collab::LetterId;

/// What a mutating session call changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageChange {
    ItemAdded(ItemId),
    ItemTransformed(ItemId),
    ItemRemoved(ItemId),
    ItemRaised(ItemId),
    ItemTextChanged(ItemId),
    BodyTextChanged,
    BackgroundChanged,
    DrawingChanged,
    Saved,
    /// A letter send began; always followed by `SendFinished`.
    SendStarted,
    /// `letter` is `None` when the send failed.
    SendFinished { letter: Option<LetterId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&PageChange, &PageDocument) + Send>;

#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, change: &PageChange, doc: &PageDocument) {
        for (_, listener) in &mut self.entries {
            listener(change, doc);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
