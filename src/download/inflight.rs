//! Per-chat in-flight requests.
//!
//! A chat may have one download running at a time. Each running request
//! carries a cancellation token that `/cancel` fires.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug)]
struct InFlight {
    request_id: Uuid,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: DashMap<i64, InFlight>,
}

impl InFlightRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claims the chat for `request_id`. Returns `None` when the chat is busy.
    pub fn try_begin(self: &Arc<Self>, chat_id: i64, request_id: Uuid) -> Option<InFlightGuard> {
        match self.entries.entry(chat_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let cancel = CancellationToken::new();
                slot.insert(InFlight {
                    request_id,
                    cancel: cancel.clone(),
                });
                Some(InFlightGuard {
                    registry: Arc::clone(self),
                    chat_id,
                    request_id,
                    cancel,
                })
            }
        }
    }

    /// Fires the cancellation token of the chat's running request.
    pub fn cancel(&self, chat_id: i64) -> bool {
        match self.entries.get(&chat_id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self, chat_id: i64) -> bool {
        self.entries.contains_key(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Releases the chat when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: Arc<InFlightRegistry>,
    chat_id: i64,
    request_id: Uuid,
    cancel: CancellationToken,
}

impl InFlightGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let request_id = self.request_id;
        self.registry
            .entries
            .remove_if(&self.chat_id, |_, entry| entry.request_id == request_id);
    }
}
