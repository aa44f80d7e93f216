use crate::{InstanceId, OwnerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    PackGranted {
        owner: OwnerId,
        set_code: String,
        pack: InstanceId,
    },
    PackOpened {
        owner: OwnerId,
        set_code: String,
        pack: InstanceId,
        cards: usize,
    },
    PackOpenFailed {
        owner: OwnerId,
        set_code: String,
        reason: String,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
