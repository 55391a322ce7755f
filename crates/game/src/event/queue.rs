use std::collections::VecDeque;

use super::types::GameEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvent {
    pub tick: u64,
    pub event: GameEvent,
}

/// Events raised by input handling and the simulation step, drained once per tick by the
/// broadcaster.
#[derive(Debug, Clone)]
pub struct EventQueue {
    pending: VecDeque<PendingEvent>,
    max_pending: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventQueue {
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn push(&mut self, tick: u64, event: GameEvent) {
        if self.pending.len() >= self.max_pending {
            if let Some(dropped) = self.pending.pop_front() {
                log::warn!("Event queue full, dropping {}", dropped.event.as_str());
            }
        }
        self.pending.push_back(PendingEvent { tick, event });
    }

    pub fn drain(&mut self) -> Vec<PendingEvent> {
        self.pending.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter().map(|p| &p.event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
