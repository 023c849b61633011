//! Action Queue
//!
//! FIFO carrying actions into the simulation step. A step drains the whole
//! queue before applying anything, so actions the world enqueues while a
//! step runs (harvest rewards, for instance) wait for the next step.

use std::collections::VecDeque;

use crate::game::action::Action;

/// Ordered queue of pending actions.
#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    pending: VecDeque<Action>,
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn enqueue(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Append several actions, preserving their order.
    pub fn extend<I: IntoIterator<Item = Action>>(&mut self, actions: I) {
        self.pending.extend(actions);
    }

    /// Take every pending action in enqueue order; the queue is left empty.
    pub fn drain_all(&mut self) -> Vec<Action> {
        self.pending.drain(..).collect()
    }

    /// Pending actions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.pending.iter()
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
