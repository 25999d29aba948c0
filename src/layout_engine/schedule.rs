//! Deferred-work primitives: a next-frame task queue and one-shot image
//! readiness watches.

use crate::common::collections::HashMap;
use crate::model::dom::NodeId;

/// Queue of groups whose background fit must be re-evaluated once the host
/// has applied the pending layout changes. One task is queued per triggering
/// operation; queued tasks always run at the next frame drain, never earlier.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    queue: Vec<NodeId>,
}

impl FrameScheduler {
    pub fn schedule(&mut self, group: NodeId) {
        self.queue.push(group);
    }

    /// Hands back everything queued, in order, clearing the queue.
    pub fn drain(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// One-shot load watches keyed by image node. At most one watch is
/// outstanding per image, no matter how many recomputations found it
/// unready; a fired watch is consumed and must be re-registered to fire
/// again.
#[derive(Debug, Default)]
pub struct ImageWatch {
    pending: HashMap<NodeId, NodeId>,
}

impl ImageWatch {
    /// Registers interest in `image` on behalf of `group`. Returns false if
    /// a watch was already outstanding (the registration is dropped).
    pub fn watch(&mut self, image: NodeId, group: NodeId) -> bool {
        if self.pending.contains_key(&image) {
            return false;
        }
        self.pending.insert(image, group);
        true
    }

    /// Consumes the watch for `image`, yielding the group that registered
    /// it.
    pub fn take(&mut self, image: NodeId) -> Option<NodeId> {
        self.pending.remove(&image)
    }

    pub fn watching(&self, image: NodeId) -> bool {
        self.pending.contains_key(&image)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
