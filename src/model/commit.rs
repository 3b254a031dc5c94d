use indexmap::IndexMap;
use tracing::warn;

use crate::model::{PanelId, PanelStack};

/// Pending height updates, coalesced per panel and applied as one batch.
///
/// Resize gestures queue their results here instead of writing panel heights
/// synchronously; the host flushes the queue at its next paint tick so that
/// several panels changing from one gesture become a single visual update.
#[derive(Debug, Default)]
pub struct CommitQueue {
    pending: IndexMap<PanelId, f64>,
}

impl CommitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a height for a panel. A later push for the same panel replaces
    /// the earlier one; insertion order is preserved for the flush.
    pub fn push(&mut self, id: PanelId, height: f64) {
        self.pending.insert(id, height.max(0.0));
    }

    pub fn extend(&mut self, updates: impl IntoIterator<Item = (PanelId, f64)>) {
        for (id, height) in updates {
            self.push(id, height);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Apply every queued update to the stack and drain the queue.
    ///
    /// A panel whose height was set by a drag stops filling leftover space:
    /// its height is explicit from now on. Updates for panels that were
    /// removed while queued are dropped.
    pub fn flush(&mut self, stack: &mut PanelStack) -> Vec<(PanelId, f64)> {
        let mut applied = Vec::with_capacity(self.pending.len());
        for (id, height) in self.pending.drain(..) {
            match stack.get_mut(id) {
                Some(panel) => {
                    panel.height = height;
                    panel.auto_height = false;
                    applied.push((id, height));
                }
                None => warn!(?id, "dropping queued update for a removed panel"),
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::PanelOptions;

    #[test]
    fn coalesces_updates_per_panel() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(10.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(20.0)).unwrap();

        let mut queue = CommitQueue::new();
        queue.push(a, 15.0);
        queue.push(b, 25.0);
        queue.push(a, 30.0);
        assert_eq!(queue.len(), 2);

        let applied = queue.flush(&mut stack);
        assert_eq!(applied, vec![(a, 30.0), (b, 25.0)]);
        assert_eq!(stack.get(a).unwrap().height(), 30.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn flush_makes_auto_heights_explicit() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::auto()).unwrap();

        let mut queue = CommitQueue::new();
        queue.push(a, 42.0);
        queue.flush(&mut stack);
        assert!(!stack.get(a).unwrap().is_auto());
    }

    #[test]
    fn updates_for_removed_panels_are_dropped() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(10.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(20.0)).unwrap();

        let mut queue = CommitQueue::new();
        queue.push(a, 15.0);
        queue.push(b, 25.0);
        stack.remove(a);

        let applied = queue.flush(&mut stack);
        assert_eq!(applied, vec![(b, 25.0)]);
    }

    #[test]
    fn heights_never_go_negative() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(10.0)).unwrap();

        let mut queue = CommitQueue::new();
        queue.push(a, -5.0);
        let applied = queue.flush(&mut stack);
        assert_eq!(applied, vec![(a, 0.0)]);
    }
}
