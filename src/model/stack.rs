use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::model::LayoutError;

new_key_type! {
    /// Stable identifier for a panel, assigned at insertion.
    pub struct PanelId;
}

/// Construction-time options for a panel.
///
/// `max_height` of `None` means "bounded by the container extent", which is
/// only known at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOptions {
    pub min_height: f64,
    pub max_height: Option<f64>,
    pub height: f64,
    pub splitter: bool,
    pub auto_height: bool,
    /// Opaque external UI handle (e.g. the element a drag started on),
    /// used to map pointer events back to a panel.
    pub handle: Option<u64>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        PanelOptions {
            min_height: 0.0,
            max_height: None,
            height: 0.0,
            splitter: false,
            auto_height: false,
            handle: None,
        }
    }
}

impl PanelOptions {
    pub fn fixed(height: f64) -> Self {
        PanelOptions { height, ..Default::default() }
    }

    pub fn auto() -> Self {
        PanelOptions { auto_height: true, ..Default::default() }
    }

    pub fn splitter(thickness: f64) -> Self {
        PanelOptions {
            height: thickness,
            splitter: true,
            ..Default::default()
        }
    }

    pub fn with_handle(mut self, handle: u64) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_bounds(mut self, min: f64, max: Option<f64>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub(crate) height: f64,
    pub(crate) min_height: f64,
    pub(crate) max_height: Option<f64>,
    pub(crate) splitter: bool,
    pub(crate) auto_height: bool,
    pub(crate) handle: Option<u64>,
}

impl Panel {
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    pub fn max_height(&self) -> Option<f64> {
        self.max_height
    }

    pub fn is_splitter(&self) -> bool {
        self.splitter
    }

    pub fn is_auto(&self) -> bool {
        self.auto_height
    }

    pub fn handle(&self) -> Option<u64> {
        self.handle
    }

    /// Effective upper bound given the container extent.
    pub(crate) fn max_or(&self, container_height: f64) -> f64 {
        self.max_height.unwrap_or(container_height)
    }

    /// Height this panel can give up before hitting its minimum.
    pub(crate) fn shrink_capacity(&self) -> f64 {
        (self.height - self.min_height).max(0.0)
    }
}

/// An ordered stack of panels: an arena of panel records plus an explicit
/// stack-order index. Identity is stable for the life of a panel; neighbor
/// relations are derived from the order, not stored.
#[derive(Debug, Default)]
pub struct PanelStack {
    panels: SlotMap<PanelId, Panel>,
    order: Vec<PanelId>,
    by_handle: FxHashMap<u64, PanelId>,
}

impl PanelStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a panel to the tail of the stack.
    ///
    /// Rejects contradictory options instead of producing undefined resize
    /// behavior later.
    pub fn add(&mut self, options: PanelOptions) -> Result<PanelId, LayoutError> {
        if options.splitter && options.auto_height {
            return Err(LayoutError::SplitterAutoHeight);
        }
        if let Some(max) = options.max_height
            && options.min_height > max
        {
            return Err(LayoutError::InvalidBounds { min: options.min_height, max });
        }
        let id = self.panels.insert(Panel {
            height: options.height.max(0.0),
            min_height: options.min_height.max(0.0),
            max_height: options.max_height,
            splitter: options.splitter,
            auto_height: options.auto_height,
            handle: options.handle,
        });
        self.order.push(id);
        if let Some(handle) = options.handle {
            self.by_handle.insert(handle, id);
        }
        Ok(id)
    }

    pub fn remove(&mut self, id: PanelId) -> Option<Panel> {
        let panel = self.panels.remove(id)?;
        self.order.retain(|&p| p != id);
        if let Some(handle) = panel.handle {
            self.by_handle.remove(&handle);
        }
        Some(panel)
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Panel ids in stack order.
    pub fn ids(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.order.iter().copied()
    }

    pub fn panels(&self) -> impl Iterator<Item = (PanelId, &Panel)> + '_ {
        self.order.iter().map(|&id| (id, &self.panels[id]))
    }

    pub fn index_of(&self, id: PanelId) -> Option<usize> {
        self.order.iter().position(|&p| p == id)
    }

    /// Map an external UI handle back to its panel.
    pub fn panel_at_handle(&self, handle: u64) -> Option<PanelId> {
        self.by_handle.get(&handle).copied()
    }

    pub fn next_from(&self, id: PanelId) -> Option<PanelId> {
        let index = self.index_of(id)?;
        self.order.get(index + 1).copied()
    }

    pub fn prev_from(&self, id: PanelId) -> Option<PanelId> {
        let index = self.index_of(id)?;
        index.checked_sub(1).map(|i| self.order[i])
    }

    /// Position of a panel's top edge: the summed heights of everything
    /// above it in the stack.
    pub fn offset_of(&self, id: PanelId) -> Option<f64> {
        let index = self.index_of(id)?;
        Some(self.order[..index].iter().map(|&p| self.panels[p].height).sum())
    }

    pub fn total_height(&self) -> f64 {
        self.order.iter().map(|&p| self.panels[p].height).sum()
    }

    /// Current `(id, height)` assignments in stack order.
    pub fn heights(&self) -> Vec<(PanelId, f64)> {
        self.order.iter().map(|&p| (p, self.panels[p].height)).collect()
    }

    pub(crate) fn set_height(&mut self, id: PanelId, height: f64) -> Result<(), LayoutError> {
        let panel = self.panels.get_mut(id).ok_or(LayoutError::NotFound(id))?;
        panel.height = height.max(0.0);
        Ok(())
    }

    /// Summed thickness of splitter panels strictly above and strictly below
    /// the given panel. This space is permanently reserved for other drag
    /// handles and must never be encroached upon.
    pub fn splitter_mass_around(&self, id: PanelId) -> (f64, f64) {
        let Some(index) = self.index_of(id) else {
            return (0.0, 0.0);
        };
        let mass = |ids: &[PanelId]| -> f64 {
            ids.iter()
                .map(|&p| &self.panels[p])
                .filter(|p| p.splitter)
                .map(|p| p.height)
                .sum()
        };
        (mass(&self.order[..index]), mass(&self.order[index + 1..]))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn add_assigns_stable_ids_in_stack_order() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s = stack.add(PanelOptions::splitter(4.0)).unwrap();
        let b = stack.add(PanelOptions::auto()).unwrap();

        assert_eq!(stack.ids().collect::<Vec<_>>(), vec![a, s, b]);
        assert_eq!(stack.index_of(s), Some(1));
        assert_eq!(stack.get(a).unwrap().height(), 50.0);
        assert!(stack.get(s).unwrap().is_splitter());
        assert!(stack.get(b).unwrap().is_auto());
    }

    #[test]
    fn rejects_contradictory_options() {
        let mut stack = PanelStack::new();
        let splitter_auto = PanelOptions {
            splitter: true,
            auto_height: true,
            ..Default::default()
        };
        assert_eq!(stack.add(splitter_auto), Err(LayoutError::SplitterAutoHeight));

        let bounds = PanelOptions::fixed(10.0).with_bounds(20.0, Some(10.0));
        assert_eq!(
            stack.add(bounds),
            Err(LayoutError::InvalidBounds { min: 20.0, max: 10.0 })
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn neighbor_traversal_from_interior_node() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(10.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(20.0)).unwrap();
        let c = stack.add(PanelOptions::fixed(30.0)).unwrap();

        assert_eq!(stack.prev_from(b), Some(a));
        assert_eq!(stack.next_from(b), Some(c));
        assert_eq!(stack.prev_from(a), None);
        assert_eq!(stack.next_from(c), None);
    }

    #[test]
    fn handle_lookup() {
        let mut stack = PanelStack::new();
        let _a = stack.add(PanelOptions::fixed(10.0)).unwrap();
        let s = stack.add(PanelOptions::splitter(4.0).with_handle(7)).unwrap();

        assert_eq!(stack.panel_at_handle(7), Some(s));
        assert_eq!(stack.panel_at_handle(8), None);
    }

    #[test]
    fn offset_is_sum_of_heights_above() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s = stack.add(PanelOptions::splitter(4.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(30.0)).unwrap();

        assert_eq!(stack.offset_of(a), Some(0.0));
        assert_eq!(stack.offset_of(s), Some(50.0));
        assert_eq!(stack.offset_of(b), Some(54.0));
    }

    #[test]
    fn splitter_mass_counts_only_other_splitters() {
        let mut stack = PanelStack::new();
        let _a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s1 = stack.add(PanelOptions::splitter(4.0)).unwrap();
        let _b = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s2 = stack.add(PanelOptions::splitter(6.0)).unwrap();
        let _c = stack.add(PanelOptions::fixed(50.0)).unwrap();

        assert_eq!(stack.splitter_mass_around(s1), (0.0, 6.0));
        assert_eq!(stack.splitter_mass_around(s2), (4.0, 0.0));
    }

    #[test]
    fn remove_keeps_order_and_handles_consistent() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(10.0).with_handle(1)).unwrap();
        let b = stack.add(PanelOptions::fixed(20.0).with_handle(2)).unwrap();
        let c = stack.add(PanelOptions::fixed(30.0)).unwrap();

        stack.remove(b);
        assert_eq!(stack.ids().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(stack.panel_at_handle(2), None);
        assert_eq!(stack.next_from(a), Some(c));
    }
}
