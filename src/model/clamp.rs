use crate::model::{LayoutError, PanelId, PanelStack};

/// The legal pointer interval for a splitter drag, in splitter-top-edge
/// coordinates.
///
/// During the gesture only the base range applies, so the guide can roam the
/// container. At commit the range is narrowed twice: by the thickness of
/// sibling splitters (so two splitters can never cross) and by the shrink
/// capacity and grow headroom on each side (so the cascade can always absorb
/// the committed displacement within panel bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRange {
    pub min_y: f64,
    pub max_y: f64,
}

impl DragRange {
    /// Base range: the splitter may occupy any position inside the
    /// container.
    pub fn base(
        stack: &PanelStack,
        splitter: PanelId,
        container_height: f64,
    ) -> Result<Self, LayoutError> {
        let panel = stack.get(splitter).ok_or(LayoutError::NotFound(splitter))?;
        if !panel.is_splitter() {
            return Err(LayoutError::NotASplitter(splitter));
        }
        Ok(DragRange {
            min_y: 0.0,
            max_y: (container_height - panel.height()).max(0.0),
        })
    }

    /// Reserve the thickness of every other splitter above and below.
    pub fn narrowed_by_siblings(self, stack: &PanelStack, splitter: PanelId) -> Self {
        let (upper, lower) = stack.splitter_mass_around(splitter);
        DragRange {
            min_y: self.min_y + upper,
            max_y: self.max_y - lower,
        }
    }

    /// Bound the displacement by what the cascade can actually move:
    /// the shrink capacity of the content panels on the side the boundary
    /// moves toward, and the grow headroom of the first content panel on
    /// the other side.
    pub fn narrowed_by_capacity(
        self,
        stack: &PanelStack,
        splitter: PanelId,
        start_y: f64,
        container_height: f64,
    ) -> Self {
        let Some(index) = stack.index_of(splitter) else {
            return self;
        };
        let ids: Vec<PanelId> = stack.ids().collect();
        let (above, below) = ids.split_at(index);
        let below = &below[1..];

        let capacity = |side: &[PanelId]| -> f64 {
            side.iter()
                .filter_map(|&id| stack.get(id))
                .filter(|p| !p.is_splitter())
                .map(|p| p.shrink_capacity())
                .sum()
        };
        // First content panel walking away from the splitter on each side.
        let headroom = |side: &mut dyn Iterator<Item = &PanelId>| -> f64 {
            side.filter_map(|&id| stack.get(id))
                .find(|p| !p.is_splitter())
                .map(|p| (p.max_or(container_height) - p.height()).max(0.0))
                .unwrap_or(0.0)
        };

        let up_limit = capacity(above).min(headroom(&mut below.iter()));
        let down_limit = capacity(below).min(headroom(&mut above.iter().rev()));

        DragRange {
            min_y: self.min_y.max(start_y - up_limit),
            max_y: self.max_y.min(start_y + down_limit),
        }
    }

    /// Clamp a pointer position into the range. On a degenerate range the
    /// lower bound wins.
    pub fn clamp(self, y: f64) -> f64 {
        y.min(self.max_y).max(self.min_y)
    }
}
