use tracing::debug;

use crate::model::{HEIGHT_EPSILON, Overflow, PanelId, PanelStack};

/// Result of one fill pass.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillOutcome {
    /// Heights assigned to auto panels, in stack order.
    pub changed: Vec<(PanelId, f64)>,
    pub overflow: Option<Overflow>,
}

/// Distribute the container height left over after fixed panels (splitters
/// included) equally among auto panels.
///
/// Panels whose equal share would violate their bounds are pinned at the
/// violated bound and the residue is re-split among the rest. When even the
/// minimums do not fit, every auto panel sits at its minimum and the
/// shortfall is reported; no height ever goes negative.
pub fn refresh(stack: &mut PanelStack, container_height: f64) -> FillOutcome {
    let autos: Vec<PanelId> = stack.panels().filter(|(_, p)| p.is_auto()).map(|(id, _)| id).collect();
    let used: f64 = stack
        .panels()
        .filter(|(_, p)| !p.is_auto())
        .map(|(_, p)| p.height())
        .sum();

    if autos.is_empty() {
        let overflow = (used > container_height + HEIGHT_EPSILON).then(|| Overflow {
            shortfall: used - container_height,
            starved: Vec::new(),
        });
        return FillOutcome { changed: Vec::new(), overflow };
    }

    let count = autos.len();
    let remaining = container_height - used;
    let bounds: Vec<(f64, f64)> = autos
        .iter()
        .map(|&id| {
            let p = stack.get(id).expect("auto panel was just enumerated");
            (p.min_height(), p.max_or(container_height))
        })
        .collect();

    let mut heights = vec![0.0; count];
    let mut pinned = vec![false; count];

    // Pin one violated bound at a time and re-split what is left, the same
    // fixpoint shape used for weighted window sizing.
    for _ in 0..count + 1 {
        let pinned_sum: f64 = (0..count).filter(|&i| pinned[i]).map(|i| heights[i]).sum();
        let free = (0..count).filter(|&i| !pinned[i]).count();
        if free == 0 {
            break;
        }
        let share = (remaining - pinned_sum) / free as f64;

        let mut violated = false;
        for i in 0..count {
            if pinned[i] {
                continue;
            }
            let (min, max) = bounds[i];
            if share < min - HEIGHT_EPSILON {
                heights[i] = min;
                pinned[i] = true;
                violated = true;
                break;
            }
            if share > max + HEIGHT_EPSILON {
                heights[i] = max;
                pinned[i] = true;
                violated = true;
                break;
            }
        }

        if !violated {
            for i in 0..count {
                if !pinned[i] {
                    heights[i] = share.max(0.0);
                }
            }
            break;
        }
    }

    let mut changed = Vec::with_capacity(count);
    for (i, &id) in autos.iter().enumerate() {
        stack.set_height(id, heights[i]).expect("auto panel was just enumerated");
        changed.push((id, heights[i]));
    }

    let total = used + heights.iter().sum::<f64>();
    let overflow = (total > container_height + HEIGHT_EPSILON).then(|| {
        let starved = autos
            .iter()
            .enumerate()
            .filter(|&(i, _)| heights[i] <= bounds[i].0 + HEIGHT_EPSILON)
            .map(|(_, &id)| id)
            .collect();
        let shortfall = total - container_height;
        debug!(shortfall, "fill distribution overflowed the container");
        Overflow { shortfall, starved }
    });

    FillOutcome { changed, overflow }
}
