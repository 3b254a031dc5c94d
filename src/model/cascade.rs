use tracing::{debug, warn};

use crate::model::{HEIGHT_EPSILON, LayoutError, PanelId, PanelStack};

/// Compute the height changes for one committed splitter drag.
///
/// `start_y` is the splitter's top edge at drag start and `mouse_y` the
/// released (already clamped) pointer position. The nearest content panel on
/// the side the boundary moved away from grows by the displacement; content
/// panels on the other side shrink in sequence, each supplying what it can
/// above its minimum, until the displacement is absorbed. Splitter panels
/// are structural and are skipped by both walks.
///
/// The returned pairs are a batch for the commit queue; nothing is written
/// to the stack here. The sum of heights over the affected panels is
/// conserved even if the chain runs out of supply: the growing panel only
/// receives what the chain actually gave up.
pub fn resize(
    stack: &PanelStack,
    splitter: PanelId,
    start_y: f64,
    mouse_y: f64,
    container_height: f64,
) -> Result<Vec<(PanelId, f64)>, LayoutError> {
    let splitter_panel = stack.get(splitter).ok_or(LayoutError::NotFound(splitter))?;
    if !splitter_panel.is_splitter() {
        return Err(LayoutError::NotASplitter(splitter));
    }

    let diff_y = start_y - mouse_y;
    let dragged = diff_y.abs();
    if dragged < HEIGHT_EPSILON {
        return Ok(Vec::new());
    }
    let toward_next = mouse_y > start_y;

    // The absorber sits on the side the drag originated from; the shrink
    // chain runs the other way.
    let toward_origin = |id: PanelId| {
        if toward_next { stack.prev_from(id) } else { stack.next_from(id) }
    };
    let toward_target = |id: PanelId| {
        if toward_next { stack.next_from(id) } else { stack.prev_from(id) }
    };

    let mut absorber = None;
    let mut cursor = splitter;
    while let Some(id) = toward_origin(cursor) {
        cursor = id;
        let panel = stack.get(id).expect("stack order contains only live panels");
        if !panel.is_splitter() {
            absorber = Some((id, panel));
            break;
        }
    }
    let Some((absorber, absorber_panel)) = absorber else {
        warn!(?splitter, "no content panel on the origin side of the drag");
        return Ok(Vec::new());
    };

    // The commit-time drag range keeps the displacement within the
    // absorber's headroom; clamp again in case the caller skipped that.
    let headroom = (absorber_panel.max_or(container_height) - absorber_panel.height()).max(0.0);
    let grant = dragged.min(headroom);
    if grant + HEIGHT_EPSILON < dragged {
        warn!(
            ?absorber,
            dragged, grant, "drag displacement exceeds the growing panel's headroom"
        );
    }

    let mut shrinks: Vec<(PanelId, f64)> = Vec::new();
    let mut remaining = grant;
    let mut absorbed = 0.0;
    let mut cursor = splitter;
    while let Some(id) = toward_target(cursor) {
        cursor = id;
        let panel = stack.get(id).expect("stack order contains only live panels");
        if panel.is_splitter() {
            continue;
        }

        let supply = panel.shrink_capacity();
        let shrink = remaining.min(supply);
        let resize_to = panel.height() - shrink;
        absorbed += shrink;
        remaining -= supply;
        debug!(?id, resize_to, remaining, "cascade step");
        shrinks.push((id, resize_to));

        if remaining <= 0.0 {
            break;
        }
    }

    if remaining > HEIGHT_EPSILON {
        warn!(
            ?splitter,
            unabsorbed = remaining,
            "drag displacement not fully absorbable; growing by what was supplied"
        );
    }

    let mut updates = Vec::with_capacity(shrinks.len() + 1);
    updates.push((absorber, absorber_panel.height() + absorbed));
    updates.extend(shrinks);

    if cfg!(debug_assertions) {
        let before: f64 = updates.iter().map(|&(id, _)| stack.get(id).unwrap().height()).sum();
        let after: f64 = updates.iter().map(|&(_, h)| h).sum();
        debug_assert!(
            (before - after).abs() < HEIGHT_EPSILON,
            "cascade must conserve total height: {before} -> {after}"
        );
    }

    Ok(updates)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::PanelOptions;

    // [A(50), splitter, B(50), C(50)] in a 150-height container. The
    // splitter has zero thickness so positions stay in round numbers.
    fn stack() -> (PanelStack, PanelId, [PanelId; 3]) {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s = stack.add(PanelOptions::splitter(0.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let c = stack.add(PanelOptions::fixed(50.0)).unwrap();
        (stack, s, [a, b, c])
    }

    #[test]
    fn single_step_cascade() {
        let (stack, s, [a, b, _c]) = stack();
        let updates = resize(&stack, s, 50.0, 80.0, 150.0).unwrap();
        assert_eq!(updates, vec![(a, 80.0), (b, 20.0)]);
    }

    #[test]
    fn cascading_overflow_rolls_onto_the_next_panel() {
        let (stack, s, [a, b, c]) = stack();
        let updates = resize(&stack, s, 50.0, 120.0, 150.0).unwrap();
        assert_eq!(updates, vec![(a, 120.0), (b, 0.0), (c, 30.0)]);
    }

    #[test]
    fn dragging_up_grows_the_following_panel() {
        let (stack, s, [a, b, _c]) = stack();
        let updates = resize(&stack, s, 50.0, 20.0, 150.0).unwrap();
        assert_eq!(updates, vec![(b, 80.0), (a, 20.0)]);
    }

    #[test]
    fn zero_displacement_is_a_no_op() {
        let (stack, s, _) = stack();
        assert_eq!(resize(&stack, s, 50.0, 50.0, 150.0).unwrap(), vec![]);
    }

    #[test]
    fn shrink_chain_respects_minimum_heights() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s = stack.add(PanelOptions::splitter(0.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(50.0).with_bounds(30.0, None)).unwrap();
        let c = stack.add(PanelOptions::fixed(50.0)).unwrap();

        let updates = resize(&stack, s, 50.0, 120.0, 150.0).unwrap();
        assert_eq!(updates, vec![(a, 120.0), (b, 30.0), (c, 0.0)]);
    }

    #[test]
    fn sibling_splitters_are_skipped_not_resized() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s1 = stack.add(PanelOptions::splitter(4.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(50.0)).unwrap();
        let s2 = stack.add(PanelOptions::splitter(4.0)).unwrap();
        let c = stack.add(PanelOptions::fixed(50.0)).unwrap();

        let updates = resize(&stack, s1, 50.0, 110.0, 158.0).unwrap();
        assert_eq!(updates, vec![(a, 110.0), (b, 0.0), (c, 40.0)]);
        assert_eq!(stack.get(s2).unwrap().height(), 4.0);
    }

    #[test]
    fn exhausted_chain_conserves_total_height() {
        let (stack, s, [a, b, c]) = stack();
        let updates = resize(&stack, s, 50.0, 250.0, 300.0).unwrap();
        // Only 100 units of supply exist below the splitter.
        assert_eq!(updates, vec![(a, 150.0), (b, 0.0), (c, 0.0)]);
    }

    #[test]
    fn absorber_growth_is_clamped_to_its_maximum() {
        let mut stack = PanelStack::new();
        let a = stack.add(PanelOptions::fixed(50.0).with_bounds(0.0, Some(60.0))).unwrap();
        let s = stack.add(PanelOptions::splitter(0.0)).unwrap();
        let b = stack.add(PanelOptions::fixed(100.0)).unwrap();

        let updates = resize(&stack, s, 50.0, 120.0, 150.0).unwrap();
        assert_eq!(updates, vec![(a, 60.0), (b, 90.0)]);
    }

    #[test]
    fn rejects_non_splitter_targets() {
        let (stack, _s, [a, _b, _c]) = stack();
        assert_eq!(
            resize(&stack, a, 0.0, 30.0, 150.0),
            Err(LayoutError::NotASplitter(a))
        );
    }
}
