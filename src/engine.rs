// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defines the [`LayoutEngine`], the event-driven layer around the sizing
//! model.
//!
//! The engine owns the panel stack and translates collaborator events into
//! model operations: viewport resizes become fill passes, pointer gestures
//! become a drag session whose release runs the cascade resizer. Heights are
//! never written mid-gesture; the release queues a batch that the host
//! flushes at its next paint tick.

use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::model::{
    CommitQueue, DragRange, FillOutcome, LayoutError, Panel, PanelId, PanelOptions, PanelStack,
    refresh, resize,
};

/// State for one active drag gesture.
///
/// Constructed when a pointer goes down on a splitter handle and destroyed
/// unconditionally when the gesture ends, whether by release or
/// cancellation.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    splitter: PanelId,
    /// Offset between the pointer and the splitter's top edge at drag
    /// start; subtracted from every later pointer position.
    offset_y: f64,
    /// The splitter's top edge at drag start.
    start_y: f64,
    range: DragRange,
    last_pointer_y: f64,
}

/// Result of flushing the pending commit batch.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushOutcome {
    /// Heights applied from the queued drag batch.
    pub applied: Vec<(PanelId, f64)>,
    /// The fill pass that ran after the batch, keeping auto panels
    /// consistent.
    pub fill: FillOutcome,
}

pub struct LayoutEngine {
    stack: PanelStack,
    container_height: f64,
    queue: CommitQueue,
    session: Option<DragSession>,
}

impl LayoutEngine {
    pub fn new(container_height: f64) -> Self {
        LayoutEngine {
            stack: PanelStack::new(),
            container_height: container_height.max(0.0),
            queue: CommitQueue::new(),
            session: None,
        }
    }

    /// Build an engine from a validated configuration and run the initial
    /// fill pass. Every panel is registered under its stack index as the
    /// external handle.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, LayoutError> {
        let mut engine = LayoutEngine::new(config.container_height);
        for (index, entry) in config.panels.iter().enumerate() {
            engine.add_panel(entry.options().with_handle(index as u64))?;
        }
        let _ = engine.refresh();
        Ok(engine)
    }

    pub fn add_panel(&mut self, options: PanelOptions) -> Result<PanelId, LayoutError> {
        let id = self.stack.add(options)?;
        debug!(?id, ?options, "panel added");
        Ok(id)
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.stack.get(id)
    }

    pub fn stack(&self) -> &PanelStack {
        &self.stack
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    /// Record a new container extent. Call [`refresh`](Self::refresh)
    /// afterwards to redistribute heights.
    pub fn set_container_height(&mut self, height: f64) {
        self.container_height = height.max(0.0);
    }

    /// Re-run fill distribution so auto panels consume the space left over
    /// by fixed panels.
    pub fn refresh(&mut self) -> FillOutcome {
        refresh(&mut self.stack, self.container_height)
    }

    /// Current `(id, height)` assignments in stack order.
    pub fn heights(&self) -> Vec<(PanelId, f64)> {
        self.stack.heights()
    }

    /// Pointer down on a splitter's drag handle. Returns the initial guide
    /// position.
    pub fn begin_drag_resize(&mut self, handle: u64, pointer_y: f64) -> Result<f64, LayoutError> {
        if self.session.is_some() {
            return Err(LayoutError::DragInProgress);
        }
        let splitter = self
            .stack
            .panel_at_handle(handle)
            .ok_or(LayoutError::UnknownHandle(handle))?;
        let panel = self.stack.get(splitter).ok_or(LayoutError::NotFound(splitter))?;
        if !panel.is_splitter() {
            return Err(LayoutError::NotASplitter(splitter));
        }

        let start_y = self.stack.offset_of(splitter).ok_or(LayoutError::NotFound(splitter))?;
        let range = DragRange::base(&self.stack, splitter, self.container_height)?;
        let offset_y = pointer_y - start_y;
        let guide = range.clamp(start_y);

        self.session = Some(DragSession {
            splitter,
            offset_y,
            start_y,
            range,
            last_pointer_y: pointer_y,
        });
        debug!(?splitter, start_y, "drag started");
        Ok(guide)
    }

    /// Pointer moved during a gesture. Returns the clamped guide position;
    /// panel heights are untouched until release. `None` when no gesture is
    /// active.
    pub fn update_drag_resize(&mut self, pointer_y: f64) -> Option<f64> {
        let session = self.session.as_mut()?;
        session.last_pointer_y = pointer_y;
        Some(session.range.clamp(pointer_y - session.offset_y))
    }

    /// Pointer released: run the cascade at the final clamped position and
    /// queue the resulting batch. The session is destroyed on every exit
    /// path.
    pub fn end_drag_resize(
        &mut self,
        pointer_y: f64,
    ) -> Result<Vec<(PanelId, f64)>, LayoutError> {
        let Some(session) = self.session.take() else {
            debug!("drag end without an active gesture");
            return Ok(Vec::new());
        };

        // The commit-time range also reserves sibling splitter thickness and
        // caps the displacement at what the cascade can absorb.
        let range = session
            .range
            .narrowed_by_siblings(&self.stack, session.splitter)
            .narrowed_by_capacity(
                &self.stack,
                session.splitter,
                session.start_y,
                self.container_height,
            );
        let mouse_y = range.clamp(pointer_y - session.offset_y);

        let updates = resize(
            &self.stack,
            session.splitter,
            session.start_y,
            mouse_y,
            self.container_height,
        )?;
        debug!(splitter = ?session.splitter, mouse_y, count = updates.len(), "drag committed");
        self.queue.extend(updates.iter().copied());
        Ok(updates)
    }

    /// An aborted gesture (focus loss, device removal) is treated as a
    /// release at the last observed pointer position.
    pub fn cancel_drag_state(&mut self) {
        let Some(last) = self.session.as_ref().map(|s| s.last_pointer_y) else {
            return;
        };
        if let Err(e) = self.end_drag_resize(last) {
            warn!("drag cancellation failed to commit: {e}");
        }
    }

    pub fn has_drag_state(&self) -> bool {
        self.session.is_some()
    }

    /// The splitter currently being dragged, for "active handle" styling.
    pub fn active_splitter(&self) -> Option<PanelId> {
        self.session.as_ref().map(|s| s.splitter)
    }

    /// Apply the queued batch at the host's paint tick, then re-run fill so
    /// auto panels stay consistent with the new explicit heights.
    pub fn flush_pending(&mut self) -> FlushOutcome {
        if self.queue.is_empty() {
            return FlushOutcome::default();
        }
        let applied = self.queue.flush(&mut self.stack);
        let fill = self.refresh();
        debug!(count = applied.len(), "flushed pending heights");
        FlushOutcome { applied, fill }
    }
}
