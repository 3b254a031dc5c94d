// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sizing model for a vertical stack of panels: the panel arena and
//! stack order, fill distribution for auto panels, the cascading resize
//! algorithm, drag range clamping, and the deferred commit queue.

mod cascade;
mod clamp;
mod commit;
mod fill;
mod stack;

pub use cascade::resize;
pub use clamp::DragRange;
pub use commit::CommitQueue;
pub use fill::{FillOutcome, refresh};
pub use stack::{Panel, PanelId, PanelOptions, PanelStack};

use thiserror::Error;

/// Tolerance for height comparisons. Heights are device-independent length
/// units accumulated through floating-point arithmetic.
pub(crate) const HEIGHT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error("no panel with id {0:?}")]
    NotFound(PanelId),
    #[error("no panel registered for handle {0}")]
    UnknownHandle(u64),
    #[error("panel {0:?} is not a splitter")]
    NotASplitter(PanelId),
    #[error("a drag gesture is already in progress")]
    DragInProgress,
    #[error("a panel cannot be both a splitter and auto-height")]
    SplitterAutoHeight,
    #[error("minimum height {min} exceeds maximum height {max}")]
    InvalidBounds { min: f64, max: f64 },
    #[error(transparent)]
    Overflow(#[from] Overflow),
}

/// Total height demand exceeded the container. Not fatal: the affected
/// panels sit at their minimum heights and the shortfall is reported.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("panel heights exceed the container by {shortfall}")]
pub struct Overflow {
    pub shortfall: f64,
    /// Panels that could not be given more than their minimum height.
    pub starved: Vec<PanelId>,
}
