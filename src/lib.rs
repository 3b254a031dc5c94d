// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A vertical split-panel layout engine: an ordered stack of fixed, auto,
//! and splitter panels in a fixed-height container, with fill distribution
//! and cascading drag resize.

pub mod config;
pub mod engine;
pub mod log;
pub mod model;
