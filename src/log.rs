// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::File;
use std::io::{Stderr, stderr};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_tree::time::UtcDateTime;

pub fn init_logging() {
    let pid = std::process::id();
    let logfile = File::create(format!("/tmp/sash.{pid}.log")).unwrap();
    let (file_appender, file_appender_guard) = tracing_appender::non_blocking(logfile);
    let (err_appender, err_appender_guard) = tracing_appender::non_blocking(stderr());
    let original_hook = std::panic::take_hook();
    tracing_subscriber::registry()
        .with(
            tree_layer()
                .with_writer(err_appender)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    let appender_guards = Mutex::new(Some((file_appender_guard, err_appender_guard)));
    std::panic::set_hook(Box::new(move |info| {
        // Flush the appenders before the process goes down.
        if let Ok(mut guards) = appender_guards.try_lock() {
            guards.take();
        }
        original_hook(info);
    }));
}

pub fn tree_layer() -> tracing_tree::HierarchicalLayer<fn() -> Stderr, UtcDateTime> {
    tracing_tree::HierarchicalLayer::default()
        .with_indent_amount(2)
        .with_indent_lines(true)
        .with_deferred_spans(true)
        .with_span_retrace(true)
        .with_targets(true)
        .with_timer(UtcDateTime::default())
}
