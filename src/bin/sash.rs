// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use sash::config::LayoutConfig;
use sash::engine::LayoutEngine;
use sash::log;

/// Inspect and exercise vertical split-panel layouts.
#[derive(Parser)]
#[command(version, name = "sash")]
struct Opt {
    /// Path to a layout config file. Defaults to ~/.sash.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Validate the layout config and exit.
    Check,
    /// Print the computed layout after the initial fill pass.
    Show,
    Simulate(CmdSimulate),
}

/// Applies a gesture script to the layout, printing panel heights after
/// each step.
///
/// Script format, one command per line:
///   resize <height>           set the container extent and refresh
///   drag <panel-index> <dy>   drag the splitter at that index by dy
///
/// Blank lines and lines starting with '#' are skipped.
#[derive(Parser, Clone)]
struct CmdSimulate {
    script: PathBuf,
}

fn main() -> Result<(), anyhow::Error> {
    let opt: Opt = Parser::parse();
    log::init_logging();

    let config = LayoutConfig::load(opt.config.as_deref())?;
    match opt.command {
        Command::Check => {
            println!(
                "config ok: {} panels in a {} container",
                config.panels.len(),
                config.container_height
            );
        }
        Command::Show => {
            let engine = LayoutEngine::from_config(&config)?;
            print_layout(&engine);
        }
        Command::Simulate(cmd) => {
            let mut engine = LayoutEngine::from_config(&config)?;
            run_script(&mut engine, &cmd)?;
        }
    }
    Ok(())
}

fn run_script(engine: &mut LayoutEngine, cmd: &CmdSimulate) -> Result<(), anyhow::Error> {
    let script = fs::read_to_string(&cmd.script)
        .with_context(|| format!("could not read script {}", cmd.script.display()))?;

    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let context = || format!("script line {}: {line:?}", number + 1);

        let mut words = line.split_whitespace();
        match words.next() {
            Some("resize") => {
                let height: f64 = parse_arg(&mut words).with_context(context)?;
                engine.set_container_height(height);
                let outcome = engine.refresh();
                if let Some(overflow) = outcome.overflow {
                    eprintln!("warning: {overflow}");
                }
            }
            Some("drag") => {
                let index: u64 = parse_arg(&mut words).with_context(context)?;
                let dy: f64 = parse_arg(&mut words).with_context(context)?;
                let splitter = engine
                    .stack()
                    .panel_at_handle(index)
                    .with_context(|| format!("no panel at index {index}"))
                    .with_context(context)?;
                let top = engine.stack().offset_of(splitter).unwrap_or(0.0);
                engine.begin_drag_resize(index, top).with_context(context)?;
                engine.end_drag_resize(top + dy).with_context(context)?;
                let outcome = engine.flush_pending();
                if let Some(overflow) = outcome.fill.overflow {
                    eprintln!("warning: {overflow}");
                }
            }
            Some(other) => bail!("{}: unknown command {other:?}", context()),
            None => unreachable!("blank lines are skipped"),
        }

        println!("after `{line}`:");
        print_layout(engine);
        println!();
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(words: &mut std::str::SplitWhitespace<'_>) -> Result<T, anyhow::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = words.next().context("missing argument")?;
    word.parse().with_context(|| format!("bad argument {word:?}"))
}

fn print_layout(engine: &LayoutEngine) {
    for (index, (_, panel)) in engine.stack().panels().enumerate() {
        let kind = if panel.is_splitter() {
            "splitter"
        } else if panel.is_auto() {
            "auto"
        } else {
            "fixed"
        };
        println!("  {index:>3}  {kind:<8}  {:>10.2}", panel.height());
    }
    println!(
        "  total {:.2} / container {:.2}",
        engine.stack().total_height(),
        engine.container_height()
    );
}
