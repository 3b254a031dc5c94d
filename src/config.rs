// Copyright The Sash Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::PanelOptions;

pub fn config_path_default() -> PathBuf {
    dirs::home_dir().unwrap().join(".sash.toml")
}

/// Declarative description of a panel stack: the container extent and the
/// panels in stacking order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct LayoutConfig {
    pub container_height: f64,
    pub panels: Vec<PanelEntry>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            container_height: 0.0,
            panels: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct PanelEntry {
    pub min_height: f64,
    pub max_height: Option<f64>,
    pub height: f64,
    pub splitter: bool,
    pub auto_height: bool,
}

impl Default for PanelEntry {
    fn default() -> Self {
        PanelEntry {
            min_height: 0.0,
            max_height: None,
            height: 0.0,
            splitter: false,
            auto_height: false,
        }
    }
}

impl PanelEntry {
    pub fn options(&self) -> PanelOptions {
        PanelOptions {
            min_height: self.min_height,
            max_height: self.max_height,
            height: self.height,
            splitter: self.splitter,
            auto_height: self.auto_height,
            handle: None,
        }
    }
}

impl LayoutConfig {
    pub fn load(custom_path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
        let mut buf = String::new();
        let default = config_path_default();
        let (mut file, path) = match custom_path {
            Some(path) => (File::open(path)?, path),
            None => match File::open(&default) {
                Ok(file) => (file, &*default),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(LayoutConfig::default());
                }
                Err(e) => return Err(e.into()),
            },
        };
        file.read_to_string(&mut buf)?;
        Self::parse(&buf).map_err(|e| anyhow::anyhow!("{}", format_toml_error(e, &buf, path)))
    }

    pub(crate) fn parse(buf: &str) -> Result<Self, SpannedError> {
        let config: LayoutConfig = toml::from_str(buf)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, SpannedError> {
        let reject = |message: String| Err(SpannedError { message, span: None });
        if self.container_height < 0.0 {
            return reject(format!(
                "container_height must not be negative (got {})",
                self.container_height
            ));
        }
        for (index, panel) in self.panels.iter().enumerate() {
            if panel.splitter && panel.auto_height {
                return reject(format!(
                    "panel {index} cannot be both a splitter and auto-height"
                ));
            }
            if let Some(max) = panel.max_height
                && panel.min_height > max
            {
                return reject(format!(
                    "panel {index}: min_height {} exceeds max_height {max}",
                    panel.min_height
                ));
            }
            if panel.height < 0.0 || panel.min_height < 0.0 {
                return reject(format!("panel {index}: heights must not be negative"));
            }
        }
        Ok(self)
    }
}

fn format_toml_error(error: SpannedError, input: &str, path: &Path) -> String {
    use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

    let message = error.message;
    let Some(span) = error.span else {
        return format!("could not parse config: {}", message);
    };

    let snippet = Snippet::source(input)
        .path(path.to_string_lossy())
        .annotation(AnnotationKind::Primary.span(span.start..span.end).label(message));

    let report = Level::ERROR.primary_title("could not parse config").element(snippet);

    let renderer = Renderer::styled();
    format!("{}", renderer.render(&[report]))
}

#[derive(Debug)]
pub(crate) struct SpannedError {
    message: String,
    span: Option<Range<usize>>,
}

impl From<toml::de::Error> for SpannedError {
    fn from(e: toml::de::Error) -> Self {
        Self {
            message: e.message().to_owned(),
            span: e.span(),
        }
    }
}
