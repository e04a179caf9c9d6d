// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Every lookup table and threshold a renderer might want to change lives
//! here instead of in code. Every field has a default, so an empty JSON
//! object (or no file at all) gives the stock behavior.
//!
//! ```json
//! {
//!   "matrix": { "maxDisplay": 20, "diagonal": "exclude" },
//!   "discontinuity": { "high_below": 0.2, "medium_below": 0.4 },
//!   "locate": { "strategy": "twoPass" },
//!   "palette": { "veryHigh": "0.8-1.0", "veryLow": "0.0-0.2" },
//!   "severity_labels": { "high": "High", "medium": "Medium" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::locate::LocateStrategy;
use crate::matrix::{BucketPalette, MatrixOptions};
use crate::overlap::SeverityThresholds;
use crate::types::Severity;

/// Locator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateConfig {
    pub strategy: LocateStrategy,
}

/// Display labels for discontinuity severities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityLabels(pub BTreeMap<Severity, String>);

impl Default for SeverityLabels {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Severity::High, "High".to_string()),
            (Severity::Medium, "Medium".to_string()),
        ]))
    }
}

impl SeverityLabels {
    /// Label for `severity`, or its lowercase name if the table has none.
    pub fn label(&self, severity: Severity) -> &str {
        self.0
            .get(&severity)
            .map_or(severity.as_str(), String::as_str)
    }
}

/// Everything the render pipelines read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matrix: MatrixOptions,
    pub discontinuity: SeverityThresholds,
    pub locate: LocateConfig,
    pub palette: BucketPalette,
    pub severity_labels: SeverityLabels,
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Thresholds ordered and in `[0, 1]`; display cap positive.
    pub fn validate(&self) -> Result<()> {
        let SeverityThresholds {
            high_below,
            medium_below,
        } = self.discontinuity;
        for (name, value) in [("high_below", high_below), ("medium_below", medium_below)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "discontinuity.{name} = {value} is outside [0, 1]"
                )));
            }
        }
        if high_below > medium_below {
            return Err(Error::InvalidConfig(format!(
                "discontinuity.high_below ({high_below}) exceeds medium_below ({medium_below})"
            )));
        }
        if self.matrix.max_display == Some(0) {
            return Err(Error::InvalidConfig(
                "matrix.maxDisplay must be positive (use null for no cap)".to_string(),
            ));
        }
        Ok(())
    }
}
