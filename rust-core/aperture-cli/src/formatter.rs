// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Output formatters for `aperture` reports.
//!
//! - **Table**: human-readable grid using `comfy-table`.
//! - **JSON**: pretty-printed serde output for scripts.

use serde::Serialize;
use std::fmt;

use crate::report::Render;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown format '{other}'. Valid formats: table, json")),
        }
    }
}

/// Render a report in the selected format.
pub fn format_report<R>(report: &R, format: OutputFormat) -> serde_json::Result<String>
where
    R: Serialize + Render,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Table => Ok(report.table().to_string()),
    }
}
