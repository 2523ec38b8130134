use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::{ErrorDescriptor, GraphResult};

/// Renders graph results in the JSON shape the layout and presentation
/// layers consume
pub struct JsonGraphFormatter {
    pretty: bool,
}

impl JsonGraphFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_to_file(&self, result: &GraphResult, output_path: &Path) -> Result<()> {
        let json_content = self.format_graph(result)?;
        fs::write(output_path, json_content)?;
        Ok(())
    }

    pub fn format_graph(&self, result: &GraphResult) -> Result<String> {
        self.render(result)
    }

    pub fn format_error(&self, error: &ErrorDescriptor) -> Result<String> {
        self.render(error)
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }
}

impl Default for JsonGraphFormatter {
    fn default() -> Self {
        Self::new()
    }
}
