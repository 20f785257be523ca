//! Tree rendering of error chains.
//!
//! A chain renders as a staircase: the head on the first line, then every
//! cause one indent group deeper than the one before it.
//!
//! ```text
//! {"error": "outer", "data": {"location": "X"}}
//!   L {"error": "inner", "data": {"code": 1337}}
//!       L {"error": "root"}
//! ```

use crate::config::RenderConfig;
use crate::node::ErrorNode;

/// Renderer for error chains.
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    config: RenderConfig,
}

impl TreeRenderer {
    /// Create a renderer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom settings.
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Settings this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a chain, one node per line, each line newline-terminated.
    pub fn render(&self, head: &ErrorNode) -> String {
        let mut output = head.to_json();
        output.push('\n');

        let mut depth = 0;
        for node in head.iter().skip(1) {
            if self.config.skip_empty && node.is_empty() {
                continue;
            }

            output.push_str(&self.config.indent.repeat(depth));
            output.push_str(&self.config.marker);
            output.push_str(&node.to_json());
            output.push('\n');
            depth += 1;
        }

        output
    }
}
