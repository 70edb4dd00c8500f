//! Render layer interface: turns rendered page props into output.

use crate::error::ApiError;
use crate::page::{PageOutcome, RenderedPage};

pub trait PageRenderer {
    fn render(&self, page: &RenderedPage) -> Result<String, ApiError>;
}

/// Emits the runtime's JSON page payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl PageRenderer for JsonRenderer {
    fn render(&self, page: &RenderedPage) -> Result<String, ApiError> {
        let outcome = PageOutcome::Rendered(page.clone());
        let out = if self.pretty {
            serde_json::to_string_pretty(&outcome)?
        } else {
            serde_json::to_string(&outcome)?
        };
        Ok(out)
    }
}
