//! Page results handed back to the static-generation runtime.

use crate::page::definition::HYDRATION_KEY;
use crate::types::Props;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub route: String,
    pub props: Props,
    /// Maximum staleness before the page is regenerated.
    pub revalidate_after_seconds: u64,
    pub generated_at: DateTime<Utc>,
}

impl RenderedPage {
    pub fn hydration_snapshot(&self) -> Option<&Value> {
        self.props.get(HYDRATION_KEY)
    }
}

/// Terminal result of a page invocation. Propagated failures travel as `Err(PageError)`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Rendered(RenderedPage),
    NotFound,
}

impl PageOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, PageOutcome::Rendered(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PageOutcome::NotFound)
    }

    pub fn rendered(&self) -> Option<&RenderedPage> {
        match self {
            PageOutcome::Rendered(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }

    pub fn into_rendered(self) -> Option<RenderedPage> {
        match self {
            PageOutcome::Rendered(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum RuntimeShape<'a> {
    Rendered { props: &'a Props, revalidate: u64 },
    NotFound {
        #[serde(rename = "notFound")]
        not_found: bool,
    },
}

/// `{"props": {...}, "revalidate": N}` or `{"notFound": true}`.
impl Serialize for PageOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shape = match self {
            PageOutcome::Rendered(page) => RuntimeShape::Rendered {
                props: &page.props,
                revalidate: page.revalidate_after_seconds,
            },
            PageOutcome::NotFound => RuntimeShape::NotFound { not_found: true },
        };
        shape.serialize(serializer)
    }
}
