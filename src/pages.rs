//! Storefront pages and the route registry used by the generation runtime.

use crate::client::ClientScope;
use crate::error::ApiError;
use crate::page::{PageContext, PageDefinition, PageQuery};
use crate::query::documents;
use serde::Serialize;
use std::collections::BTreeMap;

/// Builds a page definition from route parameters.
pub type PageBuilder = fn(&PageContext) -> Result<PageDefinition, ApiError>;

/// Identifier of the CMS page served at `about-us`.
pub const ABOUT_US_IDENTIFIER: &str = "about-us";

struct RouteEntry {
    description: String,
    builder: PageBuilder,
}

/// Route listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub route: String,
    pub description: String,
}

#[derive(Default)]
pub struct PageRegistry {
    routes: BTreeMap<String, RouteEntry>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the storefront's built-in pages.
    pub fn storefront() -> Self {
        let mut registry = Self::new();
        registry.register("home", "Home page: store config and layout", home_page);
        registry.register(
            "about-us",
            "About Us CMS page",
            about_us_page,
        );
        registry.register(
            "page",
            "CMS page by the 'identifier' route param",
            cms_page,
        );
        registry
    }

    pub fn register(&mut self, route: &str, description: &str, builder: PageBuilder) {
        self.routes.insert(
            route.to_string(),
            RouteEntry {
                description: description.to_string(),
                builder,
            },
        );
    }

    pub fn resolve(&self, route: &str, ctx: &PageContext) -> Result<PageDefinition, ApiError> {
        let entry = self
            .routes
            .get(route)
            .ok_or_else(|| ApiError::UnknownRoute(route.to_string()))?;
        (entry.builder)(ctx)
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .map(|(route, entry)| RouteInfo {
                route: route.clone(),
                description: entry.description.clone(),
            })
            .collect()
    }

    pub fn contains(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }
}

fn store_config_query() -> PageQuery {
    PageQuery::required(documents::store_config(), ClientScope::Shared).snapshot_only()
}

fn layout_query() -> PageQuery {
    PageQuery::required(documents::layout(), ClientScope::Render).spread()
}

pub fn home_page(_ctx: &PageContext) -> Result<PageDefinition, ApiError> {
    Ok(PageDefinition::new("home")
        .with_query(store_config_query())
        .with_query(layout_query()))
}

pub fn about_us_page(_ctx: &PageContext) -> Result<PageDefinition, ApiError> {
    Ok(cms_page_definition("about-us", ABOUT_US_IDENTIFIER))
}

pub fn cms_page(ctx: &PageContext) -> Result<PageDefinition, ApiError> {
    let identifier = ctx
        .param("identifier")
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            ApiError::ConfigError("Route 'page' requires an 'identifier' param".to_string())
        })?;
    Ok(cms_page_definition(&format!("page/{}", identifier), identifier))
}

/// Store config, layout, and the CMS page `identifier` under `cmsPage`.
pub fn cms_page_definition(route: &str, identifier: &str) -> PageDefinition {
    PageDefinition::new(route)
        .with_query(store_config_query())
        .with_query(layout_query())
        .with_query(
            PageQuery::required(documents::cms_page(identifier), ClientScope::Render)
                .field("cmsPage"),
        )
}
