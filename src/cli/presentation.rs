//! CLI presentation: text and json formatters per command family.

use crate::config::ValidationError;
use crate::error::ApiError;
use crate::page::{PageOutcome, HYDRATION_KEY};
use crate::pages::RouteInfo;
use crate::render::{JsonRenderer, PageRenderer};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn value_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array[{}]", items.len()),
        Value::Object(map) => format!("object{{{}}}", map.len()),
    }
}

pub fn format_page_outcome_text(route: &str, outcome: &PageOutcome) -> String {
    let page = match outcome {
        PageOutcome::NotFound => {
            return format!("{} {}\n", "Not found:".yellow(), route);
        }
        PageOutcome::Rendered(page) => page,
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(&format!("Page {}", page.route))));
    out.push_str(&format!("  Revalidate after: {}s\n", page.revalidate_after_seconds));
    out.push_str(&format!("  Generated at: {}\n\n", page.generated_at.to_rfc3339()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Prop", "Shape"]);
    for (key, value) in &page.props {
        if key == HYDRATION_KEY {
            continue;
        }
        table.add_row(vec![key.clone(), value_shape(value)]);
    }
    out.push_str(&format!("{}\n\n", table));

    let snapshot_entries = page
        .hydration_snapshot()
        .and_then(Value::as_object)
        .map(|entries| entries.len())
        .unwrap_or(0);
    out.push_str(&format!(
        "  Hydration snapshot ({}): {} entr{}\n",
        HYDRATION_KEY,
        snapshot_entries,
        if snapshot_entries == 1 { "y" } else { "ies" }
    ));
    out
}

pub fn format_page_outcome_json(outcome: &PageOutcome) -> Result<String, ApiError> {
    match outcome {
        PageOutcome::Rendered(page) => JsonRenderer::pretty().render(page),
        PageOutcome::NotFound => Ok(serde_json::to_string_pretty(outcome)?),
    }
}

pub fn format_routes_text(routes: &[RouteInfo]) -> String {
    if routes.is_empty() {
        return "No page routes registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Route", "Description"]);
    for route in routes {
        table.add_row(vec![route.route.clone(), route.description.clone()]);
    }
    format!("{}\n\nTotal: {} route(s)", table, routes.len())
}

pub fn format_routes_json(routes: &[RouteInfo]) -> String {
    let out = json!({ "routes": routes, "total": routes.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_config_validation_text(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return format!("{} Configuration is valid", "✓".green());
    }
    let mut out = format!("{} Configuration has {} error(s):\n", "✗".red(), errors.len());
    for error in errors {
        out.push_str(&format!("  - {}\n", error));
    }
    out
}
