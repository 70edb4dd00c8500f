//! CLI domain: parse, route, help, output, and presentation only.
//! No page orchestration here; the route table dispatches to the page runtime.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands, ConfigFormat, OutputFormat};
pub use presentation::{
    format_config_validation_text, format_page_outcome_json, format_page_outcome_text,
    format_routes_json, format_routes_text,
};
pub use route::{parse_param, RunContext};
