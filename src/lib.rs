pub mod config;
pub mod graph;
pub mod json_schema;
pub mod logging;
pub mod schema;
pub mod spec;
pub mod viewport;
