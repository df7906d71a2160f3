#[macro_use]
pub mod macros;

pub mod api;
pub mod cache;
pub mod data_collector;
pub mod matches_parser;
pub mod schema;
