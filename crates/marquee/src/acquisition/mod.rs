//! HTTP acquisition: fetching, list harvesting and detail extraction.

pub mod detail;
pub mod http_client;
pub mod list;
pub mod structured;
