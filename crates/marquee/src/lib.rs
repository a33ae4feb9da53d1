//! Harvest a ranked list and enrich every entry from its detail page.
//!
//! The pipeline has two stages. [`harvest_list`] reads the index page's
//! JSON-LD item list into ordered [`EntityStub`]s. [`Governor::acquire_all`]
//! then fetches each stub's detail page on a bounded worker pool and merges
//! the results back into [`MergedRecord`]s in list order. [`Engine`] wires
//! both stages to one [`EngineConfig`].

pub mod acquisition;
pub mod config;
pub mod engine;
pub mod error;
pub mod governor;
pub mod merge;
pub mod types;

pub use acquisition::detail::{parse_detail, DetailEnricher};
pub use acquisition::http_client::{HttpClient, PageSource};
pub use acquisition::list::{harvest_list, parse_list};
pub use config::{EngineConfig, Throttle};
pub use engine::Engine;
pub use error::*;
pub use governor::Governor;
pub use merge::merge;
pub use types::*;
