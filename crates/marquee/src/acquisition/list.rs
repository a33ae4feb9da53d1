//! List harvesting: index page → ordered entity stubs.

use scraper::Html;
use serde_json::Value;
use tracing::{info, warn};

use super::http_client::PageSource;
use super::structured::{f64_field, first_jsonld, str_field, string_list, u64_field, JsonLdBlock};
use crate::config::EngineConfig;
use crate::error::HarvestError;
use crate::types::EntityStub;

/// Fetch the configured index page and project its item list into stubs.
///
/// Stubs come back in source order. An empty vector means the source list
/// itself was empty; every structural problem is an error instead.
pub async fn harvest_list(
    source: &dyn PageSource,
    config: &EngineConfig,
) -> Result<Vec<EntityStub>, HarvestError> {
    info!(url = %config.base_url, "harvesting list");
    let body = source.fetch(&config.base_url).await?;
    let stubs = parse_list(&body, &config.base_url, config)?;
    info!(count = stubs.len(), "harvested list");
    Ok(stubs)
}

/// Parse an index page body. `url` is only used for error reporting.
pub fn parse_list(
    html: &str,
    url: &str,
    config: &EngineConfig,
) -> Result<Vec<EntityStub>, HarvestError> {
    let document = Html::parse_document(html);
    let payload = match first_jsonld(&document) {
        JsonLdBlock::Decoded(v) => v,
        JsonLdBlock::Absent => {
            return Err(HarvestError::PayloadAbsent {
                url: url.to_string(),
            })
        }
        JsonLdBlock::Malformed(e) => {
            return Err(HarvestError::PayloadMalformed {
                reason: e.to_string(),
            })
        }
    };

    let entries = item_list(&payload).ok_or_else(|| HarvestError::PayloadMalformed {
        reason: "payload has no itemListElement array".to_string(),
    })?;

    let stubs: Vec<EntityStub> = entries
        .iter()
        .map(|entry| stub_from_entry(entry, config))
        .collect();

    let nameless = stubs.iter().filter(|s| s.detail_ref.is_empty()).count();
    if nameless > 0 {
        warn!(count = nameless, "list entries without a detail URL");
    }

    Ok(stubs)
}

/// `itemListElement` of the payload, or of the first `@graph` node carrying one.
fn item_list(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(list) = payload.get("itemListElement").and_then(|l| l.as_array()) {
        return Some(list);
    }
    payload
        .get("@graph")
        .and_then(|g| g.as_array())?
        .iter()
        .find_map(|node| node.get("itemListElement").and_then(|l| l.as_array()))
}

fn stub_from_entry(entry: &Value, config: &EngineConfig) -> EntityStub {
    // ListItem wraps the entity in `item`; bare entries are read as-is.
    let item = entry.get("item").filter(|i| i.is_object()).unwrap_or(entry);

    let detail_url = str_field(item, "url");
    let detail_ref = detail_url
        .as_deref()
        .map(|u| config.relative_ref(u))
        .unwrap_or_default();
    let rating = item.get("aggregateRating");

    EntityStub {
        title: str_field(item, "name").unwrap_or_default(),
        detail_ref,
        detail_url,
        rating: rating.and_then(|r| f64_field(r, "ratingValue")),
        vote_count: rating.and_then(|r| u64_field(r, "ratingCount")),
        genres: string_list(item, "genre"),
        runtime: str_field(item, "duration"),
        description: str_field(item, "description"),
    }
}
