//! Detail enrichment: one detail page → one [`EnrichmentRecord`].
//!
//! Two extraction passes run over the same document:
//!
//! 1. **Structured**: the page's JSON-LD block supplies the director and the
//!    leading actors.
//! 2. **Semi-structured**: labelled metadata list items are scanned for
//!    budget, box office and an awards summary, and three singleton anchors
//!    and spans give certificate, release info and metascore.
//!
//! Neither pass treats a missing field as an error. Only a failed fetch or
//! an undecodable JSON-LD block counts as a failure, and even then the
//! caller receives an all-absent record rather than an error.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::http_client::PageSource;
use super::structured::{first_jsonld, names, JsonLdBlock};
use crate::config::EngineConfig;
use crate::error::EnrichmentFailure;
use crate::types::{EnrichmentRecord, EntityStub, TOP_ACTORS};

/// One labelled row of the page's metadata lists.
const METADATA_ITEM: &str = "li.ipc-metadata-list__item";
const METADATA_LABEL: &str = ".ipc-metadata-list-item__label";
const METADATA_VALUE: &str = "span.ipc-metadata-list-item__list-content-item";

const CERTIFICATE_LINK: &str = r#"a[href*="parentalguide"]"#;
const RELEASE_INFO_LINK: &str = r#"a[href*="releaseinfo"]"#;
const METASCORE_SPAN: &str = r#"span[class*="metacritic"]"#;

/// Fetches and extracts detail pages.
///
/// Shares only immutable state, so one enricher serves every worker.
#[derive(Clone)]
pub struct DetailEnricher {
    source: Arc<dyn PageSource>,
    config: Arc<EngineConfig>,
}

impl DetailEnricher {
    pub fn new(source: Arc<dyn PageSource>, config: Arc<EngineConfig>) -> Self {
        Self { source, config }
    }

    /// Enrich the stub at list position `index`. Never fails: any failure
    /// is logged and degrades to an all-absent record.
    pub async fn enrich(&self, index: usize, stub: &EntityStub) -> EnrichmentRecord {
        match self.try_enrich(stub).await {
            Ok(record) => record,
            Err(failure) => self.degrade(index, stub, &failure),
        }
    }

    /// Absolute detail URL for a stub.
    pub fn detail_url(&self, stub: &EntityStub) -> Result<String, EnrichmentFailure> {
        if stub.detail_ref.is_empty() {
            return Err(EnrichmentFailure::MissingDetailRef);
        }
        self.config
            .resolve(&stub.detail_ref)
            .map_err(|e| EnrichmentFailure::InvalidDetailUrl {
                detail_ref: stub.detail_ref.clone(),
                reason: e.to_string(),
            })
    }

    /// Log a failure and return the all-absent record that replaces it.
    pub(crate) fn degrade(
        &self,
        index: usize,
        stub: &EntityStub,
        failure: &EnrichmentFailure,
    ) -> EnrichmentRecord {
        let url = self.detail_url(stub).unwrap_or_default();
        warn!(
            index,
            url = %url,
            title = %stub.title,
            reason = %failure,
            "enrichment degraded to empty record"
        );
        EnrichmentRecord::default()
    }

    /// Enrich one stub, reporting why it failed instead of degrading.
    ///
    /// Sleeps for one throttle sample before the request.
    pub async fn try_enrich(&self, stub: &EntityStub) -> Result<EnrichmentRecord, EnrichmentFailure> {
        let url = self.detail_url(stub)?;

        let delay = self.config.throttle.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let body = self.source.fetch(&url).await?;
        parse_detail(&body)
    }
}

/// Extract an enrichment record from a detail page body.
pub fn parse_detail(html: &str) -> Result<EnrichmentRecord, EnrichmentFailure> {
    let document = Html::parse_document(html);
    let mut record = EnrichmentRecord::default();

    match first_jsonld(&document) {
        JsonLdBlock::Decoded(payload) => {
            record.director = names(&payload, "director").into_iter().next();
            record.top_actors = names(&payload, "actor")
                .into_iter()
                .take(TOP_ACTORS)
                .collect();
        }
        JsonLdBlock::Absent => {}
        JsonLdBlock::Malformed(e) => return Err(e.into()),
    }

    scan_metadata_items(&document, &mut record);

    record.certificate = first_text(&document, CERTIFICATE_LINK);
    record.release_info = first_text(&document, RELEASE_INFO_LINK);
    record.metascore = first_text(&document, METASCORE_SPAN);

    Ok(record)
}

// ── Semi-structured scan ────────────────────────────────────────────────────

/// Scan label/value list items for budget, box office and awards.
///
/// Later matches overwrite earlier ones.
fn scan_metadata_items(document: &Html, record: &mut EnrichmentRecord) {
    let (Ok(item_sel), Ok(label_sel), Ok(value_sel)) = (
        Selector::parse(METADATA_ITEM),
        Selector::parse(METADATA_LABEL),
        Selector::parse(METADATA_VALUE),
    ) else {
        return;
    };

    for item in document.select(&item_sel) {
        let label = item.select(&label_sel).next();
        let value = item.select(&value_sel).next();

        if let (Some(label), Some(value)) = (label, value) {
            let label_text = stripped_text(&label).to_lowercase();
            let value_text = stripped_text(&value);

            if label_text.contains("budget") {
                record.budget = non_empty(value_text);
            } else if label_text.contains("box office") || label_text.contains("gross") {
                record.box_office = non_empty(value_text);
            }
        }

        // Awards rows are recognised by their value alone.
        if let Some(value) = value {
            let raw: String = value.text().collect();
            if raw.contains("wins") {
                record.awards = non_empty(raw.split_whitespace().collect::<Vec<_>>().join(" "));
            }
        }
    }
}

/// Stripped text of the first element matching `css`, absent if none or empty.
fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    let el = document.select(&sel).next()?;
    non_empty(stripped_text(&el))
}

/// Every extracted field treats blank text as absent.
fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Concatenate the element's text nodes, each trimmed, skipping blanks.
fn stripped_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<String>()
}
