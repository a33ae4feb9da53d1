//! Two-stage pipeline: harvest the list, then enrich and merge.

use std::sync::Arc;

use tracing::info;

use crate::acquisition::detail::DetailEnricher;
use crate::acquisition::http_client::{HttpClient, PageSource};
use crate::acquisition::list::harvest_list;
use crate::config::EngineConfig;
use crate::error::{HarvestError, MarqueeResult};
use crate::governor::Governor;
use crate::types::{EntityStub, MergedRecord};

/// Harvester, enricher and governor wired to one configuration.
#[derive(Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    source: Arc<dyn PageSource>,
}

impl Engine {
    /// Build an engine that fetches over HTTP.
    pub fn new(config: EngineConfig) -> MarqueeResult<Self> {
        config.validate()?;
        let client = HttpClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            source: Arc::new(client),
        })
    }

    /// Build an engine over any page source.
    pub fn with_source(config: EngineConfig, source: Arc<dyn PageSource>) -> MarqueeResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            source,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn enricher(&self) -> DetailEnricher {
        DetailEnricher::new(self.source.clone(), self.config.clone())
    }

    pub fn governor(&self) -> Governor {
        Governor::new(self.config.concurrency)
    }

    /// Stage one: the ordered stub list.
    pub async fn harvest(&self) -> Result<Vec<EntityStub>, HarvestError> {
        harvest_list(self.source.as_ref(), &self.config).await
    }

    /// Stage two: enrich every stub and merge, preserving order.
    pub async fn acquire_all(&self, stubs: Vec<EntityStub>) -> Vec<MergedRecord> {
        self.governor().acquire_all(&self.enricher(), stubs).await
    }

    /// Both stages. A harvest failure returns before any detail fetch.
    pub async fn run(&self) -> MarqueeResult<Vec<MergedRecord>> {
        let stubs = self.harvest().await?;
        let records = self.acquire_all(stubs).await;
        info!(records = records.len(), "run complete");
        Ok(records)
    }
}
