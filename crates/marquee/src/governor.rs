//! Bounded worker pool for detail enrichment.
//!
//! A fixed number of workers pull index-tagged stubs from one bounded
//! queue and push index-tagged records back. Completion order is arbitrary;
//! results land in a slot per input index, so output order never depends on
//! scheduling.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{info, info_span, warn, Instrument};

use crate::acquisition::detail::DetailEnricher;
use crate::merge::merge;
use crate::types::{EnrichmentRecord, EntityStub, MergedRecord};

/// A finished unit of work: the stub's index, its record, and whether it degraded.
type Completed = (usize, EnrichmentRecord, bool);

/// Admission control for detail fetches.
#[derive(Debug, Clone, Copy)]
pub struct Governor {
    concurrency: usize,
}

impl Governor {
    /// `concurrency` is clamped to at least one worker.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich every stub with at most `concurrency` fetches in flight, then
    /// merge. The output has exactly one record per stub, in stub order.
    pub async fn acquire_all(
        &self,
        enricher: &DetailEnricher,
        stubs: Vec<EntityStub>,
    ) -> Vec<MergedRecord> {
        let slots = self.enrich_all(enricher, &stubs).await;
        merge(stubs, slots)
    }

    /// Run the pool and return one slot per stub.
    ///
    /// A slot stays `None` only if its worker died before reporting.
    pub async fn enrich_all(
        &self,
        enricher: &DetailEnricher,
        stubs: &[EntityStub],
    ) -> Vec<Option<EnrichmentRecord>> {
        let total = stubs.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        info!(total, workers, "enriching");

        let (task_tx, task_rx) = mpsc::channel::<(usize, EntityStub)>(workers);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<Completed>(workers);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let enricher = enricher.clone();

            let worker = async move {
                loop {
                    let next = task_rx.lock().await.recv().await;
                    let Some((index, stub)) = next else {
                        break;
                    };

                    let completed = match enricher.try_enrich(&stub).await {
                        Ok(record) => (index, record, false),
                        Err(failure) => (index, enricher.degrade(index, &stub, &failure), true),
                    };
                    if result_tx.send(completed).await.is_err() {
                        break;
                    }
                }
            };
            handles.push(tokio::spawn(worker.instrument(info_span!("worker", id))));
        }
        // Workers hold the only remaining senders; the collector ends when they exit.
        drop(result_tx);

        let feed = async move {
            for (index, stub) in stubs.iter().enumerate() {
                if task_tx.send((index, stub.clone())).await.is_err() {
                    break;
                }
            }
        };

        let collect = async {
            let mut slots: Vec<Option<EnrichmentRecord>> = vec![None; total];
            let mut degraded = 0usize;
            while let Some((index, record, failed)) = result_rx.recv().await {
                if failed {
                    degraded += 1;
                }
                slots[index] = Some(record);
            }
            (slots, degraded)
        };

        let ((), (slots, degraded)) = tokio::join!(feed, collect);

        for joined in futures::future::join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "enrichment worker did not finish");
            }
        }

        let missing = slots.iter().filter(|s| s.is_none()).count();
        info!(total, degraded, missing, "enrichment finished");
        slots
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CONCURRENCY)
    }
}
