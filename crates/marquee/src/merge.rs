//! Positional join of stubs and enrichment slots.

use crate::types::{EnrichmentRecord, EntityStub, MergedRecord};

/// Join `stubs[i]` with `slots[i]` for every stub.
///
/// The output always has `stubs.len()` records. A missing or `None` slot
/// yields an all-absent enrichment; surplus slots are ignored.
pub fn merge(stubs: Vec<EntityStub>, slots: Vec<Option<EnrichmentRecord>>) -> Vec<MergedRecord> {
    let mut slots = slots.into_iter();
    stubs
        .into_iter()
        .enumerate()
        .map(|(index, stub)| {
            let enrichment = slots.next().flatten().unwrap_or_default();
            MergedRecord::new(index, stub, enrichment)
        })
        .collect()
}
