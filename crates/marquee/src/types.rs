//! Core record types: list stubs, enrichment records and merged output.

use serde::{Deserialize, Serialize};

/// Maximum number of actors kept per enrichment record.
pub const TOP_ACTORS: usize = 3;

/// An entity as described by the ranked list, before enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStub {
    /// Display name from the list entry.
    pub title: String,
    /// Detail resource with the host stripped, e.g. `/title/tt0111161/`.
    pub detail_ref: String,
    /// Absolute detail URL exactly as the list gave it.
    pub detail_url: Option<String>,
    /// Aggregate rating value, usually out of 10.
    pub rating: Option<f64>,
    /// Number of ratings behind `rating`.
    pub vote_count: Option<u64>,
    /// Genre names in the order the list gave them.
    pub genres: Vec<String>,
    /// ISO-8601 duration token such as `PT2H22M`, unparsed.
    pub runtime: Option<String>,
    /// Short synopsis.
    pub description: Option<String>,
}

impl EntityStub {
    /// Genres joined with `", "`, or `None` if the list gave none.
    pub fn genre_label(&self) -> Option<String> {
        if self.genres.is_empty() {
            None
        } else {
            Some(self.genres.join(", "))
        }
    }
}

/// Secondary attributes scraped from one detail page.
///
/// Always produced, possibly with every field absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// First credited director.
    pub director: Option<String>,
    /// Leading cast, at most [`TOP_ACTORS`] names.
    pub top_actors: Vec<String>,
    /// Content rating such as `R` or `PG-13`.
    pub certificate: Option<String>,
    pub metascore: Option<String>,
    /// Release date text as displayed.
    pub release_info: Option<String>,
    /// Awards summary line, e.g. `21 wins & 43 nominations`.
    pub awards: Option<String>,
    /// Budget text including currency and qualifiers.
    pub budget: Option<String>,
    /// Gross text including currency.
    pub box_office: Option<String>,
}

impl EnrichmentRecord {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A stub joined with its enrichment, keyed by list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// 1-based position in the source list.
    pub rank: usize,
    pub title: String,
    pub detail_ref: String,
    pub detail_url: Option<String>,
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: Vec<String>,
    pub runtime: Option<String>,
    pub description: Option<String>,
    pub director: Option<String>,
    pub top_actors: Vec<String>,
    pub certificate: Option<String>,
    pub metascore: Option<String>,
    pub release_info: Option<String>,
    pub awards: Option<String>,
    pub budget: Option<String>,
    pub box_office: Option<String>,
}

impl MergedRecord {
    pub fn new(index: usize, stub: EntityStub, enrichment: EnrichmentRecord) -> Self {
        Self {
            rank: index + 1,
            title: stub.title,
            detail_ref: stub.detail_ref,
            detail_url: stub.detail_url,
            rating: stub.rating,
            vote_count: stub.vote_count,
            genres: stub.genres,
            runtime: stub.runtime,
            description: stub.description,
            director: enrichment.director,
            top_actors: enrichment.top_actors,
            certificate: enrichment.certificate,
            metascore: enrichment.metascore,
            release_info: enrichment.release_info,
            awards: enrichment.awards,
            budget: enrichment.budget,
            box_office: enrichment.box_office,
        }
    }

    /// Genres joined with `", "`.
    pub fn genre_label(&self) -> Option<String> {
        if self.genres.is_empty() {
            None
        } else {
            Some(self.genres.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_label() {
        let mut stub = EntityStub::default();
        assert_eq!(stub.genre_label(), None);
        stub.genres = vec!["Crime".into(), "Drama".into()];
        assert_eq!(stub.genre_label().as_deref(), Some("Crime, Drama"));
    }

    #[test]
    fn test_merged_record_rank_is_one_based() {
        let stub = EntityStub {
            title: "The Godfather".into(),
            detail_ref: "/title/tt0068646/".into(),
            ..Default::default()
        };
        let enrichment = EnrichmentRecord {
            director: Some("Francis Ford Coppola".into()),
            ..Default::default()
        };
        let merged = MergedRecord::new(1, stub, enrichment);
        assert_eq!(merged.rank, 2);
        assert_eq!(merged.title, "The Godfather");
        assert_eq!(merged.director.as_deref(), Some("Francis Ford Coppola"));
        assert!(merged.budget.is_none());
    }

    #[test]
    fn test_empty_enrichment() {
        assert!(EnrichmentRecord::default().is_empty());
        let r = EnrichmentRecord {
            top_actors: vec!["A".into()],
            ..Default::default()
        };
        assert!(!r.is_empty());
    }
}
