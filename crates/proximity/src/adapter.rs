//! Listing distance-sort adapter.
//!
//! Listing pages fetch candidates from storage quality-ordered (rating
//! desc, review count desc). When the caller has a user coordinate, the
//! adapter over-fetches, re-ranks by distance to each listing's primary
//! address and truncates to the page size. Without a coordinate it skips
//! all distance work and returns the quality order as-is; this is a
//! cost-saving short-circuit, not a degraded mode.

use crate::entity::GeoTagged;
use crate::rank::{entity_distance, Ranked};
use garilink_geo::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Over-fetch multiplier leaving room for distance re-ranking.
pub const OVERFETCH_FACTOR: usize = 2;

/// The kind of listing a page is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// A bookable service (oil change, diagnostics, ...).
    Service,
    /// A spare part or accessory.
    Product,
    /// A garage or shop as a whole.
    Business,
}

/// Failure fetching candidates from storage.
///
/// Propagated to the caller untouched; the adapter adds no retry or
/// fallback of its own.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The storage query failed.
    #[error("listing fetch failed: {0}")]
    Unavailable(String),
}

/// Error code for integration with GariLink error handling.
/// Range: 12xxx for proximity errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    /// The storage query failed
    Unavailable = 12001,
}

impl SourceError {
    /// Returns the error code for this error.
    #[must_use]
    pub fn code(&self) -> SourceErrorCode {
        match self {
            SourceError::Unavailable(_) => SourceErrorCode::Unavailable,
        }
    }
}

/// Injected storage query interface.
///
/// Implementations return candidates ordered by their quality heuristic
/// (rating desc, review count desc); the adapter never re-derives that
/// order.
#[allow(async_fn_in_trait)]
pub trait ListingSource: Send + Sync {
    /// The listing type this source yields.
    type Item: GeoTagged;

    /// Fetches up to `limit` candidates, quality-ordered.
    ///
    /// # Errors
    /// [`SourceError`] when the storage query fails.
    async fn fetch_top_rated(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<Self::Item>, SourceError>;
}

/// Fetches a page of listings, re-ranked by distance when possible.
///
/// With a user coordinate: fetches `page_size * 2` candidates, orders
/// them by distance to their primary address (listings without a
/// geocoded address sort last, never error) and truncates. Without one:
/// fetches and returns the quality order directly.
///
/// # Errors
/// [`SourceError`] from the underlying fetch.
#[instrument(skip(source))]
pub async fn nearby_listings<S: ListingSource>(
    source: &S,
    kind: ListingKind,
    user: Option<Coordinate>,
    page_size: usize,
) -> Result<Vec<Ranked<S::Item>>, SourceError> {
    let Some(origin) = user else {
        let mut items = source.fetch_top_rated(kind, page_size).await?;
        items.truncate(page_size);
        debug!(returned = items.len(), "no user location, keeping quality order");
        return Ok(items
            .into_iter()
            .map(|entity| Ranked { entity, distance_km: None })
            .collect());
    };

    let candidates = source
        .fetch_top_rated(kind, page_size * OVERFETCH_FACTOR)
        .await?;
    let fetched = candidates.len();

    let mut ranked: Vec<(S::Item, f64)> = candidates
        .into_iter()
        .map(|entity| {
            let d = entity_distance(origin, &entity);
            (entity, d)
        })
        .collect();

    // Stable sort: infinite distances (unlocated listings) settle at the
    // end in their quality order.
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(page_size);

    debug!(fetched, returned = ranked.len(), "re-ranked listings by distance");

    Ok(ranked
        .into_iter()
        .map(|(entity, d)| Ranked {
            entity,
            distance_km: d.is_finite().then_some(d),
        })
        .collect())
}
