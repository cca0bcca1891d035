//! Windowed event retrieval.
//!
//! Given an item reference from the catalog and an inclusive time window,
//! returns that item's observations shaped as [`EventSample`]s regardless of
//! which relation stores them. Prescriptions come back ordered by start
//! time; every other relation is returned in store order, so callers that
//! chart a series must sort it (see [`sort_samples`]).

mod columns;
mod fetch;
mod types;

pub use columns::*;
pub use fetch::UNKNOWN_DOSE;
pub use types::*;

use rusqlite::Connection;

use crate::catalog::SourceRelation;
use crate::db::DatabaseError;
use fetch::{fetch_prescription_events, fetch_relation_events};

/// Fetches all samples of one item for one admission within
/// `[start_time, end_time]`.
pub fn fetch_events(
    conn: &Connection,
    request: &EventRequest,
) -> Result<Vec<EventSample>, DatabaseError> {
    if request.start_time > request.end_time {
        return Err(DatabaseError::invalid_argument(
            "start_time",
            format!(
                "window start {} is after window end {}",
                request.start_time, request.end_time
            ),
        ));
    }

    let samples = match request.source_relation {
        SourceRelation::Prescription => fetch_prescription_events(conn, request)?,
        relation => fetch_relation_events(conn, request, &semantics_for(relation))?,
    };

    tracing::debug!(
        relation = %request.source_relation,
        item_id = request.item_id,
        samples = samples.len(),
        "Events fetched"
    );
    Ok(samples)
}

/// Orders samples chronologically by their time anchor.
pub fn sort_samples(samples: &mut [EventSample]) {
    samples.sort_by(|a, b| a.time_anchor.cmp(&b.time_anchor));
}

/// Fetches and sorts, ready for plotting.
pub fn fetch_series(conn: &Connection, request: EventRequest) -> Result<EventSeries, DatabaseError> {
    let mut samples = fetch_events(conn, &request)?;
    sort_samples(&mut samples);
    Ok(EventSeries { request, samples })
}

// ── Tests ──────────────────────────────────────────────────────────────────
