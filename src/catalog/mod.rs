//! Item catalog for an admission.
//!
//! Enumerates every measurement, device and medication item that has at
//! least one observation for a (subject, admission) pair, across the six ICU
//! event tables, lab results and prescriptions, in a single unified shape.
//! Prescriptions have no native item code and get a surrogate id derived
//! from their (drug, route) key.

mod browse;
mod surrogate;
mod types;
mod unify;

pub use browse::*;
pub use surrogate::*;
pub use types::*;
pub use unify::unify_catalog;
pub(crate) use unify::{prescription_pairs, PrescriptionPair};

// ── Tests ──────────────────────────────────────────────────────────────────
