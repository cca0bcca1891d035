//! API endpoint handlers.
//!
//! Handlers are thin: open the stores, call the library operation, wrap the
//! result in JSON.

pub mod catalog;
pub mod ecg;
pub mod events;
pub mod health;
pub mod notes;
pub mod patients;
