//! Shiptrack library entry points.
//!
//! This crate defines the shipment record shapes, the validation rules that
//! guard them, and the SQLite-backed store the service persists them in.
//! Higher-level consumers (the HTTP service, the seeding CLI) should only
//! depend on the types exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use model::{
    NewShipment, Shipment, ShipmentPage, ShipmentPatch, ShipmentStatus, MAX_LOCATION_LEN,
    MAX_NOTES_LEN, MAX_PARTY_LEN, MAX_TRACKING_NUMBER_LEN,
};
pub use store::ShipmentStore;
