//! Shipment record shapes and field validation.
//!
//! Three shapes derive from the same attribute set:
//!
//! - [`Shipment`]: the stored record, including store-assigned fields.
//! - [`NewShipment`]: the creatable subset; required fields mandatory,
//!   optional fields defaulted.
//! - [`ShipmentPatch`]: the updatable subset; every field optional, and a
//!   field absent from the payload is never applied.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a tracking number, in characters.
pub const MAX_TRACKING_NUMBER_LEN: usize = 64;

/// Maximum length of the shipper, consignee, and carrier fields.
pub const MAX_PARTY_LEN: usize = 120;

/// Maximum length of the origin and destination fields.
pub const MAX_LOCATION_LEN: usize = 160;

/// Maximum length of the free-text notes field.
pub const MAX_NOTES_LEN: usize = 800;

/// Lifecycle state of a shipment.
///
/// Any variant may replace any other in an update; the service deliberately
/// does not enforce a transition order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Created,
    InTransit,
    Delivered,
    Canceled,
}

impl ShipmentStatus {
    /// The wire and storage representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ShipmentStatus::Created => "created",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Canceled => "canceled",
        }
    }

    /// Parse a status from its storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(ShipmentStatus::Created),
            "in_transit" => Some(ShipmentStatus::InTransit),
            "delivered" => Some(ShipmentStatus::Delivered),
            "canceled" => Some(ShipmentStatus::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ShipmentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ShipmentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        ShipmentStatus::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown shipment status '{text}'").into()))
    }
}

/// A stored shipment record, as returned on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Store-assigned identifier, monotonic across creations.
    pub id: i64,
    /// Externally visible unique identifier.
    pub tracking_number: String,
    pub shipper: String,
    pub consignee: String,
    pub origin: String,
    pub destination: String,
    pub carrier: Option<String>,
    pub status: ShipmentStatus,
    pub pieces: i64,
    pub weight_kg: f64,
    pub cost: f64,
    pub pickup_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful mutation.
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Validate the record against the field constraints.
    ///
    /// Called after a patch has been applied, so an update can never leave a
    /// stored record in violation.
    pub fn validate(&self) -> Result<()> {
        check_text("tracking_number", &self.tracking_number, MAX_TRACKING_NUMBER_LEN)?;
        check_text("shipper", &self.shipper, MAX_PARTY_LEN)?;
        check_text("consignee", &self.consignee, MAX_PARTY_LEN)?;
        check_text("origin", &self.origin, MAX_LOCATION_LEN)?;
        check_text("destination", &self.destination, MAX_LOCATION_LEN)?;
        check_optional_text("carrier", self.carrier.as_deref(), MAX_PARTY_LEN)?;
        check_optional_text("notes", self.notes.as_deref(), MAX_NOTES_LEN)?;
        check_pieces(self.pieces)?;
        check_non_negative("weight_kg", self.weight_kg)?;
        check_non_negative("cost", self.cost)?;
        Ok(())
    }
}

/// The creatable subset of a shipment.
///
/// Everything except `id`, `created_at`, and `updated_at`, which the store
/// assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShipment {
    pub tracking_number: String,
    pub shipper: String,
    pub consignee: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default = "default_pieces")]
    pub pieces: i64,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default)]
    pub expected_delivery: Option<NaiveDate>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_pieces() -> i64 {
    1
}

impl NewShipment {
    /// Validate the payload before it reaches the store.
    pub fn validate(&self) -> Result<()> {
        check_text("tracking_number", &self.tracking_number, MAX_TRACKING_NUMBER_LEN)?;
        check_text("shipper", &self.shipper, MAX_PARTY_LEN)?;
        check_text("consignee", &self.consignee, MAX_PARTY_LEN)?;
        check_text("origin", &self.origin, MAX_LOCATION_LEN)?;
        check_text("destination", &self.destination, MAX_LOCATION_LEN)?;
        check_optional_text("carrier", self.carrier.as_deref(), MAX_PARTY_LEN)?;
        check_optional_text("notes", self.notes.as_deref(), MAX_NOTES_LEN)?;
        check_pieces(self.pieces)?;
        check_non_negative("weight_kg", self.weight_kg)?;
        check_non_negative("cost", self.cost)?;
        Ok(())
    }
}

/// A sparse update to a shipment.
///
/// Fields absent from the payload are left untouched, including not being
/// reset to their defaults. For the nullable fields a double `Option` keeps
/// "absent" distinct from "present as null": the outer `Option` records
/// presence, the inner one carries the new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(
        default,
        deserialize_with = "some_if_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub carrier: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ShipmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(
        default,
        deserialize_with = "some_if_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub pickup_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "some_if_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_delivery: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "some_if_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivered_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "some_if_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

/// Deserialize a field that is present in the payload, wrapping it in `Some`
/// so that an explicit `null` can be told apart from an absent field.
fn some_if_present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ShipmentPatch {
    /// Copy every present field onto `shipment`, leaving the rest untouched.
    pub fn apply(&self, shipment: &mut Shipment) {
        if let Some(value) = &self.tracking_number {
            shipment.tracking_number = value.clone();
        }
        if let Some(value) = &self.shipper {
            shipment.shipper = value.clone();
        }
        if let Some(value) = &self.consignee {
            shipment.consignee = value.clone();
        }
        if let Some(value) = &self.origin {
            shipment.origin = value.clone();
        }
        if let Some(value) = &self.destination {
            shipment.destination = value.clone();
        }
        if let Some(value) = &self.carrier {
            shipment.carrier = value.clone();
        }
        if let Some(value) = self.status {
            shipment.status = value;
        }
        if let Some(value) = self.pieces {
            shipment.pieces = value;
        }
        if let Some(value) = self.weight_kg {
            shipment.weight_kg = value;
        }
        if let Some(value) = self.cost {
            shipment.cost = value;
        }
        if let Some(value) = self.pickup_date {
            shipment.pickup_date = value;
        }
        if let Some(value) = self.expected_delivery {
            shipment.expected_delivery = value;
        }
        if let Some(value) = self.delivered_at {
            shipment.delivered_at = value;
        }
        if let Some(value) = &self.notes {
            shipment.notes = value.clone();
        }
    }
}

/// A page of shipments plus the full unfiltered record count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentPage {
    pub total: i64,
    pub items: Vec<Shipment>,
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

fn check_optional_text(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(text) => check_text(field, text, max),
        None => Ok(()),
    }
}

fn check_pieces(pieces: i64) -> Result<()> {
    if pieces < 1 {
        return Err(Error::validation("pieces", "must be at least 1"));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value < 0.0 {
        return Err(Error::validation(field, "must not be negative"));
    }
    Ok(())
}
