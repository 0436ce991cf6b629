//! SQLite-backed shipment record store.
//!
//! All operations are atomic single-record statements. Uniqueness of the
//! tracking number is enforced by the `UNIQUE` column constraint, never by a
//! check-then-insert in the caller, so concurrent creates cannot race past
//! it. Identifiers come from `AUTOINCREMENT` and are therefore monotonic for
//! the lifetime of a store, even across deletes.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{NewShipment, Shipment, ShipmentPage, ShipmentPatch};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS shipments (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    tracking_number   TEXT NOT NULL UNIQUE,
    shipper           TEXT NOT NULL,
    consignee         TEXT NOT NULL,
    origin            TEXT NOT NULL,
    destination       TEXT NOT NULL,
    carrier           TEXT,
    status            TEXT NOT NULL DEFAULT 'created',
    pieces            INTEGER NOT NULL DEFAULT 1,
    weight_kg         REAL NOT NULL DEFAULT 0,
    cost              REAL NOT NULL DEFAULT 0,
    pickup_date       TEXT,
    expected_delivery TEXT,
    delivered_at      TEXT,
    notes             TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);
"#;

/// Handle over the shipments table of a SQLite database.
///
/// Opening a store ensures the schema exists, so the first request served
/// after process startup always finds the table in place.
pub struct ShipmentStore {
    conn: Connection,
}

impl ShipmentStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening shipment store");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store, used by tests and throwaway tooling.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Validate and persist a new shipment, assigning `id` and timestamps.
    pub fn insert(&self, new: &NewShipment) -> Result<Shipment> {
        new.validate()?;

        let now = Utc::now();
        self.conn
            .execute(
                r#"
                INSERT INTO shipments (
                    tracking_number, shipper, consignee, origin, destination,
                    carrier, status, pieces, weight_kg, cost,
                    pickup_date, expected_delivery, delivered_at, notes,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
                params![
                    new.tracking_number,
                    new.shipper,
                    new.consignee,
                    new.origin,
                    new.destination,
                    new.carrier,
                    new.status,
                    new.pieces,
                    new.weight_kg,
                    new.cost,
                    new.pickup_date,
                    new.expected_delivery,
                    new.delivered_at,
                    new.notes,
                    now,
                    now,
                ],
            )
            .map_err(|err| map_constraint_error(err, &new.tracking_number))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, tracking_number = %new.tracking_number, "shipment inserted");
        self.get(id)
    }

    /// Look up a shipment by its primary key.
    pub fn get(&self, id: i64) -> Result<Shipment> {
        self.conn
            .query_row(
                "SELECT * FROM shipments WHERE id = ?1",
                params![id],
                row_to_shipment,
            )
            .optional()?
            .ok_or(Error::NotFound { id })
    }

    /// Apply a sparse patch to an existing shipment.
    ///
    /// Only fields present in the patch overwrite stored values. The patched
    /// record is validated before the write, and `updated_at` is refreshed
    /// even when the patch is empty.
    pub fn update(&self, id: i64, patch: &ShipmentPatch) -> Result<Shipment> {
        let mut shipment = self.get(id)?;
        patch.apply(&mut shipment);
        shipment.validate()?;
        shipment.updated_at = Utc::now();

        self.conn
            .execute(
                r#"
                UPDATE shipments SET
                    tracking_number = ?1, shipper = ?2, consignee = ?3,
                    origin = ?4, destination = ?5, carrier = ?6, status = ?7,
                    pieces = ?8, weight_kg = ?9, cost = ?10, pickup_date = ?11,
                    expected_delivery = ?12, delivered_at = ?13, notes = ?14,
                    updated_at = ?15
                WHERE id = ?16
                "#,
                params![
                    shipment.tracking_number,
                    shipment.shipper,
                    shipment.consignee,
                    shipment.origin,
                    shipment.destination,
                    shipment.carrier,
                    shipment.status,
                    shipment.pieces,
                    shipment.weight_kg,
                    shipment.cost,
                    shipment.pickup_date,
                    shipment.expected_delivery,
                    shipment.delivered_at,
                    shipment.notes,
                    shipment.updated_at,
                    id,
                ],
            )
            .map_err(|err| map_constraint_error(err, &shipment.tracking_number))?;

        debug!(id, "shipment updated");
        self.get(id)
    }

    /// Permanently remove a shipment. There is no tombstone; a later create
    /// may reuse the freed tracking number, but never the freed id.
    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM shipments WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound { id });
        }
        debug!(id, "shipment deleted");
        Ok(())
    }

    /// Fetch one page ordered by descending id, plus the unfiltered total.
    ///
    /// Ids are assigned monotonically, so descending id order is equivalent
    /// to most-recently-created first. Callers clamp `limit` and `offset`
    /// before this point.
    pub fn page(&self, limit: i64, offset: i64) -> Result<ShipmentPage> {
        let total = self.count()?;
        let mut stmt = self.conn.prepare(
            "SELECT * FROM shipments ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let items = stmt
            .query_map(params![limit, offset], row_to_shipment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ShipmentPage { total, items })
    }

    /// Count all stored shipments.
    pub fn count(&self) -> Result<i64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM shipments", [], |row| row.get(0))?;
        Ok(total)
    }

    /// Remove every stored shipment, returning how many were deleted.
    ///
    /// Used by the seeding utility's `--reset` flag; production traffic never
    /// calls this.
    pub fn clear(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM shipments", [])?;
        Ok(removed)
    }
}

impl std::fmt::Debug for ShipmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShipmentStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

fn row_to_shipment(row: &Row<'_>) -> rusqlite::Result<Shipment> {
    Ok(Shipment {
        id: row.get("id")?,
        tracking_number: row.get("tracking_number")?,
        shipper: row.get("shipper")?,
        consignee: row.get("consignee")?,
        origin: row.get("origin")?,
        destination: row.get("destination")?,
        carrier: row.get("carrier")?,
        status: row.get("status")?,
        pieces: row.get("pieces")?,
        weight_kg: row.get("weight_kg")?,
        cost: row.get("cost")?,
        pickup_date: row.get("pickup_date")?,
        expected_delivery: row.get("expected_delivery")?,
        delivered_at: row.get("delivered_at")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Translate a SQLite unique-constraint failure into the domain conflict
/// error; everything else passes through as a store error.
fn map_constraint_error(err: rusqlite::Error, tracking_number: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateTrackingNumber {
                tracking_number: tracking_number.to_string(),
            }
        }
        _ => Error::Sqlite(err),
    }
}
