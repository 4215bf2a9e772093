//! SQL schema for the harga SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS prices (
    id           TEXT PRIMARY KEY,      -- hyphenated UUID, store-assigned
    region_id    INTEGER NOT NULL,
    commodity_id INTEGER NOT NULL,
    date         TEXT NOT NULL,         -- YYYY-MM-DD
    price        REAL NOT NULL CHECK (price >= 0),
    created_by   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS prices_date_idx      ON prices(date);
CREATE INDEX IF NOT EXISTS prices_region_idx    ON prices(region_id);
CREATE INDEX IF NOT EXISTS prices_commodity_idx ON prices(commodity_id);

PRAGMA user_version = 1;
";
