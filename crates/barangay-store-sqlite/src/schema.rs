//! SQL schema for the barangay SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS staff (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT    NOT NULL UNIQUE,
    full_name     TEXT    NOT NULL DEFAULT '',
    role          TEXT    NOT NULL DEFAULT 'staff',  -- 'admin' | 'staff' | 'viewer'
    password_hash TEXT    NOT NULL,                  -- argon2 PHC string
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL
);

-- Only a SHA-256 digest of the session token is kept.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT    PRIMARY KEY,
    staff_id   INTEGER NOT NULL REFERENCES staff(id) ON DELETE CASCADE,
    created_at TEXT    NOT NULL,
    expires_at TEXT    NOT NULL
);

-- `id` is the insertion sequence identifier generation reads from;
-- AUTOINCREMENT keeps it from ever being reused.
CREATE TABLE IF NOT EXISTS households (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    household_id      TEXT    NOT NULL UNIQUE,
    household_head_id INTEGER UNIQUE REFERENCES residents(id) ON DELETE SET NULL,
    street            TEXT    NOT NULL,
    purok             TEXT    NOT NULL,
    housing_type      TEXT    NOT NULL,
    housing_condition TEXT    NOT NULL,
    has_electricity   INTEGER NOT NULL DEFAULT 1,
    has_water         INTEGER NOT NULL DEFAULT 1,
    water_source      TEXT,
    monthly_income    TEXT,            -- decimal string, NULL when unknown
    notes             TEXT    NOT NULL DEFAULT '',
    is_active         INTEGER NOT NULL DEFAULT 1,
    created_by        INTEGER REFERENCES staff(id) ON DELETE SET NULL,
    created_at        TEXT    NOT NULL,
    updated_at        TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS residents (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    resident_id          TEXT    NOT NULL UNIQUE,
    first_name           TEXT    NOT NULL,
    middle_name          TEXT    NOT NULL DEFAULT '',
    last_name            TEXT    NOT NULL,
    suffix               TEXT    NOT NULL DEFAULT '',
    date_of_birth        TEXT    NOT NULL,   -- YYYY-MM-DD
    gender               TEXT    NOT NULL,   -- 'M' | 'F'
    civil_status         TEXT    NOT NULL,
    phone_number         TEXT    NOT NULL DEFAULT '',
    email                TEXT    NOT NULL DEFAULT '',
    purok                TEXT    NOT NULL,
    street               TEXT    NOT NULL,
    household_id         INTEGER REFERENCES households(id) ON DELETE SET NULL,
    relationship_to_head TEXT    NOT NULL DEFAULT '',
    is_pwd               INTEGER NOT NULL DEFAULT 0,
    is_senior            INTEGER NOT NULL DEFAULT 0,
    is_4ps               INTEGER NOT NULL DEFAULT 0,
    employment_status    TEXT,
    occupation           TEXT    NOT NULL DEFAULT '',
    has_portal_account   INTEGER NOT NULL DEFAULT 0,
    is_active            INTEGER NOT NULL DEFAULT 1,
    notes                TEXT    NOT NULL DEFAULT '',
    created_by           INTEGER REFERENCES staff(id) ON DELETE SET NULL,
    created_at           TEXT    NOT NULL,
    updated_at           TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS residents_name_idx      ON residents(last_name, first_name);
CREATE INDEX IF NOT EXISTS residents_purok_idx     ON residents(purok);
CREATE INDEX IF NOT EXISTS residents_household_idx ON residents(household_id);
CREATE INDEX IF NOT EXISTS households_purok_idx    ON households(purok);
CREATE INDEX IF NOT EXISTS sessions_staff_idx      ON sessions(staff_id);
CREATE INDEX IF NOT EXISTS sessions_expiry_idx     ON sessions(expires_at);

PRAGMA user_version = 1;
";
