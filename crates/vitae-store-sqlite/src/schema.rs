//! SQL schema for the Vitae SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id   TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- normalised by the caller
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    is_active     INTEGER NOT NULL DEFAULT 1,
    is_staff      INTEGER NOT NULL DEFAULT 0,
    is_superuser  INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

-- Exactly one row per identity, inserted in the same transaction.
CREATE TABLE IF NOT EXISTS profiles (
    owner_id   TEXT PRIMARY KEY REFERENCES identities(identity_id) ON DELETE CASCADE,
    first_name TEXT,
    last_name  TEXT,
    about_me   TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Only the SHA-256 digest of a token is kept.
CREATE TABLE IF NOT EXISTS tokens (
    digest     TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skills (
    id         TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    title      TEXT NOT NULL
);

-- Dates are ISO 8601 strings, so text comparison orders them correctly.
CREATE TABLE IF NOT EXISTS educations (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    institution TEXT NOT NULL,
    degree      TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT,
    CHECK (end_date IS NULL OR start_date <= end_date)
);

CREATE TABLE IF NOT EXISTS certificates (
    id                   TEXT PRIMARY KEY,
    owner_id             TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL,
    title                TEXT NOT NULL,
    issuing_organization TEXT NOT NULL,
    issue_date           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS experiences (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES identities(identity_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    company     TEXT NOT NULL,
    position    TEXT NOT NULL,
    description TEXT,
    start_date  TEXT NOT NULL,
    end_date    TEXT,
    CHECK (end_date IS NULL OR start_date <= end_date)
);

CREATE INDEX IF NOT EXISTS tokens_owner_idx       ON tokens(owner_id);
CREATE INDEX IF NOT EXISTS skills_owner_idx       ON skills(owner_id);
CREATE INDEX IF NOT EXISTS educations_owner_idx   ON educations(owner_id);
CREATE INDEX IF NOT EXISTS certificates_owner_idx ON certificates(owner_id);
CREATE INDEX IF NOT EXISTS experiences_owner_idx  ON experiences(owner_id);

PRAGMA user_version = 1;
";
