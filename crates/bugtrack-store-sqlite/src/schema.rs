//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids from being reused after a delete. References
/// between tables are plain integer columns: deleting a user or project
/// never cascades and is never blocked by dependent rows.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL,
    username  TEXT NOT NULL,
    email     TEXT NOT NULL,
    password  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL CHECK (status IN ('OPEN', 'CLOSED')),
    owner_id    INTEGER NOT NULL   -- users.id
);

CREATE TABLE IF NOT EXISTS bugs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    summary     TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL CHECK (status IN ('OPEN', 'CLOSED')),
    project_id  INTEGER NOT NULL,  -- projects.id
    creator_id  INTEGER NOT NULL,  -- users.id
    created_at  TEXT,              -- dd/mm/yyyy HH:MM, set on create
    updated_at  TEXT,              -- set on every replace
    closed_at   TEXT               -- set when a replace closes the bug
);

CREATE INDEX IF NOT EXISTS bugs_project_idx ON bugs(project_id);
CREATE INDEX IF NOT EXISTS bugs_creator_idx ON bugs(creator_id);

PRAGMA user_version = 1;
";
