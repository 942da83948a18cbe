//! Persistence infrastructure for the daemon.
//!
//! Only the TOML configuration file lives here; the engine itself has no
//! persisted state (the key-state table is created empty at startup and
//! discarded at shutdown, and key bindings are fixed at compile time).

pub mod config;
