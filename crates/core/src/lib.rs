//! Domain logic for the tempwatch service.
//!
//! Everything in this crate is pure (no network or database access) so it can
//! be tested in isolation. Model and config files are read from disk by the
//! loaders, but only once at startup.

pub mod config;
pub mod error;
pub mod forecast;
pub mod reading;
pub mod scorer;
pub mod types;
pub mod window;
