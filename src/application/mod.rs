//! Application layer: the record store and the controllers built on top of it.
//!
//! `RecordStore` owns the cached collection and publishes it through a `tokio::sync::watch`
//! channel. The list and form controllers read from that channel and call back into the
//! store for every mutation.

pub mod form;
pub mod list;
pub mod notice;
pub mod store;
