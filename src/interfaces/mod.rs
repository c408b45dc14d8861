//! Outbound file formats.

pub mod csv;
