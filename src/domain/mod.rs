//! Domain types and the ports the application layer talks through.

pub mod access;
pub mod pago;
pub mod ports;
