//! Storage-backed operations. Each call acquires its own handle from the
//! [`Connector`](crate::storage::Connector) and releases it before returning.

pub mod campos;
pub mod sensores;
