//! Inbound adapters that translate external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! The marketplace only speaks HTTP; see [`http`].

pub mod http;
