//! Paystack outbound adapter.
//!
//! A thin reqwest implementation of the `PaymentGateway` port against the
//! Paystack transaction API.

mod dto;
mod http_gateway;

pub use http_gateway::{PaystackConfig, PaystackGateway};
