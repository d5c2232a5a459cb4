//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, event transport, errors)
//! - `analysis` - Analysis notifications, records, acceptance and transformation
//! - `inbound` - Payloads arriving on the inbound channel

pub mod analysis;
pub mod foundation;
pub mod inbound;
