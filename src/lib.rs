//! Ingestion Node - Turns analysis publication notices into graph events
//!
//! For each inbound item the node resolves the full analysis record from the
//! registry (retrying while indexing catches up), drops analyses it does not
//! handle, and emits one canonical `GraphEvent` per accepted analysis.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
