//! # Presence Agent
//!
//! A local attendance tracker with geofenced check-ins.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, users, branches, pay periods)
//! - **geo**: Haversine distance, geofence verification, coordinate parsing
//! - **resolve**: Map short-link expansion
//! - **checkin**: Geofenced check-in orchestration
//! - **storage**: Filesystem persistence (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod checkin;
pub mod config;
pub mod geo;
pub mod models;
pub mod resolve;
pub mod storage;

pub use models::*;
