//! # API Shared
//!
//! Shared utilities and definitions for IdeaHub HTTP surfaces.
//!
//! Contains:
//! - the health-check response type ([`HealthRes`])
//! - [`HealthService`], usable by any server binary

pub mod health;

pub use health::{HealthRes, HealthService};
