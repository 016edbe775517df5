//! Common types and utilities for the jsz JavaScript frontend.
//!
//! This crate provides foundational pieces shared across the jsz crates:
//! - Centralized limits and thresholds

// Centralized limits and thresholds
pub mod limits;
