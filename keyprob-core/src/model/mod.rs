//! Top-level module for the keypress prediction model.
//!
//! This module provides:
//! - Per-context statistics (`Sequence`)
//! - Next-character probability distributions (`Distribution`)
//! - Multi-depth storage with fallback resolution (`SequenceStore`)
//! - Configuration and the on-disk snapshot format
//! - The event-driven controller (`KeypressModel`)

/// Probability distribution over the next character, and the fixed
/// letter-frequency prior.
pub mod distribution;

/// Raw counts and derived probabilities for one context string.
pub mod sequence;

/// Context statistics at every depth, with longest-match resolution.
pub mod store;

/// Construction-time model settings and their validation.
pub mod config;

/// JSON model file format.
pub mod snapshot;

/// Training, persistence and live prediction dispatch.
pub mod keypress_model;
