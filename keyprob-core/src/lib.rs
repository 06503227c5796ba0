//! Adaptive next-character prediction from typing history.
//!
//! This crate provides:
//! - Character statistics at several context lengths ("depths")
//! - Longest-context resolution with a minimum sample size and a
//!   letter-frequency fallback
//! - Training from text or live key events
//! - JSON persistence of trained models
//! - Synchronous, ordered prediction callbacks on every key press
//!
//! The keyboard itself is not part of this crate: hosts implement
//! `KeyEventSource` (or call `KeypressModel::on_key_event` directly).

/// Model types and the `KeypressModel` controller.
pub mod model;

/// Key identifiers, key events and the default alphabet.
pub mod keys;

/// Event-source abstraction for feeding key presses.
pub mod events;

/// Error type shared by loading, saving and configuration.
pub mod error;

/// File helpers (model paths, model listing, text loading).
pub mod io;

pub use error::{ModelError, ModelResult};
pub use events::{IterSource, KeyEventSource};
pub use keys::KeyEvent;
pub use model::config::ModelConfig;
pub use model::distribution::Distribution;
pub use model::keypress_model::KeypressModel;
