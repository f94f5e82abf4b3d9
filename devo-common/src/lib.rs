//! # DEVO Common Library
//!
//! Shared code for the DEVO onboarding modules including:
//! - Devotee record models and database queries
//! - Event types (OnboardEvent enum) and the EventBus
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use db::models::{Devotee, NewDevotee};
pub use error::{Error, Result};
