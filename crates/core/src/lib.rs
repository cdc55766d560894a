//! # Stylecast Core
//!
//! Domain types, traits, and error definitions for Stylecast.
//! This crate does no I/O; it defines the domain model that the other
//! crates implement against.
//!
//! The remote model sits behind the [`Provider`] trait so the style service
//! can be tested with scripted stand-ins and run without a credential.

pub mod error;
pub mod message;
pub mod profile;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, FailureKind, ProfileError, ProviderError, Result};
pub use message::{Message, Role};
pub use profile::{Primitive, StyleProfile, TrainingRecord};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
