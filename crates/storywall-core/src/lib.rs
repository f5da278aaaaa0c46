//! Core types and workflow for the storywall.
//!
//! Entries, place resolution, the draft submission and the application state
//! that ties them together. This crate knows nothing about terminals or HTTP;
//! those arrive through the [`place::Geocoder`], [`store::EntrySource`],
//! [`sink::SubmissionSink`] and [`render::MapRenderer`] traits.

// We intentionally use native `async fn` in traits.
#![allow(async_fn_in_trait)]

pub mod draft;
pub mod entry;
pub mod error;
pub mod photo;
pub mod place;
pub mod render;
pub mod sink;
pub mod state;
pub mod store;

pub use error::{LoadError, PhotoError, ResolutionError, SubmitError, ValidationError};
