//! `bugbash` - Bug bash session tracking core
//!
//! This crate implements the state layer of a bug-bash tracker: teams
//! run time-boxed sessions where participants log candidate items that
//! an organizer triages into accepted work items or rejections. All
//! persistence goes through a versioned document store supplied by the
//! host platform.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`model`] - Persisted records and editable view-models
//! - [`store`] - In-memory caches, one per entity kind
//! - [`actions`] - Load/save/delete orchestration against the client
//! - [`events`] / [`hub`] - Typed domain events and change notification
//! - [`client`] - Document-store and work-item collaborator contracts
//! - [`session`] - The per-session application context
//! - [`query`] - View-side filtering and triage partitioning
//! - [`config`] - Project/identity configuration
//! - [`error`] - Error types and handling
//! - [`util`] - Ids, date codecs, debounced edits
//!
//! # Data flow
//!
//! An action borrows the [`session::Session`], runs the document-store
//! call, and publishes the outcome as a typed event; the owning store
//! applies it to its cache and emits one changed notification, which
//! views consume by re-reading the store.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod hub;
pub mod logging;
pub mod model;
pub mod query;
pub mod session;
pub mod store;
pub mod util;

pub use error::{BugBashError, Result};
pub use session::Session;
