//! Utility functions (ids, time codecs, debounced edits).

pub mod debounce;
pub mod id;
pub mod time;
