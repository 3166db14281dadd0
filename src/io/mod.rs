//! # I/O Module
//!
//! File reading/writing boundaries. Converts between CSV exports and the
//! in-memory segment and group-label stores.

pub mod groups;
pub mod matches;
pub mod report;
