//! # client
//!
//! Typed client for the time-clock (attendance) backend.
//!
//! This crate holds everything the front ends share: the HTTP API client and
//! its wire types, per-screen form state, the camera capture-and-submit flow,
//! the session file, and client-side spreadsheet export. All business logic
//! (face recognition, persistence, report delivery) stays on the server.

pub mod capture;
pub mod config;
pub mod error;
pub mod net;
pub mod report;
pub mod session;
pub mod state;
pub mod validate;
