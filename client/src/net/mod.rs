//! Networking modules for the backend HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the single configured HTTP client and one method per endpoint;
//! `types` defines the wire schema shared by every screen; `endpoints` plugs
//! the photo-carrying calls into the capture flow.

pub mod api;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
