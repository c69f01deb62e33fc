//! Client-side workflows for the Bauantrag review portal.
//!
//! The crate models the portal's document submission pipeline (file
//! selection, the voucher gate, multipart upload with cancellation, response
//! normalization, and the derived view state) behind trait seams so every
//! workflow can be exercised without a live portal.

pub mod config;
pub mod error;
pub mod portal;
pub mod session;
pub mod telemetry;
pub mod workflows;
