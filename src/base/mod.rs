//! Base types and error handling.
//!
//! - [`ShimError`](shimerror::ShimError) / [`HostError`](shimerror::HostError): crate errors
//! - [`Completion`](completion::Completion): single-settle bridge for callback-style host calls
//! - [`ShimConfig`](config::ShimConfig): adapter configuration

pub mod completion;
pub mod config;
pub mod shimerror;
