//! Middleware for the relay
//!
//! Contains the origin check applied to the relay route.

pub mod origin;
