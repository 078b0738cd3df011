//! Integration tests for the relay
//!
//! These tests drive the full router against a wiremock upstream and verify
//! the client-visible contract of every response path.

mod access;
