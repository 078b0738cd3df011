//! Proxy module
//!
//! Handles request forwarding to the upstream conversational service.

pub mod headers;
pub mod logging;
pub mod personal_ai;
pub mod provider;

pub use personal_ai::PersonalAiClient;
pub use provider::{ByteStream, Upstream};
