//! Mock servers for integration testing
//!
//! - `personal_ai` - Mock of the upstream message-stream endpoint

pub mod personal_ai;
