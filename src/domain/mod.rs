//! Core configuration types and the rules that build them.

pub mod configuration;
pub mod error;
pub mod level;
pub mod resolve;
pub mod schema;
pub mod value;
