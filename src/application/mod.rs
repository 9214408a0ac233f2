//! # Application Layer
//!
//! Ports to external collaborators and the use cases coordinating them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
