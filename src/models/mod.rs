//! Request and response payloads

pub mod attribution;
pub mod info;
pub mod prediction;

pub use attribution::*;
pub use info::*;
pub use prediction::*;
