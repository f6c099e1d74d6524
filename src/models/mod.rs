pub mod config;
pub mod envelope;
pub mod roster;

pub use config::*;
pub use envelope::ApiResponse;
pub use roster::*;
