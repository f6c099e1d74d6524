pub mod runner;

pub use runner::{MutationDescriptor, MutationError, MutationRunner, MutationStatus};
