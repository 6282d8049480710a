//! Debounced search: coalesces keystrokes into one catalog request and makes
//! sure only the newest request's answer is applied.

mod coordinator;
mod debounce;

pub use coordinator::{SearchCoordinator, SearchRequest};
pub use debounce::Debouncer;

#[cfg(test)]
mod tests;
