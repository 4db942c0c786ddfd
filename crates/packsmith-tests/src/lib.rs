//! Shared helpers for packsmith end-to-end tests

pub mod fixtures;
pub mod test_env;

// Re-export key testing utilities
pub use fixtures::{load_cassette, load_vcr_body_string, load_vcr_response, mount_cassette, mount_image};
pub use test_env::TestEnvironment;
