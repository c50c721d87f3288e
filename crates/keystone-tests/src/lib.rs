pub mod fixtures;
pub mod test_platform;

// Re-export key testing utilities
pub use fixtures::{ComponentSet, fixture_path, load_component_set};
pub use test_platform::{TestPlatform, TestPlatformBuilder};
