pub mod fixtures;
pub mod sessions;
