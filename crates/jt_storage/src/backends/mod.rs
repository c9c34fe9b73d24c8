pub mod json;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;
