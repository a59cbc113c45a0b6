pub mod file;
pub mod traits;

// Re-export
pub use file::FileDataMapRepository;
pub use traits::{DataMapRepository, StoredDataMap};
