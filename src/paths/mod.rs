//! Unique path reservation for worker coordination artifacts (lock files,
//! socket paths).

mod unique;

pub use unique::{
    CreateOutcome, UniquePathAllocator, create_exclusive, unique_path, unique_path_in,
};
