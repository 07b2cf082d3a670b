//! Temporary audio storage adapters

mod scratch_dir;

pub use scratch_dir::ScratchDirStore;
