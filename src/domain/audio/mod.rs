//! Uploaded audio module

mod upload;

pub use upload::{AudioMimeType, AudioUpload};
