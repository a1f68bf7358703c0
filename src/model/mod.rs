//! Data models for the planview application.

mod data_uri;
mod file;

pub use data_uri::{DataUriError, EncodedImage};
pub use file::{FileSource, PickerHints, ReadError, SelectedFile, media_type_for_name};
