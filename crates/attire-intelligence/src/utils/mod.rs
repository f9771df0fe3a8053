//! Utilities module - key normalization and ordered de-duplication helpers

pub mod text_utils;

pub use text_utils::{extend_unique, TextUtils};
