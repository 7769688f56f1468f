#![forbid(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod datamodel;
pub mod error;
pub mod http;
pub mod importers;
pub mod ine;
pub mod infer;
pub mod normalize;
pub mod suggestions;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
