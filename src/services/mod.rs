pub mod converter;

pub use converter::{ConvertOptions, Converted, Converter};
