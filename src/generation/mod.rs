//! Agent executor: model calls interleaved with tool execution.

pub mod text;

pub use text::{generate_text, GenerateOptions};
