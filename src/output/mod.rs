/// Writes rendered fragments and bound parameters to disk.
pub mod formatter;

pub use formatter::{write_output, OutputError, Rendered};
