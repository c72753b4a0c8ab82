use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::render::ParameterizedSql;

/// A finished render, ready to print or write.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Fragment with values embedded as literals.
    Literal(String),
    /// Fragment with placeholders plus bound values.
    Parameterized(ParameterizedSql),
}

impl Rendered {
    /// The SQL fragment text.
    pub fn sql(&self) -> &str {
        match self {
            Rendered::Literal(sql) => sql,
            Rendered::Parameterized(out) => &out.sql,
        }
    }
}

/// Failure to write render output.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The output name would escape the output directory or is empty.
    #[error("Invalid output name '{name}': {reason}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The output directory could not be created.
    #[error("Failed to create output directory: {0}")]
    CreateDir(#[source] std::io::Error),

    /// A file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Bound parameters could not be encoded as JSON.
    #[error("Failed to encode parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Write the rendered fragment to `<name>.sql` in `output_dir`, plus
/// `<name>_params.json` for parameterized output.
///
/// Returns the written paths.
pub fn write_output(
    output_dir: &Path,
    name: &str,
    rendered: &Rendered,
) -> Result<Vec<PathBuf>, OutputError> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir).map_err(OutputError::CreateDir)?;

    let mut written = Vec::with_capacity(2);

    let sql_path = output_dir.join(format!("{name}.sql"));
    write_file(&sql_path, format!("{}\n", rendered.sql()))?;
    written.push(sql_path);

    if let Rendered::Parameterized(out) = rendered {
        let params_path = output_dir.join(format!("{name}_params.json"));
        let params = serde_json::to_string_pretty(&out.params)?;
        write_file(&params_path, params)?;
        written.push(params_path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: String) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_output_name(name: &str) -> Result<(), OutputError> {
    let invalid = |reason: &'static str| -> Result<(), OutputError> {
        Err(OutputError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return invalid("name must not be empty");
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return invalid("absolute paths are not allowed");
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return invalid("traversal segments are not allowed");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("path separators are not allowed");
    }
    Ok(())
}
