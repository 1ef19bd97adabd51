pub mod errors;
pub mod value;
pub mod path;
pub mod navigator;
pub mod comparison;
pub mod condition;
mod accessors;

use std::fmt;
use std::path::Path as FsPath;
use std::str::FromStr;

use errors::{MapperError, Result};
use tracing::debug;

pub use comparison::{check_condition, CompareOp};
pub use condition::{Comparison, Condition, LogicalOp};
pub use path::{parse_path, Path, PathStep};
pub use value::{to_float64, Map, Value};

/// A JSON document addressed by dot/bracket key paths.
///
/// The root is always an object. Paths look like `a.b[2].c` (or `a.b.2.c`);
/// `[-1]` appends on `add` and means "last element" on `remove`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonMapper {
    root: Value,
}

impl JsonMapper {
    /// Wrap an already decoded value. Anything but an object is rejected.
    pub fn from_value(root: Value) -> Result<Self> {
        match root {
            Value::Object(_) => Ok(Self { root }),
            other => Err(MapperError::Decode(serde::de::Error::custom(format!(
                "expected a JSON object at the document root, found {}",
                other.type_name()
            )))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        debug!(len = json.len(), "decoded document from string");
        Self::from_value(root)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(data)?;
        debug!(len = data.len(), "decoded document from bytes");
        Self::from_value(root)
    }

    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| MapperError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %path.display(), "loading document");
        Self::from_bytes(&data)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Value at `path`; the empty path is the whole document.
    pub fn find(&self, path: &str) -> Result<&Value> {
        navigator::find(&self.root, &parse_path(path))
    }

    /// Insert or overwrite the value at `path`, creating intermediate objects.
    pub fn add(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        debug!(path, "add");
        navigator::add(&mut self.root, &parse_path(path), value.into())
    }

    /// Delete the value at `path`, returning what was there.
    pub fn remove(&mut self, path: &str) -> Result<Value> {
        debug!(path, "remove");
        navigator::remove(&mut self.root, &parse_path(path))
    }

    /// Paths (relative to `path`) of every leaf satisfying `condition`.
    pub fn find_all_with_condition(&self, path: &str, condition: &Condition) -> Result<Vec<String>> {
        let found = crate::condition::find_all_with_condition(&self.root, &parse_path(path), condition)?;
        debug!(path, ?condition, matches = found.len(), "condition query");
        Ok(found)
    }

    /// Compact JSON text.
    pub fn print(&self) -> String {
        serde_json::to_string(&self.root).unwrap_or_default()
    }

    /// JSON text indented by two spaces.
    pub fn pretty_print(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_default()
    }

    /// Encode and write the document to `path`, replacing any existing file.
    pub fn write_file(&self, path: impl AsRef<FsPath>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let text = if pretty { self.pretty_print() } else { self.print() };
        std::fs::write(path, text).map_err(|source| MapperError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %path.display(), pretty, "wrote document");
        Ok(())
    }
}

impl FromStr for JsonMapper {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl fmt::Display for JsonMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
