use itertools::Itertools;

use crate::errors::{MapperError, Result};
use crate::path::{Path, PathStep};
use crate::value::{Map, Value};

/// Resolve a step against a sequence of `len` elements.
fn sequence_index(step: &PathStep, len: usize) -> Result<usize> {
    match step {
        PathStep::Index(i) if *i < len => Ok(*i),
        PathStep::Index(i) => Err(MapperError::IndexOutOfRange {
            index: *i as i64,
            len,
        }),
        PathStep::Append => Err(MapperError::IndexOutOfRange { index: -1, len }),
        // Zero-padded keys like "007" still address a slot; "-2" never does.
        PathStep::Key(k) => match k.parse::<i64>() {
            Ok(index) if index >= 0 && (index as usize) < len => Ok(index as usize),
            Ok(index) => Err(MapperError::IndexOutOfRange { index, len }),
            Err(_) => Err(MapperError::InvalidIndex(k.clone())),
        },
    }
}

fn joined(steps: &[PathStep]) -> String {
    steps.iter().join(".")
}

fn not_a_container(steps: &[PathStep], found: &Value) -> MapperError {
    MapperError::TypeMismatch {
        path: joined(steps),
        expected: "object or array",
        found: found.type_name(),
    }
}

/// Read the value at `path`.
///
/// Map lookup always wins on an object, so numeric steps there are looked up as
/// their decimal key. Reaching a scalar before the path is exhausted stops the
/// walk and returns that scalar.
pub fn find<'a>(root: &'a Value, path: &Path) -> Result<&'a Value> {
    let mut current = root;
    for step in &path.steps {
        current = match current {
            Value::Object(map) => {
                let key = step.as_key();
                match map.get(&key) {
                    Some(next) => next,
                    None => return Err(MapperError::KeyNotFound(key)),
                }
            }
            Value::Array(items) => &items[sequence_index(step, items.len())?],
            scalar => return Ok(scalar),
        };
    }
    Ok(current)
}

/// Write `value` at `path`, creating empty objects for missing keys on the way.
///
/// Sequences are never created implicitly. On a sequence, the final step `-1`
/// appends and an in-range index overwrites.
pub fn add(root: &mut Value, path: &Path, value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(MapperError::InvalidPath("cannot add at the document root".into()));
    };
    check_add(root, parents, last)?;
    let container = walk_mut(root, parents, true)?;
    match container {
        Value::Object(map) => {
            map.insert(last.as_key(), value);
        }
        Value::Array(items) => match last {
            PathStep::Append => items.push(value),
            step => {
                let idx = sequence_index(step, items.len())?;
                items[idx] = value;
            }
        },
        other => return Err(not_a_container(parents, other)),
    }
    Ok(())
}

/// Delete the value at `path` and hand it back.
///
/// Removing from a sequence shifts later elements down by one; `-1` removes the
/// last element.
pub fn remove(root: &mut Value, path: &Path) -> Result<Value> {
    let Some((last, parents)) = path.split_last() else {
        return Err(MapperError::InvalidPath("cannot remove the document root".into()));
    };
    let container = walk_mut(root, parents, false)?;
    match container {
        Value::Object(map) => {
            let key = last.as_key();
            map.remove(&key).ok_or(MapperError::KeyNotFound(key))
        }
        Value::Array(items) => {
            let idx = match last {
                PathStep::Append if !items.is_empty() => items.len() - 1,
                step => sequence_index(step, items.len())?,
            };
            Ok(items.remove(idx))
        }
        other => Err(not_a_container(parents, other)),
    }
}

// Read-only dry run of `add`, so a failing write leaves no auto-created objects
// behind. Past the first missing key only textual keys can follow.
fn check_add(root: &Value, parents: &[PathStep], last: &PathStep) -> Result<()> {
    let mut current = root;
    for (depth, step) in parents.iter().enumerate() {
        current = match current {
            Value::Object(map) => match map.get(&step.as_key()) {
                Some(next) => next,
                None => {
                    return match parents[depth..].iter().find(|s| !matches!(s, PathStep::Key(_))) {
                        Some(s) => Err(MapperError::InvalidPath(format!(
                            "missing '{}' would need an implicit array",
                            s.as_key()
                        ))),
                        None => Ok(()),
                    }
                }
            },
            Value::Array(items) => &items[sequence_index(step, items.len())?],
            other => return Err(not_a_container(&parents[..depth], other)),
        };
    }
    match (current, last) {
        (Value::Object(_), _) | (Value::Array(_), PathStep::Append) => Ok(()),
        (Value::Array(items), step) => sequence_index(step, items.len()).map(|_| ()),
        (other, _) => Err(not_a_container(parents, other)),
    }
}

// Walks every step strictly; scalars in the middle of the path are errors here.
fn walk_mut<'a>(root: &'a mut Value, steps: &[PathStep], create: bool) -> Result<&'a mut Value> {
    let mut current = root;
    for (depth, step) in steps.iter().enumerate() {
        current = match current {
            Value::Object(map) => descend_object(map, step, create)?,
            Value::Array(items) => {
                let idx = sequence_index(step, items.len())?;
                &mut items[idx]
            }
            other => return Err(not_a_container(&steps[..depth], other)),
        };
    }
    Ok(current)
}

fn descend_object<'a>(map: &'a mut Map, step: &PathStep, create: bool) -> Result<&'a mut Value> {
    let key = step.as_key();
    if !map.contains_key(&key) {
        match step {
            PathStep::Key(_) if create => {}
            PathStep::Key(_) => return Err(MapperError::KeyNotFound(key)),
            _ if create => {
                return Err(MapperError::InvalidPath(format!(
                    "missing '{key}' would need an implicit array"
                )))
            }
            _ => return Err(MapperError::KeyNotFound(key)),
        }
    }
    Ok(map.entry(key).or_insert_with(|| Value::Object(Map::new())))
}
