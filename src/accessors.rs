//! Typed lookups over [`JsonMapper::find`].
//!
//! Each `find_*` fails with `TypeMismatch` when the value has the wrong shape;
//! each `find_*_or` turns any failure into the supplied default.

use std::collections::BTreeMap;

use crate::errors::{MapperError, Result};
use crate::value::{Map, Value};
use crate::JsonMapper;

impl JsonMapper {
    fn find_as<'a, T>(
        &'a self,
        path: &str,
        expected: &'static str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.find(path)?;
        convert(value).ok_or_else(|| MapperError::TypeMismatch {
            path: path.to_string(),
            expected,
            found: value.type_name(),
        })
    }

    pub fn find_bool(&self, path: &str) -> Result<bool> {
        self.find_as(path, "bool", Value::as_bool)
    }

    pub fn find_bool_or(&self, path: &str, default: bool) -> bool {
        self.find_bool(path).unwrap_or(default)
    }

    pub fn find_string(&self, path: &str) -> Result<&str> {
        self.find_as(path, "string", Value::as_str)
    }

    pub fn find_string_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.find_string(path).unwrap_or(default)
    }

    /// Fractional parts are truncated toward zero.
    pub fn find_int(&self, path: &str) -> Result<i64> {
        self.find_as(path, "int", |v| {
            v.as_f64().filter(|n| n.is_finite()).map(|n| n as i64)
        })
    }

    pub fn find_int_or(&self, path: &str, default: i64) -> i64 {
        self.find_int(path).unwrap_or(default)
    }

    pub fn find_float(&self, path: &str) -> Result<f64> {
        self.find_as(path, "float", Value::as_f64)
    }

    pub fn find_float_or(&self, path: &str, default: f64) -> f64 {
        self.find_float(path).unwrap_or(default)
    }

    pub fn find_uint(&self, path: &str) -> Result<u64> {
        self.find_uint64(path)
    }

    pub fn find_uint_or(&self, path: &str, default: u64) -> u64 {
        self.find_uint(path).unwrap_or(default)
    }

    pub fn find_uint32(&self, path: &str) -> Result<u32> {
        self.find_as(path, "uint32", |v| {
            v.as_f64()
                .filter(|n| (0.0..=u32::MAX as f64).contains(n))
                .map(|n| n as u32)
        })
    }

    pub fn find_uint32_or(&self, path: &str, default: u32) -> u32 {
        self.find_uint32(path).unwrap_or(default)
    }

    pub fn find_uint64(&self, path: &str) -> Result<u64> {
        self.find_as(path, "uint64", |v| {
            v.as_f64()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n as u64)
        })
    }

    pub fn find_uint64_or(&self, path: &str, default: u64) -> u64 {
        self.find_uint64(path).unwrap_or(default)
    }

    pub fn find_slice(&self, path: &str) -> Result<&[Value]> {
        self.find_as(path, "array", |v| v.as_array().map(Vec::as_slice))
    }

    pub fn find_slice_or<'a>(&'a self, path: &str, default: &'a [Value]) -> &'a [Value] {
        self.find_slice(path).unwrap_or(default)
    }

    pub fn find_map(&self, path: &str) -> Result<&Map> {
        self.find_as(path, "object", Value::as_object)
    }

    pub fn find_map_or<'a>(&'a self, path: &str, default: &'a Map) -> &'a Map {
        self.find_map(path).unwrap_or(default)
    }

    /// An array whose every element is an object.
    pub fn find_slice_of_maps(&self, path: &str) -> Result<Vec<&Map>> {
        let items = self.find_slice(path)?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().ok_or_else(|| MapperError::TypeMismatch {
                    path: format!("{path}[{i}]"),
                    expected: "object",
                    found: item.type_name(),
                })
            })
            .collect()
    }

    pub fn find_slice_of_maps_or<'a>(&'a self, path: &str, default: Vec<&'a Map>) -> Vec<&'a Map> {
        self.find_slice_of_maps(path).unwrap_or(default)
    }

    /// An object whose every value is an array.
    pub fn find_map_of_slices(&self, path: &str) -> Result<BTreeMap<&str, &[Value]>> {
        let map = self.find_map(path)?;
        map.iter()
            .map(|(k, v)| match v {
                Value::Array(items) => Ok((k.as_str(), items.as_slice())),
                other => Err(MapperError::TypeMismatch {
                    path: format!("{path}.{k}"),
                    expected: "array",
                    found: other.type_name(),
                }),
            })
            .collect()
    }

    pub fn find_map_of_slices_or<'a>(
        &'a self,
        path: &str,
        default: BTreeMap<&'a str, &'a [Value]>,
    ) -> BTreeMap<&'a str, &'a [Value]> {
        self.find_map_of_slices(path).unwrap_or(default)
    }
}
