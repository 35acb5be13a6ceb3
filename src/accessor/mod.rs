//! Path accessor for reading and writing fields inside JSON records
//!
//! Paths use dot-separated segments (`profile.address.city`) with optional
//! bracketed array indices (`tags[0]`). A path without delimiters is a plain
//! key lookup; a delimited path is walked segment by segment. An object that
//! carries the whole delimited path as a literal key is addressed by that key,
//! which keeps results identical to full path-expression evaluation.

use crate::error::{ErrorCode, PopulateError, PopulateResult};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Largest segment treated as an array index, matching JavaScript's
/// `Number.MAX_SAFE_INTEGER`
const MAX_SAFE_INDEX: u64 = (1 << 53) - 1;

/// Most `null` slots a single write may add when padding an array
const MAX_ARRAY_GROWTH: usize = 1 << 16;

/// Compiled field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// Original expression
    expression: String,
    /// Parsed segments, never empty
    segments: Vec<String>,
}

impl FieldPath {
    /// Compile a path expression
    pub fn parse(expr: &str) -> PopulateResult<Self> {
        if expr.is_empty() {
            return Err(PopulateError::invalid_path(
                ErrorCode::OPTIONS_EMPTY_PATH,
                "path is empty",
                expr,
            ));
        }

        if !expr.contains(['.', '[']) {
            return Ok(Self {
                expression: expr.to_string(),
                segments: vec![expr.to_string()],
            });
        }

        let mut segments = Vec::new();
        for part in expr.split('.') {
            if part.is_empty() {
                return Err(PopulateError::invalid_path(
                    ErrorCode::OPTIONS_EMPTY_SEGMENT,
                    "path contains an empty segment",
                    expr,
                ));
            }
            Self::parse_part(expr, part, &mut segments)?;
        }

        Ok(Self {
            expression: expr.to_string(),
            segments,
        })
    }

    /// Split one dot-delimited part into its field name and bracketed indices
    fn parse_part(expr: &str, part: &str, segments: &mut Vec<String>) -> PopulateResult<()> {
        let (field, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };

        if !field.is_empty() {
            segments.push(field.to_string());
        }

        while !rest.is_empty() {
            let malformed = || {
                PopulateError::invalid_path(
                    ErrorCode::OPTIONS_INVALID_INDEX,
                    format!("malformed array index in '{}'", part),
                    expr,
                )
            };

            let inner = rest.strip_prefix('[').ok_or_else(malformed)?;
            let end = inner.find(']').ok_or_else(malformed)?;
            let index = &inner[..end];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            segments.push(index.to_string());
            rest = &inner[end + 1..];
        }

        Ok(())
    }

    /// The expression this path was compiled from
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// Whether this path is a single literal key
    pub fn is_literal(&self) -> bool {
        self.segments.len() == 1
    }

    /// Read the value at this path, `None` when any segment is missing
    pub fn get<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        if !self.is_literal() {
            if let Some(value) = item.as_object().and_then(|obj| obj.get(&self.expression)) {
                return Some(value);
            }
        }

        let mut current = item;
        for segment in &self.segments {
            current = match current {
                Value::Object(obj) => obj.get(segment)?,
                Value::Array(arr) => arr.get(as_index(segment)?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Write `value` at this path, creating intermediate containers as needed
    pub fn set(&self, item: &mut Value, value: Value) {
        if !is_container(item) {
            trace!("Skipping write to '{}': root is not a container", self);
            return;
        }

        if !self.is_literal() {
            if let Some(slot) = item
                .as_object_mut()
                .and_then(|obj| obj.get_mut(&self.expression))
            {
                *slot = value;
                return;
            }
        }

        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = item;
        for (position, segment) in parents.iter().enumerate() {
            let next_is_index = as_index(&self.segments[position + 1]).is_some();
            current = match Self::child_container(current, segment, next_is_index) {
                Some(child) => child,
                None => {
                    trace!("Skipping write to '{}': '{}' is not a usable index", self, segment);
                    return;
                }
            };
        }

        match Self::slot(current, last) {
            Some(slot) => *slot = value,
            None => trace!("Skipping write to '{}': '{}' is not a usable index", self, last),
        }
    }

    /// Get the container stored under `segment`, replacing anything else with
    /// a fresh array or object
    fn child_container<'a>(
        container: &'a mut Value,
        segment: &str,
        next_is_index: bool,
    ) -> Option<&'a mut Value> {
        let slot = Self::slot(container, segment)?;
        if !is_container(slot) {
            *slot = if next_is_index {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
        Some(slot)
    }

    /// Get a mutable slot for `segment`, inserting `null` when absent
    ///
    /// Returns `None` for arrays when `segment` is not an index or lies too
    /// far past the end to pad.
    fn slot<'a>(container: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
        match container {
            Value::Object(obj) => Some(obj.entry(segment.to_string()).or_insert(Value::Null)),
            Value::Array(arr) => {
                let index = as_index(segment)?;
                if index >= arr.len() {
                    if index - arr.len() >= MAX_ARRAY_GROWTH {
                        return None;
                    }
                    arr.resize(index + 1, Value::Null);
                }
                arr.get_mut(index)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for FieldPath {
    type Err = PopulateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = PopulateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Read the value at `path` in `item`
pub fn read<'a>(item: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.get(item)
}

/// Write `value` at `path` in `item`
pub fn write(item: &mut Value, path: &FieldPath, value: Value) {
    path.set(item, value)
}

/// Canonical array index: `0` or digits without a leading zero, no larger
/// than [`MAX_SAFE_INDEX`]
fn as_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u64 = segment.parse().ok()?;
    if index > MAX_SAFE_INDEX {
        return None;
    }
    usize::try_from(index).ok()
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
