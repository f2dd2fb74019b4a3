//! Reference interpreter: replay an edit program against a source value.
//!
//! The machine keeps a value stack and a container-builder stack. A blank
//! container starts with no kind; the first bind or append applied to it
//! commits the kind. Positional operands resolve against the original source
//! value by structural position, as documented on [`Op`].
//!
//! This interpreter exists to verify round-trip correctness of generated
//! programs; a wire-level interpreter is an external collaborator.

use serde_json::{Map, Value};

use crate::error::{DiffError, DiffResult};
use crate::patch::{Op, Patch};

/// A container under construction, kind committed lazily.
enum Builder {
    Unset,
    Array(Vec<Value>),
    Object(Map<String, Value>),
    Str(String),
}

impl Builder {
    fn into_value(self) -> Value {
        match self {
            Builder::Unset => Value::Null,
            Builder::Array(items) => Value::Array(items),
            Builder::Object(map) => Value::Object(map),
            Builder::Str(s) => Value::String(s),
        }
    }
}

/// Replay `patch` against `source`, producing the reconstructed value.
///
/// An empty program returns the source unchanged. Fails with
/// [`DiffError::InvalidProgram`] when an instruction does not fit the source
/// value it addresses, which a program generated for this source never does.
pub fn apply_patch(source: &Value, patch: &Patch) -> DiffResult<Value> {
    if patch.is_empty() {
        return Ok(source.clone());
    }

    let mut values: Vec<Value> = Vec::new();
    let mut builders: Vec<Builder> = Vec::new();

    for op in &patch.ops {
        match op {
            Op::Value(value) => values.push(value.clone()),
            Op::Blank => builders.push(Builder::Unset),
            Op::ReturnIntoArray => {
                let items = open_array(&mut builders)?;
                if let Some(value) = values.pop() {
                    items.push(value);
                }
            }
            Op::ReturnIntoObject { key } => {
                let map = open_object(&mut builders)?;
                if let Some(value) = values.pop() {
                    map.insert(key.clone(), value);
                }
            }
            Op::ObjectCopyField { index } => {
                let Value::Object(source_map) = source else {
                    return Err(DiffError::InvalidProgram(
                        "field copy from a non-object source".into(),
                    ));
                };
                let mut keys: Vec<&String> = source_map.keys().collect();
                keys.sort_unstable();
                let key = keys.get(*index).ok_or_else(|| {
                    DiffError::InvalidProgram(format!("field position {index} out of range"))
                })?;

                let map = open_object(&mut builders)?;
                map.insert((*key).clone(), source_map[key.as_str()].clone());
            }
            Op::ArrayAppendSlice { start, end } => {
                let Value::Array(source_items) = source else {
                    return Err(DiffError::InvalidProgram(
                        "slice copy from a non-array source".into(),
                    ));
                };
                let slice = source_items.get(*start..*end).ok_or_else(|| {
                    DiffError::InvalidProgram(format!("slice [{start}, {end}) out of range"))
                })?;

                let items = open_array(&mut builders)?;
                items.extend(slice.iter().cloned());
            }
            Op::StringAppendString(text) => {
                open_string(&mut builders)?.push_str(text);
            }
            Op::StringAppendSlice { start, end } => {
                let Value::String(source_str) = source else {
                    return Err(DiffError::InvalidProgram(
                        "substring copy from a non-string source".into(),
                    ));
                };
                if !source_str.is_char_boundary(*start) || !source_str.is_char_boundary(*end) {
                    return Err(DiffError::InvalidProgram(format!(
                        "substring bounds [{start}, {end}) split a codepoint"
                    )));
                }
                let slice = source_str.get(*start..*end).ok_or_else(|| {
                    DiffError::InvalidProgram(format!("substring [{start}, {end}) out of range"))
                })?;

                open_string(&mut builders)?.push_str(slice);
            }
            Op::Pop => {
                values.pop();
            }
        }
    }

    if let Some(builder) = builders.pop() {
        Ok(builder.into_value())
    } else if let Some(value) = values.pop() {
        Ok(value)
    } else {
        Ok(source.clone())
    }
}

fn open_array(builders: &mut [Builder]) -> DiffResult<&mut Vec<Value>> {
    let builder = current(builders)?;
    if matches!(builder, Builder::Unset) {
        *builder = Builder::Array(Vec::new());
    }
    match builder {
        Builder::Array(items) => Ok(items),
        _ => Err(DiffError::InvalidProgram(
            "array operation on a non-array container".into(),
        )),
    }
}

fn open_object(builders: &mut [Builder]) -> DiffResult<&mut Map<String, Value>> {
    let builder = current(builders)?;
    if matches!(builder, Builder::Unset) {
        *builder = Builder::Object(Map::new());
    }
    match builder {
        Builder::Object(map) => Ok(map),
        _ => Err(DiffError::InvalidProgram(
            "object operation on a non-object container".into(),
        )),
    }
}

fn open_string(builders: &mut [Builder]) -> DiffResult<&mut String> {
    let builder = current(builders)?;
    if matches!(builder, Builder::Unset) {
        *builder = Builder::Str(String::new());
    }
    match builder {
        Builder::Str(s) => Ok(s),
        _ => Err(DiffError::InvalidProgram(
            "string operation on a non-string container".into(),
        )),
    }
}

fn current(builders: &mut [Builder]) -> DiffResult<&mut Builder> {
    builders
        .last_mut()
        .ok_or_else(|| DiffError::InvalidProgram("container operation with no open blank".into()))
}
