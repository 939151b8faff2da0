// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Validator for Lottie files.
//!
//! This only checks the minimal document shape needed before editing: root
//! metadata types and the timing fields of every layer. It does not look at
//! shape geometry, color arrays, keyframe interpolation or asset references,
//! so a valid document is not necessarily a well-formed animation.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::document::DocumentError;

/// Root properties that must hold a number, in check order.
const NUMERIC_ROOT_KEYS: &[&str] = &["fr", "w", "h"];

/// Layer properties that must hold a number, in check order.
const NUMERIC_LAYER_KEYS: &[&str] = &["ty", "ip", "op"];

/// A single violated rule. The [fmt::Display] output is meant to be shown
/// to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Lottie JSON must be a valid object.")]
    NotAnObject,
    #[error("Lottie JSON must have a 'v' property of type string.")]
    InvalidVersion,
    #[error("Lottie JSON must have a '{0}' property of type number.")]
    NotANumber(&'static str),
    #[error("Lottie JSON must contain a 'layers' array.")]
    MissingLayers,
    #[error("Layer {0} must be an object.")]
    LayerNotAnObject(usize),
    #[error("Layer {index} must have a '{key}' property of type number.")]
    LayerNotANumber { index: usize, key: &'static str },
}

/// Outcome of [validate]: every violated rule, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    errors: Vec<ValidationError>,
}

impl Validation {
    /// True iff no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The user facing message of each error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Converts this into a [Result], so that it can be propagated with `?`.
    pub fn into_result(self) -> Result<(), Validation> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for Validation {}

/// Checks a parsed JSON value against the minimal Lottie document shape.
///
/// Non-object inputs yield a single [ValidationError::NotAnObject]. Otherwise
/// all rules are checked and every failure is reported.
///
/// ```
/// # use serde_json::json;
/// # use lottie_editor::validator::validate;
/// let v = validate(&json!({"v": "5.5.2", "fr": 30, "w": 100, "h": 100, "layers": []}));
/// assert!(v.is_valid());
/// assert_eq!(validate(&json!({})).errors().len(), 5);
/// ```
pub fn validate(candidate: &Value) -> Validation {
    let Value::Object(root) = candidate else {
        return Validation { errors: vec![ValidationError::NotAnObject] };
    };

    let mut errors = vec![];
    if !root.get("v").is_some_and(Value::is_string) {
        errors.push(ValidationError::InvalidVersion);
    }
    errors.extend(
        NUMERIC_ROOT_KEYS
            .iter()
            .filter(|k| !is_number(root, k))
            .map(|&key| ValidationError::NotANumber(key)),
    );
    match root.get("layers") {
        Some(Value::Array(layers)) => {
            for (index, layer) in layers.iter().enumerate() {
                validate_layer(index, layer, &mut errors);
            }
        }
        _ => errors.push(ValidationError::MissingLayers),
    }

    Validation { errors }
}

/// Parses `text` and validates the result. Syntax errors are reported as
/// [DocumentError::Parse].
pub fn validate_str<S: AsRef<str>>(text: S) -> Result<Validation, DocumentError> {
    Ok(validate(&serde_json::from_str(text.as_ref())?))
}

fn validate_layer(index: usize, layer: &Value, errors: &mut Vec<ValidationError>) {
    let Value::Object(layer) = layer else {
        errors.push(ValidationError::LayerNotAnObject(index));
        return;
    };
    errors.extend(
        NUMERIC_LAYER_KEYS
            .iter()
            .filter(|k| !is_number(layer, k))
            .map(|&key| ValidationError::LayerNotANumber { index, key }),
    );
}

fn is_number(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(Value::is_number)
}
