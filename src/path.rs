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

//! Typed paths into a JSON tree and copy-on-write replacement of the value
//! they point at.
//!
//! A [ValuePath] is a sequence of [PathStep]s. Object keys and array indices
//! are distinct steps, so a path built while walking a document always
//! resolves the same way when it is used for an edit. The dotted/bracket
//! string form (`shapes[0].it[1].c.k`) is still supported through
//! [fmt::Display] and [FromStr]. It does not quote keys, so a key made only of
//! digits parses back as an index, and a key containing `.`, `[` or `]` is
//! split. Only the typed form is exact.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use utils::TryStep;

mod utils;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Cannot replace a value at an empty path.")]
    Empty,
    #[error("Path <{path}> does not resolve at step {depth}.")]
    Unresolvable { path: ValuePath, depth: usize },
}

/// One step of a [ValuePath].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// An object member.
    Key(String),
    /// An array element.
    Index(usize),
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_owned())
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// An ordered sequence of [PathStep]s, starting at some root value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<PathStep>);

impl ValuePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, step: impl Into<PathStep>) {
        self.0.push(step.into());
    }

    /// Returns a copy of this path extended by `step`.
    pub fn join(&self, step: impl Into<PathStep>) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    /// Returns the path to the parent of the addressed value, if any.
    pub fn parent(&self) -> Option<ValuePath> {
        self.0.split_last().map(|(_, rest)| ValuePath(rest.to_vec()))
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }
}

impl<S: Into<PathStep>> FromIterator<S> for ValuePath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        ValuePath(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Key(k) if i == 0 => f.write_str(k)?,
                PathStep::Key(k) => write!(f, ".{k}")?,
                PathStep::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for ValuePath {
    type Err = Infallible;

    /// Splits on `.`, `[` and `]`, dropping empty tokens. Tokens made only of
    /// ASCII digits become [PathStep::Index].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split(['.', '[', ']'])
            .filter(|t| !t.is_empty())
            .map(|t| match t.parse::<usize>() {
                Ok(n) if t.bytes().all(|b| b.is_ascii_digit()) => PathStep::Index(n),
                _ => PathStep::Key(t.to_owned()),
            })
            .collect())
    }
}

/// Returns the value addressed by `path`, if it exists.
pub fn get_at_path<'v>(root: &'v Value, path: &ValuePath) -> Option<&'v Value> {
    path.steps().iter().try_fold(root, |v, step| v.try_step(step))
}

/// Returns a copy of `root` where the value at `path` is replaced by
/// `new_value`. `root` itself is never modified.
///
/// Every step of the path, the last one included, must already resolve:
/// this only replaces values and never creates structure.
///
/// ```
/// # use serde_json::json;
/// # use lottie_editor::path::{set_at_path, ValuePath};
/// let layer = json!({"shapes": [{"ty": "fl", "c": {"a": 0, "k": [1, 0, 0, 1]}}]});
/// let path: ValuePath = "shapes[0].c.k".parse().unwrap();
/// let edited = set_at_path(&layer, &path, json!([0, 1, 0, 1])).unwrap();
/// assert_eq!(edited["shapes"][0]["c"]["k"], json!([0, 1, 0, 1]));
/// assert_eq!(layer["shapes"][0]["c"]["k"], json!([1, 0, 0, 1]));
/// ```
pub fn set_at_path(root: &Value, path: &ValuePath, new_value: Value) -> Result<Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    update_at_path(root, path, |v| {
        *v = new_value;
        Ok(())
    })
}

/// Returns a copy of `root` where `f` has been applied to the value at
/// `path`. Like [set_at_path] the path must already resolve. An empty path
/// addresses the copy of `root` itself.
pub fn update_at_path<F>(root: &Value, path: &ValuePath, f: F) -> Result<Value, PathError>
where
    F: FnOnce(&mut Value) -> Result<(), PathError>,
{
    let mut result = root.clone();
    let mut current = &mut result;
    for (depth, step) in path.steps().iter().enumerate() {
        current = current
            .try_step_mut(step)
            .ok_or_else(|| PathError::Unresolvable { path: path.clone(), depth })?;
    }
    f(current)?;
    Ok(result)
}

/// Same as [set_at_path], with the path given in its string form.
pub fn set_at_path_str(root: &Value, path: &str, new_value: Value) -> Result<Value, PathError> {
    let path = match path.parse::<ValuePath>() {
        Ok(p) => p,
        Err(e) => match e {},
    };
    set_at_path(root, &path, new_value)
}
