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

//! Borrowed view of the shape entries of a layer, limited to what the color
//! tools need.

use serde_json::Value;

/// A shape entry, discriminated by its two-letter `ty` tag. Shape kinds that
/// do not carry colors are [Shape::Other].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// `fl`. `color` is the `c` property.
    Fill { color: Option<&'a Value> },
    /// `st`. `color` is the `c` property.
    Stroke { color: Option<&'a Value> },
    /// `gf`. `gradient` is the `g` property.
    GradientFill { gradient: Option<&'a Value> },
    /// `gr`. `items` are the nested shapes in `it`.
    Group { items: &'a [Value] },
    Other,
}

impl<'a> Shape<'a> {
    /// Creates a [Shape] from a json [Value]. Anything that is not an object
    /// with a known `ty` tag is [Shape::Other].
    pub fn from_json(value: &'a Value) -> Self {
        let Some(tag) = value.get("ty").and_then(Value::as_str) else {
            return Shape::Other;
        };
        match tag {
            "fl" => Shape::Fill { color: value.get("c") },
            "st" => Shape::Stroke { color: value.get("c") },
            "gf" => Shape::GradientFill { gradient: value.get("g") },
            "gr" => Shape::Group {
                items: value
                    .get("it")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
            },
            _ => Shape::Other,
        }
    }
}
