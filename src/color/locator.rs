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

use serde_json::{json, Value};

use super::{ColorError, ColorKind, ColorProperty, ColorValue};
use crate::path::{set_at_path, update_at_path, PathError, ValuePath};
use crate::shape::Shape;

/// Values per gradient stop: position, then R, G, B.
const GRADIENT_STOP_LEN: usize = 4;

/// Finds every color in the shapes of `layer`, depth first in document order.
/// Colors with fewer than 3 channels, non numeric channels or an unknown
/// layout are skipped.
///
/// ```
/// # use serde_json::json;
/// # use lottie_editor::color::{extract_colors, ColorKind};
/// let layer = json!({"shapes": [{"ty": "fl", "c": {"a": 0, "k": [0.5, 0.5, 0.5, 1]}}]});
/// let colors = extract_colors(&layer);
/// assert_eq!(colors.len(), 1);
/// assert_eq!(colors[0].kind, ColorKind::Fill);
/// assert_eq!(colors[0].path.to_string(), "shapes[0].c.k");
/// ```
pub fn extract_colors(layer: &Value) -> Vec<ColorProperty> {
    let mut colors = vec![];
    if let Some(shapes) = layer.get("shapes").and_then(Value::as_array) {
        collect_colors(shapes, &ValuePath::from_iter(["shapes"]), &mut colors);
    }
    colors
}

/// Returns a copy of `layer` with the color described by `property` set to
/// `color`. Gradient stops only take the RGB channels of `color`.
///
/// `property` must come from [extract_colors] on this same layer, otherwise
/// the path may not resolve. `color` needs at least 3 channels, all finite.
pub fn update_color(
    layer: &Value,
    property: &ColorProperty,
    color: &[f64],
) -> Result<Value, ColorError> {
    check_color(color)?;
    let layer = match property.kind {
        ColorKind::Fill | ColorKind::Stroke => set_at_path(layer, &property.path, json!(color)),
        ColorKind::Gradient { stop } => update_at_path(layer, &property.path, |table| {
            let first = stop * GRADIENT_STOP_LEN + 1;
            for (offset, channel) in color.iter().take(3).enumerate() {
                let slot = table.get_mut(first + offset).ok_or_else(|| {
                    PathError::Unresolvable {
                        path: property.path.join(first + offset),
                        depth: property.path.len(),
                    }
                })?;
                *slot = json!(channel);
            }
            Ok(())
        }),
    }?;
    Ok(layer)
}

fn check_color(color: &[f64]) -> Result<(), ColorError> {
    if color.len() < 3 {
        return Err(ColorError::TooFewChannels(color.len()));
    }
    match color.iter().position(|c| !c.is_finite()) {
        Some(channel) => Err(ColorError::NonFinite { channel }),
        None => Ok(()),
    }
}

fn collect_colors(shapes: &[Value], base: &ValuePath, colors: &mut Vec<ColorProperty>) {
    for (index, shape) in shapes.iter().enumerate() {
        let path = base.join(index);
        match Shape::from_json(shape) {
            Shape::Fill { color: Some(c) } => {
                colors.extend(solid_color(c, path.join("c"), ColorKind::Fill))
            }
            Shape::Stroke { color: Some(c) } => {
                colors.extend(solid_color(c, path.join("c"), ColorKind::Stroke))
            }
            Shape::GradientFill { gradient: Some(g) } => {
                gradient_colors(g, path.join("g"), colors)
            }
            Shape::Group { items } => collect_colors(items, &path.join("it"), colors),
            _ => (),
        }
    }
}

/// A fill or stroke color: either a bare channel array or a `{"k": [...]}`
/// container.
fn solid_color(color: &Value, path: ValuePath, kind: ColorKind) -> Option<ColorProperty> {
    let (path, value) = match color {
        Value::Array(c) => (path, ColorValue::Static(channels(c)?)),
        Value::Object(o) => {
            let c = o.get("k")?.as_array()?;
            (path.join("k"), ColorValue::Keyframed(channels(c)?))
        }
        _ => return None,
    };
    (value.channels().len() >= 3).then(|| ColorProperty { path, label: kind.label(), value, kind })
}

/// The stop table of a gradient is either `g.k` or, inside a keyframe
/// container, `g.k.k`. When `g.p` is present only that many stops are colors;
/// the values after them are opacity stops.
fn gradient_colors(gradient: &Value, path: ValuePath, colors: &mut Vec<ColorProperty>) {
    let (path, table, keyframed) = match gradient.get("k") {
        Some(Value::Array(t)) => (path.join("k"), t, false),
        Some(Value::Object(o)) => match o.get("k") {
            Some(Value::Array(t)) => (path.join("k").join("k"), t, true),
            _ => return,
        },
        _ => return,
    };
    let Some(table) = channels(table) else {
        return;
    };

    let mut stops = table.len() / GRADIENT_STOP_LEN;
    if let Some(declared) = gradient.get("p").and_then(Value::as_u64) {
        stops = stops.min(usize::try_from(declared).unwrap_or(usize::MAX));
    }

    colors.extend((0..stops).map(|stop| {
        let first = stop * GRADIENT_STOP_LEN + 1;
        let rgb = table[first..first + 3].to_vec();
        let kind = ColorKind::Gradient { stop };
        ColorProperty {
            path: path.clone(),
            label: kind.label(),
            value: if keyframed { ColorValue::Keyframed(rgb) } else { ColorValue::Static(rgb) },
            kind,
        }
    }));
}

/// All entries as floats, or [None] if any of them is not a number.
fn channels(values: &[Value]) -> Option<Vec<f64>> {
    values.iter().map(Value::as_f64).collect()
}
