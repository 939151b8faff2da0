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

//! Colors as stored in Lottie (normalized `[r, g, b, a]` floats) and the
//! color-bearing locations of a layer.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::path::{PathError, ValuePath};

mod locator;
pub use locator::{extract_colors, update_color};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("Invalid hex color regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("A color needs at least 3 channels, got {0}.")]
    TooFewChannels(usize),
    #[error("Color channel {channel} is not a finite number.")]
    NonFinite { channel: usize },
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Returned by [from_hex] for anything that is not a 6 digit hex color.
pub const DEFAULT_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Formats the RGB channels of a normalized color as `#rrggbb`. Channels are
/// clamped to `[0, 1]`. Alpha is ignored and inputs with fewer than three
/// channels give `#000000`.
///
/// ```
/// # use lottie_editor::color::to_hex;
/// assert_eq!(to_hex(&[1.0, 0.0, 0.0]), "#ff0000");
/// ```
pub fn to_hex(color: &[f64]) -> String {
    match color {
        [r, g, b, ..] => format!("#{:02x}{:02x}{:02x}", to_byte(*r), to_byte(*g), to_byte(*b)),
        _ => "#000000".to_owned(),
    }
}

/// Parses `#rrggbb` (the `#` is optional, digits are case insensitive) into a
/// normalized color with an alpha of 1. Malformed input gives
/// [DEFAULT_COLOR].
///
/// ```
/// # use lottie_editor::color::from_hex;
/// assert_eq!(from_hex("#ff0000"), [1.0, 0.0, 0.0, 1.0]);
/// assert_eq!(from_hex("not-a-color"), [0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn from_hex(hex: &str) -> [f64; 4] {
    let Some(caps) = HEX_COLOR.captures(hex) else {
        return DEFAULT_COLOR;
    };
    let mut color = DEFAULT_COLOR;
    for (channel, m) in color.iter_mut().zip(caps.iter().skip(1).flatten()) {
        // The regex only matches two hex digits per group.
        *channel = u8::from_str_radix(m.as_str(), 16).map_or(0.0, |b| f64::from(b) / 255.0);
    }
    color
}

/// Applies a hex RGB value to `current`, keeping its alpha channel if it has
/// one. Hex carries no alpha, so a 3 channel color gets an alpha of 1.
pub fn with_hex(current: &[f64], hex: &str) -> Vec<f64> {
    let mut color = from_hex(hex).to_vec();
    if let Some(alpha) = current.get(3) {
        color[3] = *alpha;
    }
    color
}

/// Replaces (or appends) the alpha channel of `current`. Missing RGB
/// channels are filled with 0.
pub fn with_alpha(current: &[f64], alpha: f64) -> Vec<f64> {
    let mut color = current.to_vec();
    if color.len() < 3 {
        color.resize(3, 0.0);
    }
    let alpha = alpha.clamp(0.0, 1.0);
    match color.get_mut(3) {
        Some(a) => *a = alpha,
        None => color.push(alpha),
    }
    color
}

fn to_byte(channel: f64) -> u8 {
    // NaN ends up as 0.
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// What a [ColorProperty] colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKind {
    Fill,
    Stroke,
    /// A stop of a gradient fill, `stop` is 0-based.
    Gradient { stop: usize },
}

impl ColorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKind::Fill => "fill",
            ColorKind::Stroke => "stroke",
            ColorKind::Gradient { .. } => "gradient",
        }
    }

    fn label(&self) -> String {
        match self {
            ColorKind::Fill => "Fill Color".to_owned(),
            ColorKind::Stroke => "Stroke Color".to_owned(),
            ColorKind::Gradient { stop } => format!("Gradient Color {}", stop + 1),
        }
    }
}

/// Current channels of a color. [ColorValue::Keyframed] means the channels
/// are wrapped in a `{"k": [...]}` container in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Static(Vec<f64>),
    Keyframed(Vec<f64>),
}

impl ColorValue {
    pub fn channels(&self) -> &[f64] {
        match self {
            ColorValue::Static(c) | ColorValue::Keyframed(c) => c,
        }
    }

    pub fn is_keyframed(&self) -> bool {
        matches!(self, ColorValue::Keyframed(_))
    }
}

/// A color-bearing location inside a layer. These are derived from the layer
/// by [extract_colors] and become stale as soon as the layer changes shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorProperty {
    /// Location of the color relative to the layer. For gradients this is the
    /// whole stop table.
    pub path: ValuePath,
    pub label: String,
    pub value: ColorValue,
    pub kind: ColorKind,
}

impl ColorProperty {
    pub fn hex(&self) -> String {
        to_hex(self.value.channels())
    }

    /// The alpha channel, 1 when the color has none.
    pub fn alpha(&self) -> f64 {
        self.value.channels().get(3).copied().unwrap_or(1.0)
    }
}
