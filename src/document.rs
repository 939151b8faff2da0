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

//! A Lottie document that passed the validator, and the edits the editor
//! makes on it.
//!
//! Every edit returns a new [Document] and leaves the old one untouched. The
//! result is validated again, so an edit that breaks one of the validated
//! fields is rejected instead of replacing the current document.

use std::fmt;
use std::io::{Read, Write};

use serde_json::Value;
use thiserror::Error;

use crate::color::{extract_colors, update_color, ColorError, ColorProperty};
use crate::path::{set_at_path, PathError, ValuePath};
use crate::validator::{validate, Validation};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse Lottie JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid Lottie JSON:\n{0}")]
    Invalid(#[from] Validation),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Color(ColorError),
    #[error("Transform values must be finite numbers, got {0}.")]
    NonFinite(f64),
    #[error("Layer {index} does not exist, the document has {count} layers.")]
    LayerOutOfRange { index: usize, count: usize },
}

impl From<ColorError> for DocumentError {
    fn from(e: ColorError) -> Self {
        match e {
            ColorError::Path(e) => DocumentError::Path(e),
            e => DocumentError::Color(e),
        }
    }
}

/// How a document is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportStyle {
    /// Single line, for exported files.
    #[default]
    Compact,
    /// Indented by two spaces, for the text editor view.
    Pretty,
}

/// Layer type, from the numeric `ty` of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    Precomp,
    Solid,
    Image,
    Null,
    Shape,
    Text,
    Other(f64),
}

impl From<f64> for LayerKind {
    fn from(ty: f64) -> Self {
        if ty.fract() != 0.0 {
            return LayerKind::Other(ty);
        }
        match ty as i64 {
            0 => LayerKind::Precomp,
            1 => LayerKind::Solid,
            2 => LayerKind::Image,
            3 => LayerKind::Null,
            4 => LayerKind::Shape,
            5 => LayerKind::Text,
            _ => LayerKind::Other(ty),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Precomp => f.write_str("Precomp"),
            LayerKind::Solid => f.write_str("Solid"),
            LayerKind::Image => f.write_str("Image"),
            LayerKind::Null => f.write_str("Null"),
            LayerKind::Shape => f.write_str("Shape"),
            LayerKind::Text => f.write_str("Text"),
            LayerKind::Other(ty) => write!(f, "Type {ty}"),
        }
    }
}

/// Transform properties with a static `[x, y, ...]` value under `ks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformProperty {
    /// `ks.p`
    Position,
    /// `ks.s`, in percent.
    Scale,
}

impl TransformProperty {
    fn key(&self) -> &'static str {
        match self {
            TransformProperty::Position => "p",
            TransformProperty::Scale => "s",
        }
    }
}

/// A validated Lottie document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Validates `root` and wraps it.
    pub fn from_value(root: Value) -> Result<Self, DocumentError> {
        let validation = validate(&root);
        if !validation.is_valid() {
            log::warn!("Rejected Lottie document: {}", validation.messages().join(" "));
        }
        validation.into_result()?;
        Ok(Document { root })
    }

    /// Parses and validates Lottie JSON text.
    ///
    /// ```
    /// # use lottie_editor::document::Document;
    /// let doc = Document::parse(r#"{"v":"5.5.2","fr":30,"w":100,"h":100,"layers":[]}"#).unwrap();
    /// assert_eq!(doc.layers().len(), 0);
    /// assert!(Document::parse("{}").is_err());
    /// ```
    pub fn parse<S: AsRef<str>>(text: S) -> Result<Self, DocumentError> {
        Self::from_value(serde_json::from_str(text.as_ref())?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DocumentError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn to_string_with(&self, style: ExportStyle) -> Result<String, DocumentError> {
        Ok(match style {
            ExportStyle::Compact => serde_json::to_string(&self.root)?,
            ExportStyle::Pretty => serde_json::to_string_pretty(&self.root)?,
        })
    }

    /// Single line JSON, as written to exported files.
    pub fn to_export_string(&self) -> Result<String, DocumentError> {
        self.to_string_with(ExportStyle::Compact)
    }

    /// JSON indented by two spaces, for the text editor.
    pub fn to_pretty_string(&self) -> Result<String, DocumentError> {
        self.to_string_with(ExportStyle::Pretty)
    }

    pub fn write_to<W: Write>(&self, writer: W, style: ExportStyle) -> Result<(), DocumentError> {
        match style {
            ExportStyle::Compact => serde_json::to_writer(writer, &self.root)?,
            ExportStyle::Pretty => serde_json::to_writer_pretty(writer, &self.root)?,
        }
        Ok(())
    }

    /// The animation name (`nm`), if any.
    pub fn name(&self) -> Option<&str> {
        self.root.get("nm").and_then(Value::as_str)
    }

    pub fn layers(&self) -> &[Value] {
        self.root.get("layers").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn layer(&self, index: usize) -> Result<&Value, DocumentError> {
        let layers = self.layers();
        layers.get(index).ok_or(DocumentError::LayerOutOfRange { index, count: layers.len() })
    }

    pub fn layer_kind(&self, index: usize) -> Result<LayerKind, DocumentError> {
        // `ty` is validated to be a number.
        Ok(self.layer(index)?.get("ty").and_then(Value::as_f64).unwrap_or(-1.0).into())
    }

    /// Sets a top level property such as the name (`nm`), frame rate (`fr`),
    /// width (`w`) or height (`h`). The property is created if missing.
    pub fn with_property(&self, key: &str, value: Value) -> Result<Self, DocumentError> {
        let mut root = self.root.clone();
        if let Value::Object(o) = &mut root {
            o.insert(key.to_owned(), value);
        }
        log::debug!("Set animation property <{key}>");
        Self::from_value(root)
    }

    /// Sets a property of the layer at `index`, such as its name (`nm`), in
    /// point (`ip`), out point (`op`) or start time (`st`). The property is
    /// created if missing.
    pub fn with_layer_property(
        &self,
        index: usize,
        key: &str,
        value: Value,
    ) -> Result<Self, DocumentError> {
        let mut root = self.root.clone();
        let layer = layer_mut(&mut root, index)?;
        if let Value::Object(o) = layer {
            o.insert(key.to_owned(), value);
        }
        log::debug!("Set property <{key}> of layer {index}");
        Self::from_value(root)
    }

    /// Removes the layer at `index`.
    pub fn without_layer(&self, index: usize) -> Result<Self, DocumentError> {
        self.layer(index)?;
        let mut root = self.root.clone();
        if let Some(layers) = root.get_mut("layers").and_then(Value::as_array_mut) {
            layers.remove(index);
        }
        log::debug!("Removed layer {index}");
        Self::from_value(root)
    }

    /// Sets one component (0 for x, 1 for y...) of a static position or scale
    /// of the layer at `index`. The component must already exist and `value`
    /// must be finite.
    pub fn with_transform_component(
        &self,
        index: usize,
        property: TransformProperty,
        component: usize,
        value: f64,
    ) -> Result<Self, DocumentError> {
        self.layer(index)?;
        if !value.is_finite() {
            log::warn!("Rejected transform value {value} for layer {index}");
            return Err(DocumentError::NonFinite(value));
        }
        let path = ValuePath::from_iter(["layers"])
            .join(index)
            .join("ks")
            .join(property.key())
            .join("k")
            .join(component);
        let root = set_at_path(&self.root, &path, Value::from(value)).inspect_err(|e| {
            log::warn!("Failed to set transform of layer {index}: {e}");
        })?;
        Self::from_value(root)
    }

    /// Colors found in the shapes of the layer at `index`. Paths are relative
    /// to the layer.
    pub fn layer_colors(&self, index: usize) -> Result<Vec<ColorProperty>, DocumentError> {
        Ok(extract_colors(self.layer(index)?))
    }

    /// Writes `color` to the location described by `property`, which should
    /// come from [Document::layer_colors] for the same layer.
    pub fn with_layer_color(
        &self,
        index: usize,
        property: &ColorProperty,
        color: &[f64],
    ) -> Result<Self, DocumentError> {
        let layer = update_color(self.layer(index)?, property, color).inspect_err(|e| {
            log::warn!("Failed to update {} of layer {index}: {e}", property.label);
        })?;
        let mut root = self.root.clone();
        *layer_mut(&mut root, index)? = layer;
        log::debug!("Set {} of layer {index} at <{}>", property.label, property.path);
        Self::from_value(root)
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(root: Value) -> Result<Self, Self::Error> {
        Self::from_value(root)
    }
}

impl std::str::FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn layer_mut(root: &mut Value, index: usize) -> Result<&mut Value, DocumentError> {
    let layers = root.get_mut("layers").and_then(Value::as_array_mut);
    let count = layers.as_ref().map_or(0, |l| l.len());
    layers.and_then(|l| l.get_mut(index)).ok_or(DocumentError::LayerOutOfRange { index, count })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::ColorKind;
    use serde_json::json;

    fn animation() -> Value {
        json!({
            "v": "5.5.2",
            "nm": "Pulse",
            "fr": 30,
            "ip": 0,
            "op": 60,
            "w": 512,
            "h": 512,
            "ddd": 0,
            "layers": [
                {
                    "ty": 4,
                    "nm": "Circle",
                    "ip": 0,
                    "op": 60,
                    "st": 0,
                    "ks": {
                        "p": {"a": 0, "k": [256, 256, 0]},
                        "s": {"a": 0, "k": [100, 100, 100]},
                        "r": {"a": 0, "k": 0},
                        "o": {"a": 0, "k": 100}
                    },
                    "shapes": [
                        {"ty": "gr", "it": [
                            {"ty": "el", "s": {"a": 0, "k": [100, 100]}},
                            {"ty": "fl", "c": {"a": 0, "k": [1, 0, 0, 1]}, "o": {"a": 0, "k": 100}},
                            {"ty": "tr"}
                        ]}
                    ]
                },
                {"ty": 3, "nm": "Controller", "ip": 0, "op": 60, "st": 0, "ks": {}}
            ]
        })
    }

    fn document() -> Document {
        Document::from_value(animation()).unwrap()
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(
            Document::parse("[1, 2]"),
            Err(DocumentError::Invalid(v)) if v.errors().len() == 1
        ));
        assert!(matches!(Document::parse("{\"v\": "), Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_from_reader() {
        let text = serde_json::to_vec(&animation()).unwrap();
        let doc = Document::from_reader(text.as_slice()).unwrap();
        assert_eq!(doc, document());
        assert_eq!(doc.name(), Some("Pulse"));
    }

    #[test]
    fn test_export() {
        let doc = document();
        let compact = doc.to_export_string().unwrap();
        assert!(!compact.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&compact).unwrap(), animation());

        let pretty = doc.to_pretty_string().unwrap();
        assert!(pretty.starts_with("{\n  \""));
        assert_eq!(Document::parse(&pretty).unwrap(), doc);

        let mut written = vec![];
        doc.write_to(&mut written, ExportStyle::Compact).unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), compact);
    }

    #[test]
    fn test_layer_kind() {
        let doc = document();
        assert_eq!(doc.layer_kind(0).unwrap(), LayerKind::Shape);
        assert_eq!(doc.layer_kind(1).unwrap().to_string(), "Null");
        assert_eq!(LayerKind::from(13.0).to_string(), "Type 13");
        assert_eq!(LayerKind::from(4.5), LayerKind::Other(4.5));
        assert!(matches!(
            doc.layer_kind(2),
            Err(DocumentError::LayerOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_with_property() {
        let doc = document();
        let edited = doc.with_property("fr", json!(60)).unwrap();
        assert_eq!(edited.as_value()["fr"], json!(60));
        assert_eq!(doc.as_value()["fr"], json!(30));

        let renamed = doc.with_property("nm", json!("Renamed")).unwrap();
        assert_eq!(renamed.name(), Some("Renamed"));
    }

    #[test]
    fn test_with_property_revalidates() {
        assert!(matches!(
            document().with_property("w", json!("wide")),
            Err(DocumentError::Invalid(v))
                if v.messages() == ["Lottie JSON must have a 'w' property of type number."]
        ));
    }

    #[test]
    fn test_with_layer_property() {
        let doc = document();
        let edited = doc.with_layer_property(1, "nm", json!("Null 1")).unwrap();
        assert_eq!(edited.layer(1).unwrap()["nm"], json!("Null 1"));
        assert_eq!(doc.layer(1).unwrap()["nm"], json!("Controller"));

        assert!(matches!(
            doc.with_layer_property(0, "op", Value::Null),
            Err(DocumentError::Invalid(_))
        ));
        assert!(matches!(
            doc.with_layer_property(7, "nm", json!("x")),
            Err(DocumentError::LayerOutOfRange { index: 7, count: 2 })
        ));
    }

    #[test]
    fn test_without_layer() {
        let doc = document();
        let edited = doc.without_layer(0).unwrap();
        assert_eq!(edited.layers().len(), 1);
        assert_eq!(edited.layer(0).unwrap()["nm"], json!("Controller"));
        assert_eq!(doc.layers().len(), 2);
        assert!(matches!(edited.without_layer(1), Err(DocumentError::LayerOutOfRange { .. })));
    }

    #[test]
    fn test_with_transform_component() {
        let doc = document();
        let moved = doc.with_transform_component(0, TransformProperty::Position, 1, 128.0).unwrap();
        assert_eq!(moved.layer(0).unwrap()["ks"]["p"]["k"], json!([256, 128.0, 0]));

        let scaled = moved.with_transform_component(0, TransformProperty::Scale, 0, 50.0).unwrap();
        assert_eq!(scaled.layer(0).unwrap()["ks"]["s"]["k"], json!([50.0, 100, 100]));
        assert_eq!(scaled.layer(0).unwrap()["ks"]["p"]["k"], json!([256, 128.0, 0]));
    }

    #[test]
    fn test_with_transform_component_missing() {
        let doc = document();
        assert!(matches!(
            doc.with_transform_component(1, TransformProperty::Position, 0, 1.0),
            Err(DocumentError::Path(PathError::Unresolvable { depth: 3, .. }))
        ));
        assert!(matches!(
            doc.with_transform_component(0, TransformProperty::Scale, 3, 1.0),
            Err(DocumentError::Path(PathError::Unresolvable { depth: 5, .. }))
        ));
    }

    #[test]
    fn test_with_transform_component_rejects_non_finite() {
        let doc = document();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                doc.with_transform_component(0, TransformProperty::Position, 0, value),
                Err(DocumentError::NonFinite(_))
            ));
        }
        assert!(matches!(
            doc.with_transform_component(1, TransformProperty::Scale, 0, f64::NAN),
            Err(DocumentError::NonFinite(v)) if v.is_nan()
        ));
        assert!(matches!(
            doc.with_transform_component(2, TransformProperty::Scale, 0, f64::NAN),
            Err(DocumentError::LayerOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn test_layer_colors_round_trip() {
        let doc = document();
        let colors = doc.layer_colors(0).unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].kind, ColorKind::Fill);
        assert_eq!(colors[0].path.to_string(), "shapes[0].it[1].c.k");
        assert_eq!(colors[0].hex(), "#ff0000");

        let edited = doc.with_layer_color(0, &colors[0], &[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(edited.layer_colors(0).unwrap()[0].hex(), "#0000ff");
        assert_eq!(doc.layer_colors(0).unwrap(), colors);
        assert_eq!(edited.layer(1).unwrap(), doc.layer(1).unwrap());
        assert!(doc.layer_colors(1).unwrap().is_empty());
    }

    #[test]
    fn test_with_layer_color_on_wrong_layer() {
        let doc = document();
        let colors = doc.layer_colors(0).unwrap();
        assert!(matches!(
            doc.with_layer_color(1, &colors[0], &[0.0, 0.0, 0.0]),
            Err(DocumentError::Path(_))
        ));
    }

    #[test]
    fn test_with_layer_color_rejects_malformed_color() {
        let doc = document();
        let colors = doc.layer_colors(0).unwrap();
        assert!(matches!(
            doc.with_layer_color(0, &colors[0], &[]),
            Err(DocumentError::Color(ColorError::TooFewChannels(0)))
        ));
        assert!(matches!(
            doc.with_layer_color(0, &colors[0], &[f64::NAN, 0.0, 0.0, 1.0]),
            Err(DocumentError::Color(ColorError::NonFinite { channel: 0 }))
        ));
        assert_eq!(doc.layer_colors(0).unwrap(), colors);
    }
}
