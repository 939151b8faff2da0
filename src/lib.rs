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

//! Core of a Lottie editor: document validation, color discovery and
//! copy-on-write edits of Lottie JSON.

pub mod color;
pub mod document;
pub mod path;
pub mod session;
pub mod shape;
pub mod validator;

pub use color::{extract_colors, update_color, ColorError, ColorKind, ColorProperty, ColorValue};
pub use document::{Document, DocumentError, ExportStyle, LayerKind, TransformProperty};
pub use path::{get_at_path, set_at_path, PathError, PathStep, ValuePath};
pub use session::Session;
pub use validator::{validate, Validation, ValidationError};
