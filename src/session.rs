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

//! Holder of the document currently being edited.

use crate::document::{Document, DocumentError};

pub const DEFAULT_FILE_NAME: &str = "animation.json";

/// The current document of an editor. Loads and edits either replace the
/// whole document or fail and leave it as it was.
#[derive(Debug, Clone)]
pub struct Session {
    current: Option<Document>,
    file_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self { current: None, file_name: DEFAULT_FILE_NAME.to_owned() }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name<S: Into<String>>(&mut self, file_name: S) {
        self.file_name = file_name.into();
    }

    /// Parses and validates `text` (an uploaded file or the content of the
    /// text editor) and makes it the current document.
    pub fn load<S: AsRef<str>>(&mut self, text: S) -> Result<&Document, DocumentError> {
        let document = Self::parse(text)?;
        Ok(self.replace(document))
    }

    /// Like [Session::load], also taking the name of the uploaded file.
    pub fn load_file<N: Into<String>, S: AsRef<str>>(
        &mut self,
        file_name: N,
        text: S,
    ) -> Result<&Document, DocumentError> {
        let document = Self::parse(text)?;
        self.file_name = file_name.into();
        Ok(self.replace(document))
    }

    /// Applies `edit` to the current document and keeps its result. Returns
    /// [None] when there is no document to edit.
    pub fn apply<F>(&mut self, edit: F) -> Option<Result<&Document, DocumentError>>
    where
        F: FnOnce(&Document) -> Result<Document, DocumentError>,
    {
        let current = self.current.as_mut()?;
        Some(edit(current).map(|edited| {
            *current = edited;
            &*current
        }))
    }

    /// The export file name and the compact JSON of the current document.
    pub fn export(&self) -> Option<Result<(&str, String), DocumentError>> {
        let document = self.current.as_ref()?;
        Some(document.to_export_string().map(|json| (self.file_name.as_str(), json)))
    }

    fn parse<S: AsRef<str>>(text: S) -> Result<Document, DocumentError> {
        Document::parse(text).inspect_err(|e| log::warn!("Keeping the previous document: {e}"))
    }

    fn replace(&mut self, document: Document) -> &Document {
        log::debug!("Loaded document with {} layers", document.layers().len());
        self.current.insert(document)
    }

    /// Drops the current document and resets the file name.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
