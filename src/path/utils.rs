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

use super::PathStep;

use serde_json::Value;

/// Single step descent into a [Value]. A [PathStep::Key] only resolves
/// against an object and a [PathStep::Index] only against an array.
pub(crate) trait TryStep {
    fn try_step(&self, step: &PathStep) -> Option<&Value>;
    fn try_step_mut(&mut self, step: &PathStep) -> Option<&mut Value>;
}

impl TryStep for Value {
    fn try_step(&self, step: &PathStep) -> Option<&Value> {
        match (self, step) {
            (Value::Object(o), PathStep::Key(k)) => o.get(k),
            (Value::Array(a), PathStep::Index(i)) => a.get(*i),
            _ => None,
        }
    }

    fn try_step_mut(&mut self, step: &PathStep) -> Option<&mut Value> {
        match (self, step) {
            (Value::Object(o), PathStep::Key(k)) => o.get_mut(k),
            (Value::Array(a), PathStep::Index(i)) => a.get_mut(*i),
            _ => None,
        }
    }
}
