// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expansion of property path templates.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A custom template expansion function, given the template and the variables.
pub type FormatFunction = Rc<dyn Fn(&str, &HashMap<String, String>) -> String>;

/// Expands `${name}` placeholders in property path templates.
///
/// The default variable table maps `geometryId` to `"0"`.
#[derive(Clone)]
pub struct PropertyPathFormatter {
    variables: HashMap<String, String>,
    custom: Option<FormatFunction>,
}

impl PropertyPathFormatter {
    /// Creates a formatter with the default variable table.
    pub fn new() -> Self {
        let mut variables = HashMap::new();
        variables.insert("geometryId".to_owned(), "0".to_owned());
        Self {
            variables,
            custom: None,
        }
    }

    /// Replaces the variable table.
    pub fn set_variables(&mut self, variables: HashMap<String, String>) {
        self.variables = variables;
    }

    /// Sets a single variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Returns the variable table.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Replaces `${name}` substitution with a custom function.
    pub fn set_format_function(&mut self, function: FormatFunction) {
        self.custom = Some(function);
    }

    /// Expands a template into a concrete property path.
    pub fn format(&self, template: &str) -> String {
        match &self.custom {
            Some(function) => function(template, &self.variables),
            None => substitute(template, &self.variables),
        }
    }
}

impl Default for PropertyPathFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyPathFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyPathFormatter")
            .field("variables", &self.variables)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

/// Replaces every `${name}` whose name is in `variables`. Unknown or
/// unterminated placeholders are kept as written.
pub fn substitute(template: &str, variables: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        match variables.get(&after[..end]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 3]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Splits an input name at its first array bracket: `light[2].color` gives
/// `("light", "[2].color")`, a plain name gives `(name, "")`.
pub fn split_array_index(name: &str) -> (&str, &str) {
    match name.find('[') {
        Some(pos) => name.split_at(pos),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_id_is_zero() {
        let formatter = PropertyPathFormatter::new();
        assert_eq!(
            formatter.format("geometry[${geometryId}].indices"),
            "geometry[0].indices"
        );
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_kept() {
        let formatter = PropertyPathFormatter::new();
        assert_eq!(formatter.format("a.${lightId}.b"), "a.${lightId}.b");
        assert_eq!(formatter.format("a.${geometryId"), "a.${geometryId");
    }

    #[test]
    fn several_placeholders_in_one_template() {
        let mut formatter = PropertyPathFormatter::new();
        formatter.set_variable("geometryId", "3");
        formatter.set_variable("lightId", "1");
        assert_eq!(
            formatter.format("light[${lightId}].shadow[${geometryId}]"),
            "light[1].shadow[3]"
        );
    }

    #[test]
    fn custom_function_replaces_substitution() {
        let mut formatter = PropertyPathFormatter::new();
        formatter.set_format_function(Rc::new(|template, _| template.to_uppercase()));
        assert_eq!(formatter.format("camera.fov"), "CAMERA.FOV");
    }

    #[test]
    fn array_index_split() {
        assert_eq!(split_array_index("light[2].color"), ("light", "[2].color"));
        assert_eq!(split_array_index("diffuseColor"), ("diffuseColor", ""));
    }
}
