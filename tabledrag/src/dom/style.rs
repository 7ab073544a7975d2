use std::collections::BTreeMap;

/// Inline style declarations, property name to value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineStyle {
    properties: BTreeMap<String, String>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Overwrite properties with the ones declared in `other`.
    pub fn merge(&mut self, other: &InlineStyle) {
        for (property, value) in &other.properties {
            self.properties.insert(property.clone(), value.clone());
        }
    }
}
