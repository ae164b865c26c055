//! Element Attributes
//!
//! Names are ASCII-lowercased on the way in, so lookups are
//! case-insensitive the way HTML attributes are.

use std::collections::HashMap;

/// Insertion-ordered attribute list with a name index
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Name/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            value: value.into(),
        }
    }
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Value of `name`, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name)
            .and_then(|i| self.attributes.get(i))
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        let attr = Attr::new(name, value);
        if let Some(&index) = self.by_name.get(&attr.name) {
            let old = std::mem::replace(&mut self.attributes[index], attr);
            Some(old.value)
        } else {
            self.by_name.insert(attr.name.clone(), self.attributes.len());
            self.attributes.push(attr);
            None
        }
    }

    /// Drop `name` and return the removed attribute
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let key = name.to_ascii_lowercase();
        let index = self.by_name.remove(&key)?;
        // Slots after the removed one move down by one
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Presence test for boolean attributes such as `disabled`
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Toggle a boolean attribute
    pub fn toggle(&mut self, name: &str, force: Option<bool>) -> bool {
        let present = self.contains(name);
        match force.unwrap_or(!present) {
            true => {
                if !present {
                    self.set(name, "");
                }
                true
            }
            false => {
                self.remove(name);
                false
            }
        }
    }

    /// Iterate over attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        match self.by_name.get(name) {
            Some(&i) => Some(i),
            None if name.bytes().any(|b| b.is_ascii_uppercase()) => {
                self.by_name.get(&name.to_ascii_lowercase()).copied()
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = NamedNodeMap::new();
        attrs.set("class", "btn");
        attrs.set("id", "submit");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("id"), Some("submit"));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut attrs = NamedNodeMap::new();
        attrs.set("tabIndex", "0");
        assert_eq!(attrs.get("tabindex"), Some("0"));
        assert_eq!(attrs.get("TABINDEX"), Some("0"));
        assert_eq!(attrs.set("tabindex", "-1"), Some("0".to_string()));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_indices() {
        let mut attrs = NamedNodeMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        attrs.set("c", "3");

        assert_eq!(attrs.remove("a").map(|a| a.value), Some("1".to_string()));
        assert!(!attrs.contains("a"));
        assert_eq!(attrs.get("b"), Some("2"));
        assert_eq!(attrs.get("c"), Some("3"));
        assert!(attrs.remove("a").is_none());
    }

    #[test]
    fn test_toggle_attribute() {
        let mut attrs = NamedNodeMap::new();

        assert!(attrs.toggle("disabled", None));
        assert!(attrs.contains("disabled"));

        assert!(!attrs.toggle("disabled", None));
        assert!(!attrs.contains("disabled"));

        assert!(attrs.toggle("disabled", Some(true)));
        assert!(attrs.toggle("disabled", Some(true)));
        assert_eq!(attrs.len(), 1);
    }
}
