//! Attribute matching.
//!
//! Each value of each trigger attribute is searched (not fully matched) for
//! the policy pattern. Trigger names the principal does not carry are skipped.

use gatehouse_core::Attributes;
use regex::Regex;

/// Outcome of matching principal attributes against a trigger pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMatch {
    matched: Vec<String>,
}

impl AttributeMatch {
    /// Whether at least one attribute had a matching value.
    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Names of the attributes with at least one matching value, in trigger order.
    pub fn matched_names(&self) -> &[String] {
        &self.matched
    }

    pub fn into_names(self) -> Vec<String> {
        self.matched
    }
}

/// Matches principal attributes against a compiled trigger pattern.
pub struct AttributeMatcher<'a> {
    pattern: &'a Regex,
}

impl<'a> AttributeMatcher<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }

    /// Match the named attributes.
    pub fn matches(&self, attributes: &Attributes, trigger_names: &[String]) -> AttributeMatch {
        let matched = trigger_names
            .iter()
            .filter(|name| {
                attributes
                    .get(name.as_str())
                    .is_some_and(|values| values.iter().any(|v| self.pattern.is_match(v)))
            })
            .cloned()
            .collect();

        AttributeMatch { matched }
    }
}
