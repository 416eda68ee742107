//! The PII Finding Set: categorised, ordered, de-duplicated matches found in a
//! document's cleaned text.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The closed set of PII categories the extractor reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Email,
    Phone,
    Date,
    Id,
}

impl PiiCategory {
    /// All categories, in report order.
    pub const ALL: [PiiCategory; 4] = [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::Date,
        PiiCategory::Id,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PiiCategory::Email => "email",
            PiiCategory::Phone => "phone",
            PiiCategory::Date => "date",
            PiiCategory::Id => "id",
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matched substrings per category.
///
/// Within a category values are unique, non-empty, and kept in first-occurrence
/// order. Serialises as `{"email": [...], "phone": [...], "date": [...], "id": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiiFindingSet {
    email: Vec<String>,
    phone: Vec<String>,
    date: Vec<String>,
    id: Vec<String>,
}

impl PiiFindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, category: PiiCategory) -> &mut Vec<String> {
        match category {
            PiiCategory::Email => &mut self.email,
            PiiCategory::Phone => &mut self.phone,
            PiiCategory::Date => &mut self.date,
            PiiCategory::Id => &mut self.id,
        }
    }

    /// Appends `value` to `category`. Empty strings and repeats are ignored.
    /// Returns whether the value was added.
    pub fn insert(&mut self, category: PiiCategory, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        let slot = self.slot_mut(category);
        if slot.contains(&value) {
            return false;
        }
        slot.push(value);
        true
    }

    pub fn get(&self, category: PiiCategory) -> &[String] {
        match category {
            PiiCategory::Email => &self.email,
            PiiCategory::Phone => &self.phone,
            PiiCategory::Date => &self.date,
            PiiCategory::Id => &self.id,
        }
    }

    /// `(category, values)` pairs in report order, including empty categories.
    pub fn iter(&self) -> impl Iterator<Item = (PiiCategory, &[String])> + '_ {
        PiiCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// True when no category holds any match.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, values)| values.is_empty())
    }

    /// Total number of findings across all categories.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, values)| values.len()).sum()
    }

    /// Every distinct finding with category labels discarded.
    pub fn sensitive_strings(&self) -> BTreeSet<&str> {
        self.iter()
            .flat_map(|(_, values)| values.iter())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl FromIterator<(PiiCategory, String)> for PiiFindingSet {
    fn from_iter<I: IntoIterator<Item = (PiiCategory, String)>>(iter: I) -> Self {
        let mut set = PiiFindingSet::new();
        for (category, value) in iter {
            set.insert(category, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedupes_and_keeps_order() {
        let mut set = PiiFindingSet::new();
        assert!(set.insert(PiiCategory::Phone, "555-123-4567"));
        assert!(set.insert(PiiCategory::Phone, "555 000 1111"));
        assert!(!set.insert(PiiCategory::Phone, "555-123-4567"));
        assert!(!set.insert(PiiCategory::Phone, ""));
        assert_eq!(set.get(PiiCategory::Phone), ["555-123-4567", "555 000 1111"]);
    }

    #[test]
    fn test_same_value_in_two_categories_is_one_sensitive_string() {
        let set: PiiFindingSet = vec![
            (PiiCategory::Id, "12/04/2020".to_string()),
            (PiiCategory::Date, "12/04/2020".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sensitive_strings().len(), 1);
    }

    #[test]
    fn test_is_empty() {
        let mut set = PiiFindingSet::new();
        assert!(set.is_empty());
        set.insert(PiiCategory::Date, "1/2/2003");
        assert!(!set.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut set = PiiFindingSet::new();
        set.insert(PiiCategory::Email, "jane@x.com");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": ["jane@x.com"], "phone": [], "date": [], "id": [] })
        );
    }
}
