use std::collections::BTreeMap;

use smallvec::{SmallVec, smallvec};

/// A predicate on a single numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    /// `x <= bound`
    AtMost(f64),
    /// `x < bound`
    Below(f64),
    /// `x >= bound`
    AtLeast(f64),
    /// `x > bound`
    Above(f64),
    /// `lower < x <= upper`
    Within { lower: f64, upper: f64 },
}

impl Predicate {
    /// Returns *true* if `x` satisfies the predicate. `NaN` never does.
    pub fn matches(&self, x: f64) -> bool {
        match *self {
            Predicate::AtMost(b) => x <= b,
            Predicate::Below(b) => x < b,
            Predicate::AtLeast(b) => x >= b,
            Predicate::Above(b) => x > b,
            Predicate::Within { lower, upper } => lower < x && x <= upper,
        }
    }
}

/// An ordered list of `(predicate, label)` rules with a fallback label.
///
/// A value is assigned the label of the **first** matching rule, or the fallback if no rule
/// matches, so every value is labelled.
///
/// # Example
/// ```
/// use tollgraph::tables::*;
///
/// let rules = CategoryRules::new("high")
///     .rule(Predicate::AtMost(15.0), "low")
///     .rule(Predicate::AtMost(25.0), "medium");
///
/// assert_eq!(rules.classify(15.0), "low");
/// assert_eq!(rules.classify(15.5), "medium");
/// assert_eq!(rules.classify(40.0), "high");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryRules {
    rules: SmallVec<[(Predicate, String); 4]>,
    fallback: String,
}

impl CategoryRules {
    /// Creates rules without any predicate; every value gets `fallback`
    pub fn new<S: Into<String>>(fallback: S) -> Self {
        Self {
            rules: smallvec![],
            fallback: fallback.into(),
        }
    }

    /// Appends a rule; it is only consulted if all earlier rules did not match
    pub fn rule<S: Into<String>>(mut self, predicate: Predicate, label: S) -> Self {
        self.rules.push((predicate, label.into()));
        self
    }

    /// The car classification of the vehicle dataset:
    /// `low` for `x <= 15`, `medium` for `15 < x <= 25` and `high` otherwise
    pub fn car_types() -> Self {
        Self::new("high")
            .rule(Predicate::AtMost(15.0), "low")
            .rule(Predicate::Within { lower: 15.0, upper: 25.0 }, "medium")
    }

    /// Returns the label of the first matching rule or the fallback
    pub fn classify(&self, x: f64) -> &str {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate.matches(x))
            .map_or(self.fallback.as_str(), |(_, label)| label.as_str())
    }

    /// Counts how many values fall into each label.
    /// Only labels that occur are present; the map is sorted by label.
    pub fn count<T>(&self, values: T) -> BTreeMap<String, usize>
    where
        T: IntoIterator<Item = f64>,
    {
        let mut counts = BTreeMap::new();
        for x in values {
            *counts.entry(self.classify(x).to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::car_types()
    }
}
