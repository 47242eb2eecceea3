//! User-authored filter rules and their AND/OR combination.
//!
//! Property, condition and operator names travel as strings on the wire
//! (`"name"`, `"not_contains"`, `"AND"`, ...). Unrecognised names are kept in
//! an `Unknown` variant so a malformed rule file still loads; such rules simply
//! never match.

mod eval;

pub use eval::{CompiledRule, RuleEvaluator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// File property a rule tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleProperty {
    Name,
    Extension,
    Size,
    Date,
    Duplicates,
    Unknown(String),
}

/// Comparison applied between the property and the rule value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Is,
    IsNot,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Unknown(String),
}

/// How the results of individual rules combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    And,
    /// Anything other than `AND` is treated as `OR`.
    #[default]
    Or,
}

/// Value a duplicates rule carries.
pub const IS_DUPLICATE: &str = "is_duplicate";
pub const IS_UNIQUE: &str = "is_unique";

const TEXT_CONDITIONS: &[Condition] = &[
    Condition::Contains,
    Condition::NotContains,
    Condition::Is,
    Condition::IsNot,
    Condition::StartsWith,
    Condition::EndsWith,
];

const NUMERIC_CONDITIONS: &[Condition] = &[
    Condition::GreaterThan,
    Condition::LessThan,
    Condition::Is,
];

const DUPLICATE_CONDITIONS: &[Condition] = &[Condition::Is];

impl RuleProperty {
    pub fn as_str(&self) -> &str {
        match self {
            RuleProperty::Name => "name",
            RuleProperty::Extension => "extension",
            RuleProperty::Size => "size",
            RuleProperty::Date => "date",
            RuleProperty::Duplicates => "duplicates",
            RuleProperty::Unknown(raw) => raw,
        }
    }

    /// Conditions offered for this property, in display order. The first one
    /// is what a rule resets to when its property changes.
    pub fn conditions(&self) -> &'static [Condition] {
        match self {
            RuleProperty::Name | RuleProperty::Extension | RuleProperty::Unknown(_) => {
                TEXT_CONDITIONS
            }
            RuleProperty::Size | RuleProperty::Date => NUMERIC_CONDITIONS,
            RuleProperty::Duplicates => DUPLICATE_CONDITIONS,
        }
    }

    fn default_value(&self) -> &'static str {
        match self {
            RuleProperty::Duplicates => IS_DUPLICATE,
            _ => "",
        }
    }
}

impl From<&str> for RuleProperty {
    fn from(raw: &str) -> Self {
        match raw {
            "name" => RuleProperty::Name,
            "extension" => RuleProperty::Extension,
            "size" => RuleProperty::Size,
            "date" => RuleProperty::Date,
            "duplicates" => RuleProperty::Duplicates,
            other => RuleProperty::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RuleProperty {
    fn from(raw: String) -> Self {
        RuleProperty::from(raw.as_str())
    }
}

impl From<RuleProperty> for String {
    fn from(property: RuleProperty) -> Self {
        property.as_str().to_string()
    }
}

impl fmt::Display for RuleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Is => "is",
            Condition::IsNot => "is_not",
            Condition::Contains => "contains",
            Condition::NotContains => "not_contains",
            Condition::StartsWith => "starts_with",
            Condition::EndsWith => "ends_with",
            Condition::GreaterThan => "greater_than",
            Condition::LessThan => "less_than",
            Condition::Unknown(raw) => raw,
        }
    }

    /// Short human label, as shown next to a rule.
    pub fn label(&self) -> &str {
        match self {
            Condition::Is => "is",
            Condition::IsNot => "is not",
            Condition::Contains => "contains",
            Condition::NotContains => "does not contain",
            Condition::StartsWith => "starts with",
            Condition::EndsWith => "ends with",
            Condition::GreaterThan => "is >",
            Condition::LessThan => "is <",
            Condition::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for Condition {
    fn from(raw: &str) -> Self {
        match raw {
            "is" => Condition::Is,
            "is_not" => Condition::IsNot,
            "contains" => Condition::Contains,
            "not_contains" => Condition::NotContains,
            "starts_with" => Condition::StartsWith,
            "ends_with" => Condition::EndsWith,
            "greater_than" => Condition::GreaterThan,
            "less_than" => Condition::LessThan,
            other => Condition::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        Condition::from(raw.as_str())
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.as_str().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("and") {
            Operator::And
        } else {
            Operator::Or
        }
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        Operator::from(raw.as_str())
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property/condition/value predicate. `id` is assigned by the caller
/// and must be unique within its rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub property: RuleProperty,
    pub condition: Condition,
    #[serde(default)]
    pub value: String,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        property: RuleProperty,
        condition: Condition,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            property,
            condition,
            value: value.into(),
        }
    }
}

/// Ordered rules plus the operator combining them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|rule| rule.id == id)
    }

    /// Append a fresh `name contains ""` rule. Returns `false` and leaves the
    /// set untouched when `id` is already taken.
    pub fn add_rule(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.get(&id).is_some() {
            return false;
        }
        self.rules.push(Rule::new(
            id,
            RuleProperty::Name,
            Condition::Contains,
            String::new(),
        ));
        true
    }

    /// Switch a rule to another property. The condition resets to the
    /// property's first condition and the value to its default.
    pub fn set_property(&mut self, id: &str, property: RuleProperty) -> bool {
        let Some(rule) = self.get_mut(id) else {
            return false;
        };
        rule.condition = property.conditions()[0].clone();
        rule.value = property.default_value().to_string();
        rule.property = property;
        true
    }

    pub fn set_condition(&mut self, id: &str, condition: Condition) -> bool {
        match self.get_mut(id) {
            Some(rule) => {
                rule.condition = condition;
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(rule) => {
                rule.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Delete the rule with `id`, returning it when present.
    pub fn remove_rule(&mut self, id: &str) -> Option<Rule> {
        let idx = self.rules.iter().position(|rule| rule.id == id)?;
        Some(self.rules.remove(idx))
    }

    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }
}
