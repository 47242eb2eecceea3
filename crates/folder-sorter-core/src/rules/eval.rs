use super::{Condition, Operator, Rule, RuleProperty, RuleSet, IS_DUPLICATE, IS_UNIQUE};
use crate::model::{FileRecord, TimeBasis};
use crate::size::parse_size_kb;
use crate::wildcard::Wildcard;
use std::cmp::Ordering;
use tracing::debug;

/// Tolerance for `size is` comparisons, in kilobytes.
const SIZE_EQ_TOLERANCE_KB: f64 = 0.01;

/// Evaluates rules against file records.
///
/// Holds only the two facts the rules depend on besides the file itself:
/// whether a duplicate scan has run, and which calendar dates are read in.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator {
    pub duplicates_scanned: bool,
    pub time_basis: TimeBasis,
}

#[derive(Debug, Clone, Copy)]
pub enum TextSubject {
    Stem,
    Extension,
}

#[derive(Debug, Clone, Copy)]
pub enum Compare {
    Greater,
    Less,
    Equal,
}

/// A rule with its value parsed and its pattern compiled, ready to be tested
/// against many files.
#[derive(Debug, Clone)]
pub enum CompiledRule {
    Text {
        subject: TextSubject,
        pattern: Wildcard,
        negate: bool,
    },
    /// `limit_kb` is `None` when the value did not parse; such a rule fails.
    Size {
        compare: Compare,
        limit_kb: Option<f64>,
    },
    Date {
        compare: Compare,
        value: String,
    },
    /// `want` is `Some(true)` for duplicates, `Some(false)` for unique files.
    Duplicates { want: Option<bool> },
    /// Unsupported property/condition pairing.
    Never,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Self {
        match &rule.property {
            RuleProperty::Name => compile_text(TextSubject::Stem, &rule.condition, &rule.value),
            RuleProperty::Extension => {
                compile_text(TextSubject::Extension, &rule.condition, &rule.value)
            }
            RuleProperty::Size => match compare_for(&rule.condition) {
                Some(compare) => CompiledRule::Size {
                    compare,
                    limit_kb: parse_size_kb(&rule.value),
                },
                None => CompiledRule::Never,
            },
            RuleProperty::Date => match compare_for(&rule.condition) {
                Some(compare) => CompiledRule::Date {
                    compare,
                    value: rule.value.clone(),
                },
                None => CompiledRule::Never,
            },
            RuleProperty::Duplicates => CompiledRule::Duplicates {
                want: match rule.value.as_str() {
                    IS_DUPLICATE => Some(true),
                    IS_UNIQUE => Some(false),
                    _ => None,
                },
            },
            RuleProperty::Unknown(_) => CompiledRule::Never,
        }
    }
}

fn compile_text(subject: TextSubject, condition: &Condition, value: &str) -> CompiledRule {
    let (pattern, negate) = match condition {
        Condition::Is => (Wildcard::new(value), false),
        Condition::IsNot => (Wildcard::new(value), true),
        Condition::Contains => (Wildcard::containing(value), false),
        Condition::NotContains => (Wildcard::containing(value), true),
        Condition::StartsWith => (Wildcard::prefix(value), false),
        Condition::EndsWith => (Wildcard::suffix(value), false),
        Condition::GreaterThan | Condition::LessThan | Condition::Unknown(_) => {
            return CompiledRule::Never
        }
    };
    CompiledRule::Text {
        subject,
        pattern,
        negate,
    }
}

fn compare_for(condition: &Condition) -> Option<Compare> {
    match condition {
        Condition::GreaterThan => Some(Compare::Greater),
        Condition::LessThan => Some(Compare::Less),
        Condition::Is => Some(Compare::Equal),
        _ => None,
    }
}

impl RuleEvaluator {
    pub fn new(duplicates_scanned: bool, time_basis: TimeBasis) -> Self {
        Self {
            duplicates_scanned,
            time_basis,
        }
    }

    /// Test a single rule against a file.
    pub fn evaluate(&self, file: &FileRecord, rule: &Rule) -> bool {
        self.test(file, &CompiledRule::compile(rule))
    }

    /// Test an already compiled rule against a file.
    pub fn test(&self, file: &FileRecord, rule: &CompiledRule) -> bool {
        match rule {
            CompiledRule::Text {
                subject,
                pattern,
                negate,
            } => {
                let text = match subject {
                    TextSubject::Stem => file.stem(),
                    TextSubject::Extension => file.extension(),
                };
                pattern.is_match(text) != *negate
            }
            CompiledRule::Size { compare, limit_kb } => {
                let Some(limit) = limit_kb else {
                    return false;
                };
                let size_kb = file.size_kb();
                match compare {
                    Compare::Greater => size_kb > *limit,
                    Compare::Less => size_kb < *limit,
                    Compare::Equal => (size_kb - limit).abs() < SIZE_EQ_TOLERANCE_KB,
                }
            }
            CompiledRule::Date { compare, value } => {
                let Some(modified) = file.modified(self.time_basis) else {
                    return false;
                };
                // ISO dates order lexicographically, so plain string comparison
                // is a date comparison.
                let day = modified.format("%Y-%m-%d").to_string();
                let ordering = day.as_str().cmp(value.as_str());
                match compare {
                    Compare::Greater => ordering == Ordering::Greater,
                    Compare::Less => ordering == Ordering::Less,
                    Compare::Equal => ordering == Ordering::Equal,
                }
            }
            CompiledRule::Duplicates { want } => {
                if !self.duplicates_scanned {
                    return false;
                }
                match want {
                    Some(true) => file.is_duplicate == Some(true),
                    // A file the scan never flagged counts as unique.
                    Some(false) => file.is_duplicate != Some(true),
                    None => false,
                }
            }
            CompiledRule::Never => false,
        }
    }

    /// Whether a file passes the whole rule set. An empty set passes everything.
    pub fn matches(&self, file: &FileRecord, rule_set: &RuleSet) -> bool {
        let compiled = compile_all(rule_set);
        self.matches_compiled(file, rule_set.operator, &compiled)
    }

    fn matches_compiled(
        &self,
        file: &FileRecord,
        operator: Operator,
        compiled: &[CompiledRule],
    ) -> bool {
        if compiled.is_empty() {
            return true;
        }
        match operator {
            Operator::And => compiled.iter().all(|rule| self.test(file, rule)),
            Operator::Or => compiled.iter().any(|rule| self.test(file, rule)),
        }
    }

    /// Keep the files that pass `rule_set`, preserving input order.
    pub fn filter<'a>(&self, files: &'a [FileRecord], rule_set: &RuleSet) -> Vec<&'a FileRecord> {
        let compiled = compile_all(rule_set);
        let kept: Vec<&FileRecord> = files
            .iter()
            .filter(|file| self.matches_compiled(file, rule_set.operator, &compiled))
            .collect();
        debug!(
            "Filtered {} of {} files with {} rule(s) ({})",
            kept.len(),
            files.len(),
            rule_set.len(),
            rule_set.operator,
        );
        kept
    }
}

fn compile_all(rule_set: &RuleSet) -> Vec<CompiledRule> {
    rule_set.rules.iter().map(CompiledRule::compile).collect()
}
