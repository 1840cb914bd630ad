//! Field constraint policy for `with`
//!
//! Rules are attached to one field and fire when that field is in the set of
//! fields a `with` call changes:
//!
//! - `immutable`: the field can never change through `with`
//! - `correlated`: the field can only change if every partner changes in
//!   the same call

use crate::error::{RecordError, RecordResult};

/// Rules for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConstraint {
    pub field: &'static str,
    pub immutable: bool,
    pub correlated: Vec<&'static str>,
}

/// All field rules of one record type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    rules: Vec<FieldConstraint>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `field` as never changing through `with`
    pub fn immutable(mut self, field: &'static str) -> Self {
        self.rule_mut(field).immutable = true;
        self
    }

    /// Require `partners` to change whenever `field` changes.
    ///
    /// Repeated calls for the same field accumulate partners.
    pub fn correlated(
        mut self,
        field: &'static str,
        partners: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        let rule = self.rule_mut(field);
        for partner in partners {
            if !rule.correlated.contains(&partner) {
                rule.correlated.push(partner);
            }
        }
        self
    }

    pub fn rules(&self) -> &[FieldConstraint] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rule_mut(&mut self, field: &'static str) -> &mut FieldConstraint {
        let idx = match self.rules.iter().position(|r| r.field == field) {
            Some(idx) => idx,
            None => {
                self.rules.push(FieldConstraint {
                    field,
                    immutable: false,
                    correlated: Vec::new(),
                });
                self.rules.len() - 1
            }
        };
        &mut self.rules[idx]
    }

    /// Check the rules against the fields a `with` call changes.
    ///
    /// Immutable violations are reported before correlation violations.
    pub fn check(&self, changing: &[&str]) -> RecordResult<()> {
        for &field in changing {
            if self.rule(field).is_some_and(|r| r.immutable) {
                return Err(RecordError::ImmutableField {
                    field: field.to_string(),
                });
            }
        }

        for &field in changing {
            let Some(rule) = self.rule(field) else {
                continue;
            };
            let missing: Vec<String> = rule
                .correlated
                .iter()
                .filter(|partner| !changing.contains(*partner))
                .map(|partner| partner.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(RecordError::CorrelatedField {
                    field: field.to_string(),
                    missing,
                    changed: changing.iter().map(|f| f.to_string()).collect(),
                });
            }
        }

        Ok(())
    }

    fn rule(&self, field: &str) -> Option<&FieldConstraint> {
        self.rules.iter().find(|r| r.field == field)
    }
}
