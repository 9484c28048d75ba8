use serde::{Deserialize, Serialize};

use super::error::RuleConfigError;

/// Accrual granularity: every full multiple of `per_dollars` earns `bonus` units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRate {
    pub per_dollars: f64,
    pub bonus: f64,
}

/// Named multiplicative adjustment applied when its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub multiplier: f64,
    pub order: i64,
}

/// Base rate plus the conditional rules an evaluation is performed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub base: BaseRate,
    #[serde(default)]
    pub additional: Vec<ConditionalRule>,
}

impl RuleSet {
    /// Parse and validate a JSON rule document.
    pub fn from_json_str(raw: &str) -> Result<Self, RuleConfigError> {
        let rules: RuleSet = serde_json::from_str(raw)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RuleConfigError> {
        let BaseRate { per_dollars, bonus } = self.base;
        if !per_dollars.is_finite() || per_dollars <= 0.0 {
            return Err(RuleConfigError::invalid(
                "base.per_dollars",
                format!("must be a positive number, got {per_dollars}"),
            ));
        }
        if !bonus.is_finite() || bonus < 0.0 {
            return Err(RuleConfigError::invalid(
                "base.bonus",
                format!("must be a non-negative number, got {bonus}"),
            ));
        }

        for (index, rule) in self.additional.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(RuleConfigError::invalid(
                    format!("additional[{index}].name"),
                    "must not be empty",
                ));
            }
            if !rule.multiplier.is_finite() || rule.multiplier <= 0.0 {
                return Err(RuleConfigError::invalid(
                    format!("additional[{index}].multiplier"),
                    format!("must be greater than zero, got {}", rule.multiplier),
                ));
            }
        }

        Ok(())
    }

    /// Conditional rules in evaluation order: ascending `order`, ties kept in
    /// document order.
    pub fn ordered_rules(&self) -> Vec<&ConditionalRule> {
        let mut ordered: Vec<&ConditionalRule> = self.additional.iter().collect();
        ordered.sort_by_key(|rule| rule.order);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "base": { "per_dollars": 10, "bonus": 1 },
        "additional": [
            { "name": "VIP x1.4", "type": "vip", "multiplier": 1.4, "order": 2 },
            { "name": "Weekend x2", "type": "weekend", "multiplier": 2, "order": 1 }
        ]
    }"#;

    #[test]
    fn parses_documented_layout() {
        let rules = RuleSet::from_json_str(SAMPLE).expect("sample parses");
        assert_eq!(rules.base.per_dollars, 10.0);
        assert_eq!(rules.additional.len(), 2);
        assert_eq!(rules.additional[1].kind, "weekend");

        let names: Vec<&str> = rules
            .ordered_rules()
            .iter()
            .map(|rule| rule.name.as_str())
            .collect();
        assert_eq!(names, vec!["Weekend x2", "VIP x1.4"]);
    }

    #[test]
    fn missing_additional_defaults_to_empty() {
        let rules = RuleSet::from_json_str(r#"{ "base": { "per_dollars": 5, "bonus": 2 } }"#)
            .expect("base-only document parses");
        assert!(rules.additional.is_empty());
    }

    #[test]
    fn equal_orders_keep_document_sequence() {
        let rules = RuleSet::from_json_str(
            r#"{
                "base": { "per_dollars": 1, "bonus": 1 },
                "additional": [
                    { "name": "first", "type": "vip", "multiplier": 2, "order": 3 },
                    { "name": "second", "type": "weekend", "multiplier": 2, "order": 3 },
                    { "name": "early", "type": "vip", "multiplier": 2, "order": -1 }
                ]
            }"#,
        )
        .expect("document parses");

        let names: Vec<&str> = rules
            .ordered_rules()
            .iter()
            .map(|rule| rule.name.as_str())
            .collect();
        assert_eq!(names, vec!["early", "first", "second"]);
    }

    #[test]
    fn rejects_missing_required_fields() {
        let missing_per_dollars = r#"{ "base": { "bonus": 1 }, "additional": [] }"#;
        let err = RuleSet::from_json_str(missing_per_dollars).expect_err("missing field");
        assert!(matches!(err, RuleConfigError::Malformed(_)));
        assert!(err.to_string().contains("per_dollars"));

        let missing_type = r#"{
            "base": { "per_dollars": 10, "bonus": 1 },
            "additional": [ { "name": "x", "multiplier": 2, "order": 1 } ]
        }"#;
        let err = RuleSet::from_json_str(missing_type).expect_err("missing type");
        assert!(err.to_string().contains("type"));

        let missing_order = r#"{
            "base": { "per_dollars": 10, "bonus": 1 },
            "additional": [ { "name": "x", "type": "vip", "multiplier": 2 } ]
        }"#;
        assert!(RuleSet::from_json_str(missing_order).is_err());
    }

    #[test]
    fn rejects_non_positive_per_dollars() {
        for per_dollars in ["0", "-10"] {
            let raw = format!(r#"{{ "base": {{ "per_dollars": {per_dollars}, "bonus": 1 }} }}"#);
            match RuleSet::from_json_str(&raw) {
                Err(RuleConfigError::InvalidValue { field, .. }) => {
                    assert_eq!(field, "base.per_dollars")
                }
                other => panic!("expected invalid per_dollars, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_invalid_rule_values() {
        let zero_multiplier = r#"{
            "base": { "per_dollars": 10, "bonus": 1 },
            "additional": [ { "name": "x", "type": "vip", "multiplier": 0, "order": 1 } ]
        }"#;
        match RuleSet::from_json_str(zero_multiplier) {
            Err(RuleConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "additional[0].multiplier")
            }
            other => panic!("expected invalid multiplier, got {other:?}"),
        }

        let blank_name = r#"{
            "base": { "per_dollars": 10, "bonus": 1 },
            "additional": [ { "name": "  ", "type": "vip", "multiplier": 2, "order": 1 } ]
        }"#;
        assert!(matches!(
            RuleSet::from_json_str(blank_name),
            Err(RuleConfigError::InvalidValue { .. })
        ));

        let negative_bonus = r#"{ "base": { "per_dollars": 10, "bonus": -1 } }"#;
        assert!(RuleSet::from_json_str(negative_bonus).is_err());
    }
}
