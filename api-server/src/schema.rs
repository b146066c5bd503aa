// Declarative request-parameter schemas and the generic validator
//
// Each route registers one `ParamSpec` slice; `validate` walks it against
// the raw query pairs and reports every offending field at once, so a
// client sees all of its mistakes in a single round trip.
use std::collections::BTreeMap;

use dexcandles_common::{is_address, ALLOWED_INTERVALS};

#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// EVM address string; normalized to lowercase when valid.
    Address,
    /// Integer >= 0.
    NonNegativeInt,
    /// Integer drawn from a fixed allow-set.
    IntegerIn(&'static [i64]),
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<i64>,
}

pub const CANDLES_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "tokenA",
        kind: ParamKind::Address,
        required: true,
        default: None,
    },
    ParamSpec {
        name: "tokenB",
        kind: ParamKind::Address,
        required: true,
        default: None,
    },
    ParamSpec {
        name: "interval",
        kind: ParamKind::IntegerIn(&ALLOWED_INTERVALS),
        required: true,
        default: None,
    },
    ParamSpec {
        name: "limit",
        kind: ParamKind::NonNegativeInt,
        required: false,
        default: Some(100),
    },
    ParamSpec {
        name: "skip",
        kind: ParamKind::NonNegativeInt,
        required: false,
        default: Some(0),
    },
];

/// Schema registry keyed by route, so route definitions and validation
/// cannot drift apart.
pub fn for_route(path: &str) -> Option<&'static [ParamSpec]> {
    match path {
        "/candles" => Some(CANDLES_PARAMS),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
}

/// Typed parameter set produced by a successful validation.
#[derive(Debug, Default)]
pub struct ValidParams(BTreeMap<&'static str, ParamValue>);

impl ValidParams {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(ParamValue::Int(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Field-name -> error-message map for a failed validation.
pub type FieldErrors = BTreeMap<String, String>;

/// Checks the raw query pairs against `schema`. Aggregates all failures
/// rather than stopping at the first; repeated parameters use the first
/// occurrence.
pub fn validate(
    pairs: &[(String, String)],
    schema: &[ParamSpec],
) -> Result<ValidParams, FieldErrors> {
    let mut values = BTreeMap::new();
    let mut errors = FieldErrors::new();

    for spec in schema {
        let raw = pairs
            .iter()
            .find(|(name, _)| name == spec.name)
            .map(|(_, value)| value.as_str());

        let Some(raw) = raw else {
            if spec.required {
                errors.insert(spec.name.to_string(), format!("{} is required", spec.name));
            } else if let Some(default) = spec.default {
                values.insert(spec.name, ParamValue::Int(default));
            }
            continue;
        };

        match spec.kind {
            ParamKind::Address => {
                if is_address(raw) {
                    values.insert(spec.name, ParamValue::Text(raw.to_lowercase()));
                } else {
                    errors.insert(
                        spec.name.to_string(),
                        format!("{} is not address", spec.name),
                    );
                }
            }
            ParamKind::NonNegativeInt => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => {
                    values.insert(spec.name, ParamValue::Int(n));
                }
                Ok(_) => {
                    errors.insert(
                        spec.name.to_string(),
                        format!("{} must be a non-negative integer", spec.name),
                    );
                }
                Err(_) => {
                    errors.insert(
                        spec.name.to_string(),
                        format!("{} must be an integer", spec.name),
                    );
                }
            },
            ParamKind::IntegerIn(allowed) => match raw.parse::<i64>() {
                Ok(n) if allowed.contains(&n) => {
                    values.insert(spec.name, ParamValue::Int(n));
                }
                Ok(_) => {
                    let list = allowed
                        .iter()
                        .map(i64::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    errors.insert(
                        spec.name.to_string(),
                        format!("{} must be one of {}", spec.name, list),
                    );
                }
                Err(_) => {
                    errors.insert(
                        spec.name.to_string(),
                        format!("{} must be an integer", spec.name),
                    );
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(ValidParams(values))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const TOKEN_A: &str = "0xB31f66AA3c1e785363F0875A1B74E27b85FD66c7";
    const TOKEN_B: &str = "0x60781c2586d68229fde47564546784ab3faca982";

    #[test]
    fn test_valid_request_is_typed_and_normalized() {
        let params = validate(
            &pairs(&[
                ("tokenA", TOKEN_A),
                ("tokenB", TOKEN_B),
                ("interval", "300"),
                ("limit", "50"),
                ("skip", "10"),
            ]),
            CANDLES_PARAMS,
        )
        .unwrap();

        assert_eq!(params.text("tokenA"), Some(TOKEN_A.to_lowercase().as_str()));
        assert_eq!(params.text("tokenB"), Some(TOKEN_B));
        assert_eq!(params.integer("interval"), Some(300));
        assert_eq!(params.integer("limit"), Some(50));
        assert_eq!(params.integer("skip"), Some(10));
    }

    #[test]
    fn test_optional_params_take_defaults() {
        let params = validate(
            &pairs(&[
                ("tokenA", TOKEN_A),
                ("tokenB", TOKEN_B),
                ("interval", "86400"),
            ]),
            CANDLES_PARAMS,
        )
        .unwrap();

        assert_eq!(params.integer("limit"), Some(100));
        assert_eq!(params.integer("skip"), Some(0));
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let errors = validate(&pairs(&[]), CANDLES_PARAMS).unwrap_err();

        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["interval", "tokenA", "tokenB"]);
        assert_eq!(errors["tokenA"], "tokenA is required");
    }

    #[test]
    fn test_malformed_address_message() {
        let errors = validate(
            &pairs(&[
                ("tokenA", "not-an-address"),
                ("tokenB", TOKEN_B),
                ("interval", "300"),
            ]),
            CANDLES_PARAMS,
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["tokenA"], "tokenA is not address");
    }

    #[test]
    fn test_interval_outside_allow_set() {
        let errors = validate(
            &pairs(&[
                ("tokenA", TOKEN_A),
                ("tokenB", TOKEN_B),
                ("interval", "301"),
            ]),
            CANDLES_PARAMS,
        )
        .unwrap_err();

        assert_eq!(
            errors["interval"],
            "interval must be one of 300, 900, 3600, 14400, 86400, 604800"
        );
    }

    #[test]
    fn test_type_and_domain_failures_aggregate() {
        let errors = validate(
            &pairs(&[
                ("tokenA", "0x1234"),
                ("interval", "soon"),
                ("limit", "-5"),
                ("skip", "ten"),
            ]),
            CANDLES_PARAMS,
        )
        .unwrap_err();

        assert_eq!(errors["tokenA"], "tokenA is not address");
        assert_eq!(errors["tokenB"], "tokenB is required");
        assert_eq!(errors["interval"], "interval must be an integer");
        assert_eq!(errors["limit"], "limit must be a non-negative integer");
        assert_eq!(errors["skip"], "skip must be an integer");
    }

    #[test]
    fn test_route_registry() {
        assert!(for_route("/candles").is_some());
        assert!(for_route("/bogus").is_none());
    }
}
