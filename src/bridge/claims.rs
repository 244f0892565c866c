// In: src/bridge/claims.rs

//! Typed model of the claim dump documents produced by the native library.
//!
//! `kustomer_dump_claims` and `kustomer_dump_ensure` both return a JSON
//! document describing the active product claim set. The binding decodes it
//! into this model so callers get a checked structure instead of a bare
//! string; claim values themselves stay dynamic, since products define
//! arbitrary claim names and types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KustomerError;

/// One product entry inside a claim set.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProductEntry {
    /// Whether the product is licensed at all.
    #[serde(default)]
    pub ok: bool,

    /// The product's claims, keyed by claim name.
    #[serde(default)]
    pub claims: BTreeMap<String, Value>,
}

/// The active claim set as dumped by the native library.
///
/// Unknown fields are tolerated: the dump format belongs to the native
/// library and may grow without breaking this binding.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProductClaims {
    /// True when the claim set was loaded without reaching the license
    /// service.
    #[serde(default)]
    pub offline: bool,

    /// True when the claim set's signature chain was verified.
    #[serde(default)]
    pub trusted: bool,

    /// Per-product entries, keyed by product name.
    #[serde(default)]
    pub products: BTreeMap<String, ProductEntry>,
}

impl ProductClaims {
    /// Decodes a dump document.
    pub fn from_json(document: &str) -> Result<Self, KustomerError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Re-encodes the model as a generic JSON value, for handing across the
    /// host boundary.
    pub fn to_value(&self) -> Result<Value, KustomerError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "offline": false,
        "trusted": true,
        "products": {
            "groupware": {
                "ok": true,
                "claims": {"max-users": 50, "multi-server": false, "edition": "basic"}
            },
            "meet": {
                "ok": false,
                "claims": {}
            }
        }
    }"#;

    #[test]
    fn test_decode_sample_dump() {
        let claims = ProductClaims::from_json(SAMPLE).unwrap();
        assert!(!claims.offline);
        assert!(claims.trusted);
        assert_eq!(claims.products.len(), 2);

        let groupware = &claims.products["groupware"];
        assert!(groupware.ok);
        assert_eq!(groupware.claims["max-users"], Value::from(50));
        assert_eq!(groupware.claims["edition"], Value::from("basic"));
        assert!(!claims.products["meet"].ok);
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let claims =
            ProductClaims::from_json(r#"{"trusted": true, "someFutureField": [1, 2]}"#).unwrap();
        assert!(claims.trusted);
        assert!(claims.products.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let claims = ProductClaims::from_json("{}").unwrap();
        assert_eq!(claims, ProductClaims::default());
    }

    #[test]
    fn test_invalid_document_is_a_claims_error() {
        let err = ProductClaims::from_json("not json").unwrap_err();
        assert!(matches!(err, KustomerError::Claims(_)));
    }

    #[test]
    fn test_roundtrip_to_value() {
        let claims = ProductClaims::from_json(SAMPLE).unwrap();
        let value = claims.to_value().unwrap();
        assert_eq!(value["products"]["groupware"]["ok"], Value::from(true));
    }
}
