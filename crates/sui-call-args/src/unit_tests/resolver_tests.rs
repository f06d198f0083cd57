// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;

use super::*;
use crate::sui_schema::sui_registry;

fn vector(inner: SuiMoveNormalizedType) -> SuiMoveNormalizedType {
    SuiMoveNormalizedType::Vector(Box::new(inner))
}

#[test]
fn test_primitive_types() {
    let registry = BcsRegistry::new();
    for (type_, name) in [
        (SuiMoveNormalizedType::Bool, "bool"),
        (SuiMoveNormalizedType::U8, "u8"),
        (SuiMoveNormalizedType::U16, "u16"),
        (SuiMoveNormalizedType::U32, "u32"),
        (SuiMoveNormalizedType::U64, "u64"),
        (SuiMoveNormalizedType::U128, "u128"),
        (SuiMoveNormalizedType::U256, "u256"),
        (SuiMoveNormalizedType::Address, "address"),
    ] {
        assert_eq!(pure_serialization_type(&registry, &type_, None).unwrap(), name);
    }
}

#[test]
fn test_integer_arguments_accept_numeric_strings() {
    let registry = BcsRegistry::new();
    let u256 = SuiMoveNormalizedType::U256;
    assert!(pure_serialization_type(&registry, &u256, Some(&json!("12345678901234567890123"))).is_ok());
    assert!(pure_serialization_type(&registry, &u256, Some(&json!(5))).is_ok());
    assert!(matches!(
        pure_serialization_type(&registry, &u256, Some(&json!(true))),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_byte_vectors() {
    let registry = BcsRegistry::new();
    let bytes = vector(SuiMoveNormalizedType::U8);

    assert_eq!(pure_serialization_type(&registry, &bytes, None).unwrap(), "string");
    assert_eq!(
        pure_serialization_type(&registry, &bytes, Some(&json!("hi"))).unwrap(),
        "string"
    );
    assert!(!registry.has_type("vector<u8>"));
    assert_eq!(
        pure_serialization_type(&registry, &bytes, Some(&json!([1, 2]))).unwrap(),
        "vector<u8>"
    );
    assert!(registry.has_type("vector<u8>"));
    assert_eq!(
        byte_vector_serialization_type(&registry, &vector(bytes)).unwrap(),
        "vector<vector<u8>>"
    );
}

#[test]
fn test_nested_vectors_are_registered() {
    let registry = BcsRegistry::new();
    let nested = vector(vector(SuiMoveNormalizedType::U64));
    assert_eq!(
        pure_serialization_type(&registry, &nested, Some(&json!([[1, 2], [3]]))).unwrap(),
        "vector<vector<u64>>"
    );
    assert!(registry.has_type("vector<u64>"));
    assert!(registry.has_type("vector<vector<u64>>"));
    assert_eq!(
        registry.ser("vector<vector<u64>>", &json!([[1]])).unwrap(),
        bcs::to_bytes(&vec![vec![1u64]]).unwrap()
    );

    let strings = vector(vector(SuiMoveNormalizedType::U8));
    assert_eq!(
        pure_serialization_type(&registry, &strings, Some(&json!(["a", "b"]))).unwrap(),
        "vector<string>"
    );
}

#[test]
fn test_empty_vectors_skip_element_checks() {
    let registry = sui_registry().unwrap();
    let addresses = vector(SuiMoveNormalizedType::Address);
    assert_eq!(
        pure_serialization_type(&registry, &addresses, Some(&json!([]))).unwrap(),
        "vector<address>"
    );
    assert!(matches!(
        pure_serialization_type(&registry, &addresses, Some(&json!(["0x2"]))),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_unsupported_types() {
    let registry = BcsRegistry::new();
    for type_ in [
        SuiMoveNormalizedType::Signer,
        SuiMoveNormalizedType::TypeParameter(1),
        SuiMoveNormalizedType::Reference(Box::new(SuiMoveNormalizedType::U8)),
        SuiMoveNormalizedType::MutableReference(Box::new(SuiMoveNormalizedType::U8)),
        SuiMoveNormalizedType::new_struct("0x2".into(), "coin".into(), "Coin".into(), vec![]),
        vector(SuiMoveNormalizedType::TypeParameter(0)),
    ] {
        assert!(matches!(
            pure_serialization_type(&registry, &type_, None),
            Err(Error::UnsupportedType(_))
        ));
    }
}
