// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;

use super::*;

fn tx_context(address: &str) -> SuiMoveNormalizedType {
    SuiMoveNormalizedType::MutableReference(Box::new(SuiMoveNormalizedType::new_struct(
        address.to_string(),
        TX_CONTEXT_MODULE_NAME.to_string(),
        TX_CONTEXT_STRUCT_NAME.to_string(),
        vec![],
    )))
}

#[test]
fn test_is_tx_context() {
    assert!(tx_context("0x2").is_tx_context());
    assert!(tx_context("0x0000000000000000000000000000000000000002").is_tx_context());
    assert!(tx_context("2").is_tx_context());
    assert!(!tx_context("0x3").is_tx_context());
    assert!(!tx_context("not an address").is_tx_context());

    let SuiMoveNormalizedType::MutableReference(inner) = tx_context("0x2") else {
        unreachable!()
    };
    assert!(!inner.is_tx_context());
    assert!(!SuiMoveNormalizedType::Reference(inner).is_tx_context());

    let other = SuiMoveNormalizedType::MutableReference(Box::new(
        SuiMoveNormalizedType::new_struct("0x2".into(), "tx_context".into(), "Other".into(), vec![]),
    ));
    assert!(!other.is_tx_context());
}

#[test]
fn test_user_parameters() {
    let params = vec![SuiMoveNormalizedType::U64, tx_context("0x2")];
    assert_eq!(user_parameters(&params), &[SuiMoveNormalizedType::U64]);

    let params = vec![tx_context("0x2"), SuiMoveNormalizedType::U64];
    assert_eq!(user_parameters(&params).len(), 2);

    assert!(user_parameters(&[tx_context("0x2")]).is_empty());
    assert!(user_parameters(&[]).is_empty());
}

#[test]
fn test_extract_struct_tag() {
    let coin = SuiMoveNormalizedType::new_struct("0x2".into(), "coin".into(), "Coin".into(), vec![]);
    let by_ref = SuiMoveNormalizedType::Reference(Box::new(coin.clone()));
    let by_mut_ref = SuiMoveNormalizedType::MutableReference(Box::new(coin.clone()));
    let vector = SuiMoveNormalizedType::Vector(Box::new(coin.clone()));

    for type_ in [&coin, &by_ref, &by_mut_ref] {
        assert_eq!(type_.extract_struct_tag().unwrap().name, "Coin");
    }
    assert!(vector.extract_struct_tag().is_none());
    assert_eq!(vector.extract_vector_struct().unwrap().module, "coin");
    assert!(coin.extract_vector_struct().is_none());
    assert!(by_ref.extract_mutable_reference().is_none());
    assert_eq!(by_mut_ref.extract_mutable_reference(), Some(&coin));
}

#[test]
fn test_fullnode_json_shape() {
    let function: SuiMoveNormalizedFunction = serde_json::from_value(json!({
        "isEntry": true,
        "parameters": [
            "U64",
            { "Vector": "U8" },
            { "Struct": { "address": "0x2", "module": "coin", "name": "Coin", "typeArguments": [
                { "Struct": { "address": "0x2", "module": "sui", "name": "SUI", "typeArguments": [] } }
            ] } },
            { "TypeParameter": 0 },
            { "MutableReference": { "Struct": {
                "address": "0x2", "module": "tx_context", "name": "TxContext", "typeArguments": []
            } } }
        ],
        "return": []
    }))
    .unwrap();

    assert!(function.is_entry);
    assert_eq!(user_parameters(&function.parameters).len(), 4);
    assert_eq!(
        function
            .parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec![
            "u64",
            "vector<u8>",
            "0x2::coin::Coin<0x2::sui::SUI>",
            "T0",
            "&mut 0x2::tx_context::TxContext",
        ]
    );
}
