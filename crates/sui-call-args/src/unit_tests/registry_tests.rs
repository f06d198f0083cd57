// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use expect_test::expect;
use num_bigint::BigUint;
use proptest::prelude::*;
use serde_json::json;

use super::*;
use crate::base_types::{ObjectDigest, ObjectID, ObjectRef, SuiAddress};
use crate::object_resolver::SharedObjectApi;
use crate::sui_schema::{self, sui_registry};
use crate::transaction::{
    CallArg, MoveCallTx, ObjectArg, PayAllSuiTx, PaySuiTx, PayTx, PublishTx, SharedObjectRef,
    SingleTransactionKind, StructTag, TransactionData, TransactionKind, TransferObjectTx,
    TransferSuiTx, TypeTag,
};

fn object_ref(n: u8) -> ObjectRef {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    ObjectRef::new(ObjectID::new(bytes), n as u64, ObjectDigest::new(vec![n; 32]))
}

fn address(n: u8) -> SuiAddress {
    let mut bytes = [0u8; 20];
    bytes[0] = n;
    SuiAddress::new(bytes)
}

#[test]
fn test_integers_are_little_endian() {
    let registry = BcsRegistry::new();
    assert_eq!(registry.ser("u16", &json!(258)).unwrap(), vec![2, 1]);
    assert_eq!(
        registry.ser("u64", &json!("0x10")).unwrap(),
        vec![16, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        registry.ser("u32", &json!("4294967295")).unwrap(),
        vec![0xff; 4]
    );
    assert!(matches!(
        registry.ser("u32", &json!(4294967296u64)),
        Err(Error::Encode { .. })
    ));
    assert!(matches!(
        registry.ser("u8", &json!(true)),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_lengths_are_uleb128() {
    let registry = BcsRegistry::new();
    registry.register_vector_type("vector<u8>", "u8").unwrap();

    let bytes = registry.ser("vector<u8>", &json!(vec![0u8; 300])).unwrap();
    assert_eq!(&bytes[..2], &[0xac, 0x02]);
    assert_eq!(bytes.len(), 302);
    assert_eq!(registry.de("vector<u8>", &bytes).unwrap(), json!(vec![0u8; 300]));

    assert_eq!(
        registry.ser("string", &json!("sui")).unwrap(),
        vec![3, b's', b'u', b'i']
    );
}

#[test]
fn test_addresses_are_left_padded() {
    let registry = BcsRegistry::new();
    let mut expected = vec![0u8; 20];
    expected[19] = 2;
    assert_eq!(registry.ser("address", &json!("0x2")).unwrap(), expected);
    assert_eq!(
        registry.de("address", &expected).unwrap(),
        json!("0x0000000000000000000000000000000000000002")
    );
    assert!(matches!(
        registry.ser("address", &json!(format!("0x{}", "1".repeat(41)))),
        Err(Error::InvalidAddress(_))
    ));
}

#[test]
fn test_registration_is_idempotent() {
    let registry = BcsRegistry::new();
    registry
        .register_struct_type("Point", &[("x", "u64"), ("y", "u64")])
        .unwrap();
    registry
        .register_struct_type("Point", &[("x", "u64"), ("y", "u64")])
        .unwrap();

    let err = registry
        .register_struct_type("Point", &[("y", "u64"), ("x", "u64")])
        .err()
        .unwrap();
    assert!(matches!(err, Error::ConflictingRegistration { name } if name == "Point"));

    // The first shape is kept.
    assert_eq!(
        registry.ser("Point", &json!({"x": 1, "y": 2})).unwrap()[0],
        1
    );
    assert!(registry.has_type("Point"));
    assert!(matches!(
        registry.register_type("u8", TypeSchema::U16),
        Err(Error::ConflictingRegistration { .. })
    ));
}

#[test]
fn test_unknown_types() {
    let registry = BcsRegistry::new();
    registry.register_vector_type("vector<Foo>", "Foo").unwrap();
    assert!(matches!(
        registry.ser("Foo", &json!(1)),
        Err(Error::UnknownType(name)) if name == "Foo"
    ));
    // Components are looked up when a value is encoded.
    assert!(registry.ser("vector<Foo>", &json!([])).is_ok());
    assert!(matches!(
        registry.ser("vector<Foo>", &json!([1])),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn test_enum_unit_variants() {
    let registry = sui_registry().unwrap();
    let bare = registry.ser(sui_schema::TYPE_TAG, &json!("u64")).unwrap();
    let tagged = registry
        .ser(sui_schema::TYPE_TAG, &json!({ "u64": null }))
        .unwrap();
    assert_eq!(bare, vec![4]);
    assert_eq!(bare, tagged);
    assert_eq!(registry.de(sui_schema::TYPE_TAG, &bare).unwrap(), json!("u64"));

    assert!(matches!(
        registry.ser(sui_schema::TYPE_TAG, &json!("u512")),
        Err(Error::Encode { .. })
    ));
    assert!(matches!(
        registry.ser(sui_schema::TYPE_TAG, &json!({ "u8": 1 })),
        Err(Error::Encode { .. })
    ));
    assert!(matches!(
        registry.de(sui_schema::TYPE_TAG, &[11]),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_decode_rejects_malformed_input() {
    let registry = BcsRegistry::new();
    assert!(matches!(registry.de("bool", &[2]), Err(Error::Decode { .. })));
    assert!(matches!(registry.de("u16", &[1]), Err(Error::Decode { .. })));
    assert!(matches!(registry.de("u8", &[1, 2]), Err(Error::Decode { .. })));
    assert!(matches!(
        registry.de("string", &[2, 0xc3, 0x28]),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_call_args_match_bcs() {
    let registry = sui_registry().unwrap();
    let args = vec![
        CallArg::Pure(vec![1, 2, 3]),
        CallArg::Object(ObjectArg::ImmOrOwned(object_ref(1))),
        CallArg::Object(ObjectArg::Shared(SharedObjectRef {
            object_id: object_ref(2).object_id,
            initial_shared_version: 42,
        })),
        CallArg::ObjVec(vec![
            ObjectArg::ImmOrOwned(object_ref(3)),
            ObjectArg::ImmOrOwned(object_ref(4)),
        ]),
    ];
    for arg in &args {
        let bytes = arg
            .to_bytes(&registry, SharedObjectApi::InitialVersion)
            .unwrap();
        assert_eq!(bytes, bcs::to_bytes(arg).unwrap());
        assert_eq!(
            &CallArg::from_bytes(&registry, SharedObjectApi::InitialVersion, &bytes).unwrap(),
            arg
        );
    }
}

#[test]
fn test_deprecated_shared_objects() {
    let registry = sui_registry().unwrap();
    let arg = CallArg::Object(ObjectArg::SharedDeprecated(object_ref(2).object_id));

    let bytes = arg.to_bytes(&registry, SharedObjectApi::Deprecated).unwrap();
    let mut expected = vec![1, 1];
    expected.extend_from_slice(object_ref(2).object_id.as_bytes());
    assert_eq!(bytes, expected);
    assert_eq!(
        CallArg::from_bytes(&registry, SharedObjectApi::Deprecated, &bytes).unwrap(),
        arg
    );

    // The current layout has no variant for it.
    assert!(matches!(
        arg.to_bytes(&registry, SharedObjectApi::InitialVersion),
        Err(Error::Encode { .. })
    ));
}

#[test]
fn test_call_arg_snapshot() {
    let registry = sui_registry().unwrap();
    let object_ref = ObjectRef::new(
        "0x1".parse().unwrap(),
        3,
        ObjectDigest::new(vec![7; 4]),
    );
    let bytes = CallArg::Object(ObjectArg::ImmOrOwned(object_ref))
        .to_bytes(&registry, SharedObjectApi::InitialVersion)
        .unwrap();
    expect!["0100000000000000000000000000000000000000000103000000000000000407070707"]
        .assert_eq(&hex::encode(bytes));
}

#[test]
fn test_transaction_data_matches_bcs() {
    let registry = sui_registry().unwrap();
    let call = MoveCallTx {
        package: object_ref(9),
        module: "devnet_nft".to_string(),
        function: "mint".to_string(),
        type_arguments: vec![
            TypeTag::U64,
            TypeTag::Vector(Box::new(TypeTag::Address)),
            TypeTag::Struct(Box::new(StructTag {
                address: address(2),
                module: "coin".to_string(),
                name: "Coin".to_string(),
                type_params: vec![TypeTag::Bool],
            })),
        ],
        arguments: vec![
            CallArg::Pure(bcs::to_bytes(&"Example NFT".to_string()).unwrap()),
            CallArg::Object(ObjectArg::ImmOrOwned(object_ref(5))),
        ],
    };
    let kinds = vec![
        SingleTransactionKind::TransferObject(TransferObjectTx {
            recipient: address(1),
            object_ref: object_ref(1),
        }),
        SingleTransactionKind::Publish(PublishTx {
            modules: vec![vec![0xa1, 0x1c], vec![]],
        }),
        SingleTransactionKind::Call(call.clone()),
        SingleTransactionKind::TransferSui(TransferSuiTx {
            recipient: address(3),
            amount: None,
        }),
        SingleTransactionKind::TransferSui(TransferSuiTx {
            recipient: address(3),
            amount: Some(1000),
        }),
        SingleTransactionKind::Pay(PayTx {
            coins: vec![object_ref(1)],
            recipients: vec![address(4), address(5)],
            amounts: vec![10, 20],
        }),
        SingleTransactionKind::PaySui(PaySuiTx {
            coins: vec![object_ref(1), object_ref(2)],
            recipients: vec![address(4)],
            amounts: vec![30],
        }),
        SingleTransactionKind::PayAllSui(PayAllSuiTx {
            coins: vec![object_ref(3)],
            recipient: address(6),
        }),
    ];

    let single = TransactionData::new_move_call(address(7), call, object_ref(8), 10_000, 1);
    let batch = TransactionData::new(
        TransactionKind::Batch(kinds),
        address(7),
        object_ref(8),
        10_000,
        1,
    );
    for data in [single, batch] {
        let bytes = data
            .to_bytes(&registry, SharedObjectApi::InitialVersion)
            .unwrap();
        assert_eq!(bytes, bcs::to_bytes(&data).unwrap());
        assert_eq!(
            TransactionData::from_bytes(&registry, SharedObjectApi::InitialVersion, &bytes)
                .unwrap(),
            data
        );
    }
}

#[test]
fn test_deprecated_transaction_data_round_trip() {
    let registry = sui_registry().unwrap();
    let call = MoveCallTx {
        package: object_ref(9),
        module: "counter".to_string(),
        function: "increment".to_string(),
        type_arguments: vec![],
        arguments: vec![CallArg::ObjVec(vec![
            ObjectArg::SharedDeprecated(object_ref(1).object_id),
            ObjectArg::ImmOrOwned(object_ref(2)),
        ])],
    };
    let data = TransactionData::new_move_call(address(1), call, object_ref(8), 500, 2);

    let bytes = data.to_bytes(&registry, SharedObjectApi::Deprecated).unwrap();
    assert_eq!(
        TransactionData::from_bytes(&registry, SharedObjectApi::Deprecated, &bytes).unwrap(),
        data
    );
}

#[test]
fn test_nesting_depth_is_bounded() {
    let registry = sui_registry().unwrap();

    // Tag 9 is `vector`, tag 0 is `bool`.
    let mut shallow = vec![9u8; 10];
    shallow.push(0);
    let mut expected = json!("bool");
    for _ in 0..10 {
        expected = json!({ "vector": expected });
    }
    assert_eq!(registry.de(sui_schema::TYPE_TAG, &shallow).unwrap(), expected);

    let mut deep = vec![9u8; 200_000];
    deep.push(0);
    let err = registry.de(sui_schema::TYPE_TAG, &deep).unwrap_err();
    assert!(matches!(&err, Error::Decode { reason, .. } if reason == "exceeds max depth"));

    let mut value = json!("bool");
    for _ in 0..=MAX_CONTAINER_DEPTH {
        value = json!({ "vector": value });
    }
    assert!(matches!(
        registry.ser(sui_schema::TYPE_TAG, &value),
        Err(Error::Encode { .. })
    ));
}

#[test]
fn test_lengths_must_be_canonical() {
    let registry = BcsRegistry::new();

    // Zero padded into two bytes.
    let padded = [0x80, 0x00];
    assert!(bcs::from_bytes::<String>(&padded).is_err());
    assert!(matches!(
        registry.de("string", &padded),
        Err(Error::Decode { .. })
    ));

    // 128 is the smallest length that needs two bytes.
    let long = "a".repeat(128);
    let bytes = bcs::to_bytes(&long).unwrap();
    assert_eq!(&bytes[..2], &[0x80, 0x01]);
    assert_eq!(registry.de("string", &bytes).unwrap(), json!(long));

    // One past the largest length bcs accepts.
    let too_long = [0x80, 0x80, 0x80, 0x80, 0x08];
    assert!(bcs::from_bytes::<Vec<u8>>(&too_long).is_err());
    assert!(matches!(
        registry.de("string", &too_long),
        Err(Error::Decode { .. })
    ));
}

proptest! {
    #[test]
    fn test_u64_round_trip(n in any::<u64>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("u64", &json!(n)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&n).unwrap());
        prop_assert_eq!(registry.de("u64", &bytes).unwrap(), json!(n));
    }

    #[test]
    fn test_u128_round_trip(n in any::<u128>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("u128", &json!(n.to_string())).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&n).unwrap());
        prop_assert_eq!(registry.de("u128", &bytes).unwrap(), json!(n.to_string()));
    }

    #[test]
    fn test_string_round_trip(s in ".*") {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("string", &json!(s)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&s).unwrap());
        prop_assert_eq!(registry.de("string", &bytes).unwrap(), json!(s));
    }

    #[test]
    fn test_bool_round_trip(b in any::<bool>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("bool", &json!(b)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&b).unwrap());
        prop_assert_eq!(registry.de("bool", &bytes).unwrap(), json!(b));
    }

    #[test]
    fn test_u8_round_trip(n in any::<u8>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("u8", &json!(n)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&n).unwrap());
        prop_assert_eq!(registry.de("u8", &bytes).unwrap(), json!(n));
    }

    #[test]
    fn test_u16_round_trip(n in any::<u16>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("u16", &json!(n)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&n).unwrap());
        prop_assert_eq!(registry.de("u16", &bytes).unwrap(), json!(n));
    }

    #[test]
    fn test_u32_round_trip(n in any::<u32>()) {
        let registry = BcsRegistry::new();
        let bytes = registry.ser("u32", &json!(n)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&n).unwrap());
        prop_assert_eq!(registry.de("u32", &bytes).unwrap(), json!(n));
    }

    #[test]
    fn test_u256_round_trip(le_bytes in any::<[u8; 32]>()) {
        let registry = BcsRegistry::new();
        let n = BigUint::from_bytes_le(&le_bytes).to_string();
        let bytes = registry.ser("u256", &json!(n)).unwrap();
        // A u256 is its 32 little-endian bytes, with no length prefix.
        prop_assert_eq!(&bytes, &bcs::to_bytes(&le_bytes).unwrap());
        prop_assert_eq!(registry.de("u256", &bytes).unwrap(), json!(n));
    }

    #[test]
    fn test_address_round_trip(raw in any::<[u8; 20]>()) {
        let registry = BcsRegistry::new();
        let address = format!("0x{}", hex::encode(raw));
        let bytes = registry.ser("address", &json!(address)).unwrap();
        prop_assert_eq!(&bytes, &bcs::to_bytes(&raw).unwrap());
        prop_assert_eq!(registry.de("address", &bytes).unwrap(), json!(address));
    }
}
