// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! BCS layouts of the Sui transaction types, declared in a [`BcsRegistry`].
//!
//! Two families are registered side by side. The current one refers to shared objects by
//! id and initial shared version. The `_Deprecated` one is understood by fullnodes that
//! predate initial shared versions and refers to shared objects by id only. Both share the
//! non-call transaction kinds.

use crate::base_types::SUI_ADDRESS_LENGTH;
use crate::error::Result;
use crate::registry::{BcsRegistry, TypeSchema};

pub const OBJECT_ID: &str = "ObjectID";
pub const SUI_ADDRESS: &str = "SuiAddress";
pub const OBJECT_DIGEST: &str = "ObjectDigest";
pub const SUI_OBJECT_REF: &str = "SuiObjectRef";
pub const SHARED_OBJECT_REF: &str = "SharedObjectRef";
pub const TYPE_TAG: &str = "TypeTag";
pub const STRUCT_TAG: &str = "StructTag";

pub const OBJECT_ARG: &str = "ObjectArg";
pub const CALL_ARG: &str = "CallArg";
pub const MOVE_CALL_TX: &str = "MoveCallTx";
pub const TRANSACTION: &str = "Transaction";
pub const TRANSACTION_KIND: &str = "TransactionKind";
pub const TRANSACTION_DATA: &str = "TransactionData";

pub const OBJECT_ARG_DEPRECATED: &str = "ObjectArg_Deprecated";
pub const CALL_ARG_DEPRECATED: &str = "CallArg_Deprecated";
pub const MOVE_CALL_TX_DEPRECATED: &str = "MoveCallTx_Deprecated";
pub const TRANSACTION_DEPRECATED: &str = "Transaction_Deprecated";
pub const TRANSACTION_KIND_DEPRECATED: &str = "TransactionKind_Deprecated";
pub const TRANSACTION_DATA_DEPRECATED: &str = "TransactionData_Deprecated";

/// A registry with the built-in types and every Sui transaction type.
pub fn sui_registry() -> Result<BcsRegistry> {
    let registry = BcsRegistry::new();
    register_sui_types(&registry)?;
    Ok(registry)
}

pub fn register_sui_types(bcs: &BcsRegistry) -> Result<()> {
    bcs.register_vector_type("vector<u8>", "u8")?
        .register_vector_type("vector<u16>", "u16")?
        .register_vector_type("vector<u32>", "u32")?
        .register_vector_type("vector<u64>", "u64")?
        .register_vector_type("vector<u128>", "u128")?
        .register_vector_type("vector<u256>", "u256")?
        .register_vector_type("vector<vector<u8>>", "vector<u8>")?
        .register_address_type(OBJECT_ID, SUI_ADDRESS_LENGTH)?
        .register_address_type(SUI_ADDRESS, SUI_ADDRESS_LENGTH)?
        .register_type(OBJECT_DIGEST, TypeSchema::Base64Bytes)?;

    bcs.register_struct_type(
        SUI_OBJECT_REF,
        &[("objectId", OBJECT_ID), ("version", "u64"), ("digest", OBJECT_DIGEST)],
    )?;

    register_non_call_transactions(bcs)?;
    register_type_tags(bcs)?;
    register_call_family(bcs)?;
    register_deprecated_call_family(bcs)?;
    Ok(())
}

fn register_non_call_transactions(bcs: &BcsRegistry) -> Result<()> {
    bcs.register_struct_type(
        "TransferObjectTx",
        &[("recipient", SUI_ADDRESS), ("object_ref", SUI_OBJECT_REF)],
    )?
    .register_vector_type("vector<SuiAddress>", SUI_ADDRESS)?
    .register_vector_type("vector<SuiObjectRef>", SUI_OBJECT_REF)?
    .register_struct_type(
        "PayTx",
        &[
            ("coins", "vector<SuiObjectRef>"),
            ("recipients", "vector<SuiAddress>"),
            ("amounts", "vector<u64>"),
        ],
    )?
    .register_struct_type(
        "PaySuiTx",
        &[
            ("coins", "vector<SuiObjectRef>"),
            ("recipients", "vector<SuiAddress>"),
            ("amounts", "vector<u64>"),
        ],
    )?
    .register_struct_type(
        "PayAllSuiTx",
        &[("coins", "vector<SuiObjectRef>"), ("recipient", SUI_ADDRESS)],
    )?
    .register_enum_type("Option<u64>", &[("None", None), ("Some", Some("u64"))])?
    .register_struct_type(
        "TransferSuiTx",
        &[("recipient", SUI_ADDRESS), ("amount", "Option<u64>")],
    )?
    .register_struct_type("PublishTx", &[("modules", "vector<vector<u8>>")])?;
    Ok(())
}

fn register_type_tags(bcs: &BcsRegistry) -> Result<()> {
    bcs.register_enum_type(
        TYPE_TAG,
        &[
            ("bool", None),
            ("u8", None),
            ("u16", None),
            ("u32", None),
            ("u64", None),
            ("u128", None),
            ("u256", None),
            ("address", None),
            ("signer", None),
            ("vector", Some(TYPE_TAG)),
            ("struct", Some(STRUCT_TAG)),
        ],
    )?
    .register_vector_type("vector<TypeTag>", TYPE_TAG)?
    .register_struct_type(
        STRUCT_TAG,
        &[
            ("address", SUI_ADDRESS),
            ("module", "string"),
            ("name", "string"),
            ("typeParams", "vector<TypeTag>"),
        ],
    )?;
    Ok(())
}

/// `Transaction` variants other than `Call`, in wire order after it.
const NON_CALL_TRANSACTIONS: [(&str, &str); 4] = [
    ("TransferSui", "TransferSuiTx"),
    ("Pay", "PayTx"),
    ("PaySui", "PaySuiTx"),
    ("PayAllSui", "PayAllSuiTx"),
];

fn register_call_family(bcs: &BcsRegistry) -> Result<()> {
    bcs.register_struct_type(
        SHARED_OBJECT_REF,
        &[("objectId", OBJECT_ID), ("initialSharedVersion", "u64")],
    )?
    .register_enum_type(
        OBJECT_ARG,
        &[
            ("ImmOrOwned", Some(SUI_OBJECT_REF)),
            ("Shared", Some(SHARED_OBJECT_REF)),
        ],
    )?
    .register_vector_type("vector<ObjectArg>", OBJECT_ARG)?
    .register_enum_type(
        CALL_ARG,
        &[
            ("Pure", Some("vector<u8>")),
            ("Object", Some(OBJECT_ARG)),
            ("ObjVec", Some("vector<ObjectArg>")),
        ],
    )?
    .register_vector_type("vector<CallArg>", CALL_ARG)?;

    register_transaction_family(
        bcs,
        "vector<CallArg>",
        MOVE_CALL_TX,
        TRANSACTION,
        TRANSACTION_KIND,
        TRANSACTION_DATA,
    )
}

fn register_deprecated_call_family(bcs: &BcsRegistry) -> Result<()> {
    bcs.register_enum_type(
        OBJECT_ARG_DEPRECATED,
        &[
            ("ImmOrOwned", Some(SUI_OBJECT_REF)),
            ("Shared_Deprecated", Some(OBJECT_ID)),
        ],
    )?
    .register_vector_type("vector<ObjectArg_Deprecated>", OBJECT_ARG_DEPRECATED)?
    .register_enum_type(
        CALL_ARG_DEPRECATED,
        &[
            ("Pure", Some("vector<u8>")),
            ("Object", Some(OBJECT_ARG_DEPRECATED)),
            ("ObjVec", Some("vector<ObjectArg_Deprecated>")),
        ],
    )?
    .register_vector_type("vector<CallArg_Deprecated>", CALL_ARG_DEPRECATED)?;

    register_transaction_family(
        bcs,
        "vector<CallArg_Deprecated>",
        MOVE_CALL_TX_DEPRECATED,
        TRANSACTION_DEPRECATED,
        TRANSACTION_KIND_DEPRECATED,
        TRANSACTION_DATA_DEPRECATED,
    )
}

/// Declares the call struct and everything that embeds it, on top of a given argument list
/// type.
fn register_transaction_family(
    bcs: &BcsRegistry,
    arguments: &str,
    move_call: &str,
    transaction: &str,
    kind: &str,
    data: &str,
) -> Result<()> {
    bcs.register_struct_type(
        move_call,
        &[
            ("package", SUI_OBJECT_REF),
            ("module", "string"),
            ("function", "string"),
            ("typeArguments", "vector<TypeTag>"),
            ("arguments", arguments),
        ],
    )?;

    let mut variants = vec![
        ("TransferObject", Some("TransferObjectTx")),
        ("Publish", Some("PublishTx")),
        ("Call", Some(move_call)),
    ];
    variants.extend(
        NON_CALL_TRANSACTIONS
            .iter()
            .map(|(variant, payload)| (*variant, Some(*payload))),
    );
    bcs.register_enum_type(transaction, &variants)?;

    let transactions = format!("vector<{transaction}>");
    bcs.register_vector_type(&transactions, transaction)?
        .register_enum_type(
            kind,
            &[("Single", Some(transaction)), ("Batch", Some(transactions.as_str()))],
        )?
        .register_struct_type(
            data,
            &[
                ("kind", kind),
                ("sender", SUI_ADDRESS),
                ("gasPayment", SUI_OBJECT_REF),
                ("gasPrice", "u64"),
                ("gasBudget", "u64"),
            ],
        )?;
    Ok(())
}
