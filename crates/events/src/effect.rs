//! Effects: what a handler wants the host to do.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use tallyerp_core::RowId;

/// Intent to write one field on one child row.
///
/// Mirrors the host primitive `set_value(doctype, name, field, value)`. The
/// handler only describes the write; the dispatcher decides when it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Child doctype name (e.g. "Voucher Ledger Entry").
    pub doctype: String,
    /// Row instance identifier.
    pub name: RowId,
    pub field: String,
    pub value: JsonValue,
}

impl FieldUpdate {
    pub fn new(
        doctype: impl Into<String>,
        name: RowId,
        field: impl Into<String>,
        value: JsonValue,
    ) -> Self {
        Self {
            doctype: doctype.into(),
            name,
            field: field.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write a field (may re-fire bound triggers in the host).
    SetField(FieldUpdate),
    /// Ask the host to re-render a (table) field. Not a data change.
    Refresh { field: String },
}

impl Effect {
    pub fn refresh(field: impl Into<String>) -> Self {
        Self::Refresh {
            field: field.into(),
        }
    }

    pub fn as_update(&self) -> Option<&FieldUpdate> {
        match self {
            Effect::SetField(update) => Some(update),
            Effect::Refresh { .. } => None,
        }
    }
}
