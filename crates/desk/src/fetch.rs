//! "Fetch Item" / "Fetch Ledger" pages.

use serde_json::{Value as JsonValue, json};

use crate::rpc::{DeskError, RemoteCall};

pub const FETCH_ITEMS_METHOD: &str = "maithantally.tally_sync_fetch_itemname.fetch_items";
pub const FETCH_LEDGERS_METHOD: &str = "maithantally.tally_sync_fetch_ledgers.fetch_ledgers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Items,
    Ledgers,
}

impl FetchKind {
    pub fn method(&self) -> &'static str {
        match self {
            FetchKind::Items => FETCH_ITEMS_METHOD,
            FetchKind::Ledgers => FETCH_LEDGERS_METHOD,
        }
    }

    /// Plural noun used in page text ("items", "ledgers").
    pub fn noun(&self) -> &'static str {
        match self {
            FetchKind::Items => "items",
            FetchKind::Ledgers => "ledgers",
        }
    }

    /// Column header of the result table.
    pub fn column(&self) -> &'static str {
        match self {
            FetchKind::Items => "Item Name",
            FetchKind::Ledgers => "Ledger Name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    NothingNew(FetchKind),
    Fetched(FetchKind, Vec<String>),
}

impl FetchOutcome {
    pub fn names(&self) -> &[String] {
        match self {
            FetchOutcome::NothingNew(_) => &[],
            FetchOutcome::Fetched(_, names) => names,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            FetchOutcome::NothingNew(kind) => format!("No new {} found.", kind.noun()),
            FetchOutcome::Fetched(kind, names) => {
                format!("Fetched {} {}.", names.len(), kind.noun())
            }
        }
    }
}

fn name_of(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten a `message` payload into a list of names.
///
/// Falsy payloads (absent, `null`, `false`, `0`, `""`) ⇒ empty; the item
/// fetch answers with an insert count, so `0` means nothing new. An array ⇒
/// one name per element; any other single value ⇒ a one-element list.
pub fn normalize_names(message: Option<&JsonValue>) -> Vec<String> {
    match message {
        None | Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => Vec::new(),
        Some(JsonValue::String(s)) if s.is_empty() => Vec::new(),
        Some(JsonValue::Number(n)) if n.as_f64() == Some(0.0) => Vec::new(),
        Some(JsonValue::Array(values)) => values.iter().map(name_of).collect(),
        Some(single) => vec![name_of(single)],
    }
}

pub fn fetch(rpc: &dyn RemoteCall, kind: FetchKind) -> Result<FetchOutcome, DeskError> {
    let response = rpc.call(kind.method(), json!({}))?;
    let names = normalize_names(response.message.as_ref());
    tracing::info!(method = kind.method(), count = names.len(), "fetch completed");

    if names.is_empty() {
        return Ok(FetchOutcome::NothingNew(kind));
    }
    Ok(FetchOutcome::Fetched(kind, names))
}

pub fn fetch_items(rpc: &dyn RemoteCall) -> Result<FetchOutcome, DeskError> {
    fetch(rpc, FetchKind::Items)
}

pub fn fetch_ledgers(rpc: &dyn RemoteCall) -> Result<FetchOutcome, DeskError> {
    fetch(rpc, FetchKind::Ledgers)
}
