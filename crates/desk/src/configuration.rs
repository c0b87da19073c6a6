//! "Tally Configuration" selection page: list rows, toggle `is_active`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value as JsonValue, json};

use crate::rpc::{DeskError, RemoteCall};

pub const CONFIGURATION_DOCTYPE: &str = "Tally Configuration";
pub const GET_LIST_METHOD: &str = "frappe.client.get_list";
pub const SET_VALUE_METHOD: &str = "frappe.client.set_value";

const PAGE_LENGTH: usize = 50;

/// One configuration row as listed on the page.
///
/// The password is read so the row round-trips, but never written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfiguration {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// Check fields arrive as `0`/`1`, sometimes as booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(b) => b,
        JsonValue::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        JsonValue::String(s) => s == "1",
        _ => false,
    })
}

pub fn list_configurations(rpc: &dyn RemoteCall) -> Result<Vec<TallyConfiguration>, DeskError> {
    let response = rpc.call(
        GET_LIST_METHOD,
        json!({
            "doctype": CONFIGURATION_DOCTYPE,
            "fields": ["name", "company", "url", "is_active", "password", "username"],
            "limit_page_length": PAGE_LENGTH,
        }),
    )?;

    match response.message {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(rows) => Ok(serde_json::from_value(rows)?),
    }
}

pub fn set_active(rpc: &dyn RemoteCall, name: &str, active: bool) -> Result<(), DeskError> {
    let value = if active { 1 } else { 0 };
    rpc.call(
        SET_VALUE_METHOD,
        json!({
            "doctype": CONFIGURATION_DOCTYPE,
            "name": name,
            "fieldname": "is_active",
            "value": value,
        }),
    )?;
    tracing::info!(configuration = name, active, "configuration updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcResponse;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        message: Option<JsonValue>,
        calls: RefCell<Vec<(String, JsonValue)>>,
    }

    impl RemoteCall for Recorder {
        fn call(&self, method: &str, args: JsonValue) -> Result<RpcResponse, DeskError> {
            self.calls.borrow_mut().push((method.to_string(), args));
            Ok(RpcResponse {
                message: self.message.clone(),
            })
        }
    }

    #[test]
    fn lists_rows_with_numeric_flags() {
        let rpc = Recorder {
            message: Some(json!([
                {
                    "name": "CFG-1",
                    "company": "Acme",
                    "url": "http://tally:9000",
                    "is_active": 1,
                    "password": "s3cret"
                },
                { "name": "CFG-2", "is_active": 0 }
            ])),
            ..Default::default()
        };

        let rows = list_configurations(&rpc).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_active);
        assert!(!rows[1].is_active);
        assert_eq!(rows[1].company, None);

        let calls = rpc.calls.borrow();
        let (method, args) = &calls[0];
        assert_eq!(method, GET_LIST_METHOD);
        assert_eq!(args["doctype"], CONFIGURATION_DOCTYPE);
        assert_eq!(args["limit_page_length"], 50);
    }

    #[test]
    fn password_is_never_serialized() {
        let row: TallyConfiguration = serde_json::from_value(json!({
            "name": "CFG-1", "is_active": true, "password": "s3cret"
        }))
        .unwrap();
        assert_eq!(row.password.as_deref(), Some("s3cret"));

        let out = serde_json::to_value(&row).unwrap();
        assert!(out.get("password").is_none());
    }

    #[test]
    fn no_records_is_an_empty_list() {
        let rpc = Recorder::default();
        assert!(list_configurations(&rpc).unwrap().is_empty());
    }

    #[test]
    fn toggle_sends_zero_or_one() {
        let rpc = Recorder::default();

        set_active(&rpc, "CFG-1", true).unwrap();
        set_active(&rpc, "CFG-1", false).unwrap();

        let calls = rpc.calls.borrow();
        assert_eq!(calls[0].0, SET_VALUE_METHOD);
        assert_eq!(calls[0].1["fieldname"], "is_active");
        assert_eq!(calls[0].1["value"], 1);
        assert_eq!(calls[1].1["value"], 0);
    }
}
