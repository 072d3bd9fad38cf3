//! Extraction of the fields IPSI sends back after a payment attempt.
//!
//! The payload is trusted as-is: nothing here checks a signature. Missing
//! fields default to an empty string, except `cardToken`, which stays `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Fixed-shape callback record. Serializes with the gateway's key names and
/// always emits all nine keys (`cardToken` as `null` when absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Confirmation {
    pub card_token: Option<String>,
    pub txn_reference: String,
    pub amount: String,
    #[serde(rename = "maskedPAN")]
    pub masked_pan: String,
    pub merch_reference: String,
    pub hierarchy: String,
    pub customer_id: String,
    pub notification_id: String,
    pub user_name: String,
}

/// Recognized callback keys, in the order the gateway documents them.
pub const CONFIRMATION_KEYS: [&str; 9] = [
    "cardToken",
    "txnReference",
    "amount",
    "maskedPAN",
    "merchReference",
    "hierarchy",
    "customerId",
    "notificationId",
    "userName",
];

/// Build a [`Confirmation`] from any key/value mapping. Unknown keys are ignored.
pub fn confirmation<I, K, V>(data: I) -> Confirmation
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut record = Confirmation::default();
    for (key, value) in data {
        record.set(key.as_ref(), value.into());
    }
    debug!(merch_reference = %record.merch_reference, "extracted IPSI confirmation");
    record
}

impl Confirmation {
    /// Parse a raw query string or form body. Malformed input yields the default record.
    pub fn from_query(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
        confirmation(pairs)
    }

    /// Object payloads only; `null` counts as absent, numbers and booleans keep their JSON text.
    pub fn from_json(payload: &Value) -> Self {
        let Some(object) = payload.as_object() else {
            return confirmation(Vec::<(String, String)>::new());
        };
        confirmation(object.iter().filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.as_str(), text))
        }))
    }

    fn set(&mut self, key: &str, value: String) {
        match key {
            "cardToken" => self.card_token = Some(value),
            "txnReference" => self.txn_reference = value,
            "amount" => self.amount = value,
            "maskedPAN" => self.masked_pan = value,
            "merchReference" => self.merch_reference = value,
            "hierarchy" => self.hierarchy = value,
            "customerId" => self.customer_id = value,
            "notificationId" => self.notification_id = value,
            "userName" => self.user_name = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn empty_input_defaults_every_key() {
        let record = confirmation(HashMap::<String, String>::new());
        assert_eq!(record, Confirmation::default());
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        for key in CONFIRMATION_KEYS {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["cardToken"], Value::Null);
        assert_eq!(object["maskedPAN"], json!(""));
    }

    #[test]
    fn copies_known_keys_and_ignores_others() {
        let record = confirmation([
            ("merchReference", "X-123-9"),
            ("cardToken", "tok_1"),
            ("verifyMessage", "ignored"),
        ]);
        assert_eq!(record.merch_reference, "X-123-9");
        assert_eq!(record.card_token.as_deref(), Some("tok_1"));
        assert_eq!(record.amount, "");
    }

    #[test]
    fn query_parsing_decodes_values() {
        let record =
            Confirmation::from_query("?amount=10.50&maskedPAN=411111%2A%2A%2A%2A1111&userName=a+b");
        assert_eq!(record.amount, "10.50");
        assert_eq!(record.masked_pan, "411111****1111");
        assert_eq!(record.user_name, "a b");
        assert_eq!(record.card_token, None);
    }

    #[test]
    fn json_scalars_are_rendered_and_null_is_absent() {
        let record = Confirmation::from_json(&json!({
            "amount": 10.5,
            "customerId": 77,
            "cardToken": null,
            "hierarchy": {"nested": true}
        }));
        assert_eq!(record.amount, "10.5");
        assert_eq!(record.customer_id, "77");
        assert_eq!(record.card_token, None);
        assert_eq!(record.hierarchy, "");
        assert_eq!(Confirmation::from_json(&json!([1, 2])), Confirmation::default());
    }
}
