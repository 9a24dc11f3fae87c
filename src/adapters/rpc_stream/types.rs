//! RPC Stream Types
//!
//! Subscription requests and notification frames for the JSON-RPC socket.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::BurnSentinelSet;

/// What the socket subscribes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionKind {
    /// `transactionSubscribe` filtered to transactions touching a burn sentinel
    Transactions,
    /// `logsSubscribe` for every transaction mentioning a program
    Logs { program_id: String },
}

impl SubscriptionKind {
    pub fn method(&self) -> &'static str {
        match self {
            SubscriptionKind::Transactions => "transactionSubscribe",
            SubscriptionKind::Logs { .. } => "logsSubscribe",
        }
    }
}

/// Build the single subscription request sent after connecting
pub fn subscribe_request(
    id: u64,
    kind: &SubscriptionKind,
    sentinels: &BurnSentinelSet,
    commitment: &str,
) -> Value {
    let params = match kind {
        SubscriptionKind::Transactions => json!([
            {
                "accountInclude": sentinels.addresses(),
                "vote": false
            },
            {
                "commitment": commitment,
                "encoding": "jsonParsed",
                "transactionDetails": "full",
                "maxSupportedTransactionVersion": 0
            }
        ]),
        SubscriptionKind::Logs { program_id } => json!([
            { "mentions": [program_id] },
            { "commitment": commitment }
        ]),
    };

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": kind.method(),
        "params": params
    })
}

/// Any frame received on the socket: an ack, an error, or a notification
#[derive(Debug, Clone, Deserialize)]
pub struct RpcMessage {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<NotificationParams>,
    /// Subscription id on acks
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationParams {
    #[serde(default)]
    pub subscription: Option<u64>,
    pub result: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `logsNotification` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResult {
    pub value: LogsValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsValue {
    pub signature: String,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
}

/// Flatten the enhanced-stream nesting.
///
/// Some providers deliver `{signature, transaction: {transaction, meta}}`;
/// the classifier expects `{signature, transaction, meta}`.
pub fn normalize_transaction_result(result: Value) -> Value {
    let nested = result
        .get("transaction")
        .and_then(|outer| outer.get("transaction"))
        .is_some();
    if !nested {
        return result;
    }

    let outer = &result["transaction"];
    json!({
        "signature": result.get("signature").cloned().unwrap_or(Value::Null),
        "transaction": outer["transaction"].clone(),
        "meta": outer.get("meta").cloned().unwrap_or(Value::Null),
    })
}
