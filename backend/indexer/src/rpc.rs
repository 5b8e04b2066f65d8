//! Soroban RPC client — polls `getEvents` and decodes terminal events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, TerminalEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything else we retry
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`TerminalEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<TerminalEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<TerminalEvent> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // Topic position 2 carries the project id for project-scoped events.
    let project_id = match kind {
        EventKind::AllowMigration | EventKind::SetFee | EventKind::PriceFeedSet => None,
        _ => raw.topic.get(1).map(|t| extract_u64_or_raw(t)),
    };

    let (actor, beneficiary, amount, fee) = decode_data(&raw.value, &kind);

    Some(TerminalEvent {
        event_type: kind.as_str().to_string(),
        project_id,
        actor,
        beneficiary,
        amount,
        fee,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

type DecodedFields = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// The XDR is decoded by the RPC into a `{"type":…, …}` JSON object whose
/// field names match the contract's event structs.
fn decode_data(value: &Value, kind: &EventKind) -> DecodedFields {
    match kind {
        EventKind::Pay => (
            extract_field(value, &["payer"]),
            extract_field(value, &["beneficiary"]),
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::Tap => (
            extract_field(value, &["owner"]),
            None,
            extract_field(value, &["gross"]),
            extract_field(value, &["fee"]),
        ),
        EventKind::Redeem => (
            extract_field(value, &["holder"]),
            extract_field(value, &["destination"]),
            extract_field(value, &["proceeds"]),
            None,
        ),
        EventKind::Migrate => (
            extract_field(value, &["to"]),
            None,
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::AddToBalance => (
            extract_field(value, &["from"]),
            None,
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::PrintReserved => (
            extract_field(value, &["owner"]),
            None,
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::PrintPremined => (
            None,
            extract_field(value, &["beneficiary"]),
            extract_field(value, &["tickets"]),
            None,
        ),
        EventKind::DistributePayoutSplit | EventKind::DistributeTicketSplit => (
            None,
            find_nested(value, "beneficiary"),
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::Configure => (
            None,
            None,
            extract_field(value, &["cycle_number"]),
            None,
        ),
        EventKind::ProjectCreated => (extract_field(value, &["owner"]), None, None, None),
        // These publish a bare value rather than a struct.
        EventKind::AllowMigration => (
            value.as_str().map(String::from),
            None,
            None,
            None,
        ),
        EventKind::SetFee | EventKind::PriceFeedSet => (
            None,
            None,
            value
                .as_str()
                .map(String::from)
                .or_else(|| value.as_i64().map(|n| n.to_string())),
            None,
        ),
        EventKind::Unknown => (None, None, None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => v.as_str().map(String::from),
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

fn find_nested(value: &Value, key: &str) -> Option<String> {
    if let Value::Object(map) = value {
        for (k, v) in map {
            if k == key {
                return v.as_str().map(String::from);
            }
            if let Some(found) = find_nested(v, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"pay"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Extract the project_id from a topic entry that might be a JSON object or raw number/string.
fn extract_u64_or_raw(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(n) = v.get("value").and_then(|x| x.as_u64()) {
            return n.to_string();
        }
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
