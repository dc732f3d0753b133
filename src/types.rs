use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RelayError, Result};

/// Transaction notification that triggers one relay invocation. Unknown
/// fields are retained so the sentinel payload can forward the whole record
/// as its `transaction` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionTrigger {
    pub hash: String,
    pub network: String,
    #[serde(rename = "blockHash", skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionTrigger {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| RelayError::InvalidTrigger(format!("Failed to parse trigger JSON: {}", e)))
    }
}

/// One decoded log from a trace, as returned by the trace provider.
/// Read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Matched event identifier; absent when the provider could not decode
    /// the log against a known signature.
    #[serde(default)]
    pub name: Option<String>,
    pub raw: RawLog,
    #[serde(default)]
    pub inputs: Vec<LogInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLog {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInput {
    pub soltype: SolType,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolType {
    pub name: String,
}

/// A flattened representation of one matched log: field name to stringified
/// value, with the reserved `name` key holding the event identifier.
/// Insertion order is preserved on serialization.
pub type EventRecord = Map<String, Value>;

/// Decoded execution record for one transaction.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Full provider response body, forwarded verbatim in the basic payload.
    pub data: Value,
    pub logs: Vec<LogEntry>,
    pub call_trace: Value,
}

impl Trace {
    /// Parse the typed log entries and call trace out of a raw provider
    /// response body. A trace without logs yields an empty log sequence.
    pub fn from_body(data: Value) -> Result<Self> {
        let logs = match data.get("logs") {
            None | Some(Value::Null) => Vec::new(),
            Some(logs) => serde_json::from_value(logs.clone())
                .map_err(|e| RelayError::TraceFetch(format!("Failed to parse trace logs: {}", e)))?,
        };
        let call_trace = data.get("call_trace").cloned().unwrap_or(Value::Null);

        Ok(Self {
            data,
            logs,
            call_trace,
        })
    }
}

/// Contract name and ABI resolved from the metadata service. Defaults to
/// empty when there is no address to enrich or the lookup fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractMetadata {
    pub name: Option<String>,
    pub abi: Option<Value>,
}

/// Variant 1 webhook body: raw trace plus the extracted addresses, event
/// records and contract name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    pub addresses: Vec<String>,
    pub events: Vec<EventRecord>,
    pub trace_data: Value,
}

impl BasicPayload {
    pub fn assemble(
        trace: &Trace,
        addresses: Vec<String>,
        events: Vec<EventRecord>,
        metadata: ContractMetadata,
    ) -> Self {
        Self {
            contract_name: metadata.name,
            addresses,
            events,
            trace_data: trace.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentinelInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi: Option<Value>,
}

/// Variant 2 webhook body: the triggering transaction, the matched event
/// records as match reasons, the enrichment sub-object and the call trace
/// only (not the whole provider response).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentinelPayload {
    pub hash: String,
    pub transaction: TransactionTrigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub match_reasons: Vec<EventRecord>,
    pub sentinel: SentinelInfo,
    pub trace_data: Value,
    pub addresses: Vec<String>,
}

impl SentinelPayload {
    pub fn assemble(
        trigger: &TransactionTrigger,
        trace: &Trace,
        addresses: Vec<String>,
        match_reasons: Vec<EventRecord>,
        metadata: ContractMetadata,
    ) -> Self {
        Self {
            hash: trigger.hash.clone(),
            transaction: trigger.clone(),
            block_hash: trigger.block_hash.clone(),
            block_number: trigger.block_number,
            match_reasons,
            sentinel: SentinelInfo {
                contract_name: metadata.name,
                abi: metadata.abi,
            },
            trace_data: trace.call_trace.clone(),
            addresses,
        }
    }
}

/// Per-invocation summary returned by the pipeline entry points.
#[derive(Debug, Clone)]
pub struct RelayReport {
    pub event_name: String,
    pub addresses: Vec<String>,
    pub events_matched: usize,
    pub delivered: bool,
}
