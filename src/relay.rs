//! Pipeline orchestration. Each entry point is one linear pass:
//! fetch trace, extract, enrich, assemble, dispatch. A trace-fetch failure
//! aborts the invocation; metadata and delivery failures are logged and
//! absorbed so a single bad address or unreachable webhook never fails the
//! trigger.

use tracing::{error, info, warn};

use crate::client::TraceApiClient;
use crate::config::Secrets;
use crate::error::Result;
use crate::extract::{extract_addresses, extract_event_details, filter_logs};
use crate::types::{
    BasicPayload, ContractMetadata, EventRecord, RelayReport, SentinelPayload, Trace,
    TransactionTrigger,
};
use crate::webhook::WebhookDispatcher;

struct Extraction {
    trace: Trace,
    addresses: Vec<String>,
    events: Vec<EventRecord>,
}

/// Fetch the trace and run the pure extraction steps against the configured
/// event name.
async fn fetch_and_extract(
    client: &TraceApiClient,
    trigger: &TransactionTrigger,
    secrets: &Secrets,
) -> Result<Extraction> {
    let trace = client.fetch_trace(&trigger.network, &trigger.hash).await?;

    let filtered = filter_logs(&trace.logs, &secrets.event_name);
    let addresses = extract_addresses(&filtered);
    let events = extract_event_details(&filtered);

    info!("Event name: {}", secrets.event_name);
    info!("Addresses: {:?}", addresses);
    info!("Matched {} {} occurrences", events.len(), secrets.event_name);

    Ok(Extraction {
        trace,
        addresses,
        events,
    })
}

/// Enrichment step: at most one metadata lookup, for the first extracted
/// address only. No address, or a failed lookup, degrades to empty metadata
/// and the pipeline continues.
async fn enrich(
    client: &TraceApiClient,
    network: &str,
    address: Option<&str>,
) -> ContractMetadata {
    let Some(address) = address else {
        warn!("No matching addresses in trace, skipping contract metadata lookup");
        return ContractMetadata::default();
    };

    match client.fetch_contract_metadata(network, address).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Error fetching contract metadata for {}: {}", address, e);
            ContractMetadata::default()
        }
    }
}

/// Deliver the payload and fold the outcome into the report. Delivery
/// failures are logged, not propagated.
async fn dispatch_and_log<T: serde::Serialize>(
    dispatcher: &WebhookDispatcher,
    payload: &T,
    event_name: &str,
) -> bool {
    match dispatcher.dispatch(payload).await {
        Ok(_) => {
            info!("Successfully sent {} data to the webhook", event_name);
            true
        }
        Err(e) => {
            error!("Error sending data to the webhook: {}", e);
            false
        }
    }
}

/// Variant 1: forward the raw trace, extracted addresses, event records and
/// contract name; no webhook authorization.
pub async fn run_basic(trigger: &TransactionTrigger, secrets: &Secrets) -> Result<RelayReport> {
    let client = TraceApiClient::new(secrets);
    let extraction = fetch_and_extract(&client, trigger, secrets).await?;

    let metadata = enrich(
        &client,
        &trigger.network,
        extraction.addresses.first().map(String::as_str),
    )
    .await;

    let events_matched = extraction.events.len();
    let payload = BasicPayload::assemble(
        &extraction.trace,
        extraction.addresses.clone(),
        extraction.events,
        metadata,
    );

    let dispatcher = WebhookDispatcher::new(&secrets.webhook_url);
    let delivered = dispatch_and_log(&dispatcher, &payload, &secrets.event_name).await;

    Ok(RelayReport {
        event_name: secrets.event_name.clone(),
        addresses: extraction.addresses,
        events_matched,
        delivered,
    })
}

/// Variant 2: forward the triggering transaction, match reasons, the
/// sentinel enrichment object and the call trace only; the webhook receives
/// the bearer as its `Authorization` header.
pub async fn run_sentinel(trigger: &TransactionTrigger, secrets: &Secrets) -> Result<RelayReport> {
    let client = TraceApiClient::new(secrets);
    let extraction = fetch_and_extract(&client, trigger, secrets).await?;

    let metadata = enrich(
        &client,
        &trigger.network,
        extraction.addresses.first().map(String::as_str),
    )
    .await;

    let events_matched = extraction.events.len();
    let payload = SentinelPayload::assemble(
        trigger,
        &extraction.trace,
        extraction.addresses.clone(),
        extraction.events,
        metadata,
    );

    let dispatcher = WebhookDispatcher::new(&secrets.webhook_url).with_authorization(&secrets.bearer);
    let delivered = dispatch_and_log(&dispatcher, &payload, &secrets.event_name).await;

    Ok(RelayReport {
        event_name: secrets.event_name.clone(),
        addresses: extraction.addresses,
        events_matched,
        delivered,
    })
}
