//! End-to-end pipeline tests over the in-memory store and a scripted
//! transport

use crate::controller::RunController;
use crate::error::{Result, RuntimeError};
use crate::provider::RequestSpec;
use crate::store::{ConfigStore, MemoryStore};
use crate::transport::Transport;
use async_trait::async_trait;
use sitepulse_core::{
    ConfiguredRow, Device, FieldDefinition, ItemStatus, Provider, QueryMode,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that replays scripted bodies in request order
struct MockTransport {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
}

impl MockTransport {
    fn with_bodies(bodies: &[&str]) -> Self {
        Self {
            responses: Mutex::new(bodies.iter().map(|b| Ok(b.to_string())).collect()),
        }
    }

    fn failing(reason: &str) -> Self {
        let failures = (0..16).map(|_| Err(reason.to_string())).collect();
        Self {
            responses: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_all(&self, requests: &[RequestSpec]) -> Vec<Result<String>> {
        let mut responses = self.responses.lock().unwrap();
        requests
            .iter()
            .map(|_| match responses.pop_front() {
                Some(Ok(body)) => Ok(body),
                Some(Err(reason)) => Err(RuntimeError::Transport(reason)),
                None => Err(RuntimeError::Transport("no scripted response".to_string())),
            })
            .collect()
    }
}

fn row(id: usize, devices: &str) -> ConfiguredRow {
    ConfiguredRow {
        id,
        label: format!("site-{}", id),
        target: format!("https://site{}.test/", id),
        devices: devices.to_string(),
        mode: QueryMode::Url,
        active: true,
        status: ItemStatus::Idle,
        note: None,
    }
}

fn psi_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new(
            Provider::PsiApi,
            "LCP",
            r#"content.lighthouseResult.audits["largest-contentful-paint"].numericValue"#,
        ),
        FieldDefinition::new(
            Provider::PsiApi,
            "Performance",
            "round(content.lighthouseResult.categories.performance.score * 100)",
        ),
    ]
}

fn psi_body(lcp: f64, score: f64) -> String {
    format!(
        r#"{{"lighthouseResult":{{"audits":{{"largest-contentful-paint":{{"numericValue":{}}}}},
            "categories":{{"performance":{{"score":{}}}}}}}}}"#,
        lcp, score
    )
}

fn controller(store: Arc<MemoryStore>, transport: Arc<dyn Transport>, batch: usize) -> RunController {
    RunController::new(store.clone(), store.clone(), store, transport, batch)
}

#[tokio::test]
async fn test_scenario_full_success() {
    // Three mobile work items, all providers succeed: three records, all
    // rows succeeded.
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile"), row(1, "Mobile"), row(2, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["Date", "Label", "Device", "LCP", "Performance"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[
        &psi_body(2500.0, 0.9),
        &psi_body(1800.0, 0.95),
        &psi_body(3200.0, 0.7),
    ]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    let records = store.appended(Provider::PsiApi).await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0][3], "2500");
    assert_eq!(records[1][4], "95");

    for id in 0..3 {
        let (status, note) = store.row_status(id).await.unwrap();
        assert_eq!(status, ItemStatus::Succeeded);
        assert_eq!(note, None);
    }
}

#[tokio::test]
async fn test_scenario_device_expansion() {
    // "Mobile and Desktop" expands into two work items in the same batch.
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile and Desktop")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["Device", "LCP"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[
        &psi_body(2500.0, 0.9),
        &psi_body(2100.0, 0.92),
    ]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    let records = store.appended(Provider::PsiApi).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0][0], "MOBILE");
    assert_eq!(records[1][0], "DESKTOP");
    assert_eq!(
        store.row_status(0).await.unwrap().0,
        ItemStatus::Succeeded
    );
}

#[tokio::test]
async fn test_scenario_provider_reported_error() {
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[
        r#"{"error":{"message":"x"}}"#,
    ]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    assert!(store.appended(Provider::PsiApi).await.is_empty());
    let (status, note) = store.row_status(0).await.unwrap();
    assert_eq!(status, ItemStatus::ProviderError);
    assert!(note.unwrap().contains("x"));
}

#[tokio::test]
async fn test_scenario_malformed_response() {
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&["<html>502</html>"]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    assert!(store.appended(Provider::PsiApi).await.is_empty());
    let (status, _) = store.row_status(0).await.unwrap();
    assert_eq!(status, ItemStatus::Malformed);
}

#[tokio::test]
async fn test_scenario_history_fan_out() {
    let fields = vec![
        FieldDefinition::new(
            Provider::CruxHistory,
            "Date",
            "content.record.collectionPeriods[*].lastDate",
        ),
        FieldDefinition::new(
            Provider::CruxHistory,
            "LCP",
            r#"content.record.metrics["largest_contentful_paint"].percentilesTimeseries.p75s"#,
        ),
    ];
    let body = r#"{"record":{
        "collectionPeriods":[{"lastDate":"2024-01-01"},{"lastDate":"2024-01-02"}],
        "metrics":{"largest_contentful_paint":{"percentilesTimeseries":{"p75s":[120,130]}}}
    }}"#;

    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile")])
            .with_fields(fields)
            .with_header(Provider::CruxHistory, &["Date", "LCP", "URL"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[body]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::CruxHistory)
        .await
        .unwrap();

    let records = store.appended(Provider::CruxHistory).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0][0], "2024-01-01");
    assert_eq!(records[0][1], "120");
    assert_eq!(records[1][0], "2024-01-02");
    assert_eq!(records[1][1], "130");
    assert_eq!(records[0][2], "https://site0.test/");
    assert_eq!(
        store.row_status(0).await.unwrap().0,
        ItemStatus::Succeeded
    );
}

#[tokio::test]
async fn test_scenario_transport_failure_marks_every_item() {
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile"), row(1, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let transport = Arc::new(MockTransport::failing("connection reset"));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    for id in 0..2 {
        let (status, note) = store.row_status(id).await.unwrap();
        assert_eq!(status, ItemStatus::ProviderError);
        assert!(note.unwrap().contains("connection reset"));
    }
    assert!(store.appended(Provider::PsiApi).await.is_empty());
}

#[tokio::test]
async fn test_resumable_one_batch_per_invocation() {
    // Scheduled mode: the caller initializes once and drives one batch per
    // tick until no queued work remains.
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile"), row(1, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[
        &psi_body(2500.0, 0.9),
        &psi_body(1800.0, 0.95),
    ]));
    let controller = controller(store.clone(), transport, 1);

    controller.initialize().await.unwrap();
    assert_eq!(store.row_status(1).await.unwrap().0, ItemStatus::Queued);

    let more = controller.run_once(Provider::PsiApi).await.unwrap();
    assert!(more);
    assert_eq!(store.row_status(0).await.unwrap().0, ItemStatus::Succeeded);
    assert_eq!(store.row_status(1).await.unwrap().0, ItemStatus::Queued);

    let more = controller.run_once(Provider::PsiApi).await.unwrap();
    assert!(!more);
    assert_eq!(store.row_status(1).await.unwrap().0, ItemStatus::Succeeded);
    assert_eq!(store.appended(Provider::PsiApi).await.len(), 2);
}

#[tokio::test]
async fn test_two_device_row_never_strands_a_small_batch() {
    // A two-variant row with batch size 1 can never be selected; the run
    // must still terminate, with the defective row marked rather than
    // left queued forever.
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile and Desktop"), row(1, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[&psi_body(2500.0, 0.9)]));

    controller(store.clone(), transport, 1)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    let (status, _) = store.row_status(0).await.unwrap();
    assert_ne!(status, ItemStatus::Queued);
    assert_eq!(store.row_status(1).await.unwrap().0, ItemStatus::Succeeded);
    assert_eq!(store.appended(Provider::PsiApi).await.len(), 1);
}

#[tokio::test]
async fn test_field_failure_lands_in_debug_trail() {
    let fields = vec![
        FieldDefinition::new(Provider::PsiApi, "Bad", "exec(content)"),
        FieldDefinition::new(
            Provider::PsiApi,
            "LCP",
            r#"content.lighthouseResult.audits["largest-contentful-paint"].numericValue"#,
        ),
    ];
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile")])
            .with_fields(fields)
            .with_header(Provider::PsiApi, &["LCP", "Bad"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[&psi_body(2500.0, 0.9)]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    // The good field still landed, the bad one is empty and traced.
    let records = store.appended(Provider::PsiApi).await;
    assert_eq!(records, vec![vec!["2500".to_string(), "".to_string()]]);

    let debug = store.debug_entries().await;
    assert_eq!(debug.len(), 1);
    assert!(debug[0].error.contains("Bad"));
    assert_eq!(debug[0].url, "https://site0.test/");

    // A partially failing row still succeeds.
    assert_eq!(store.row_status(0).await.unwrap().0, ItemStatus::Succeeded);
}

#[tokio::test]
async fn test_sustainability_context_sees_green_domains() {
    let fields = vec![FieldDefinition::new(
        Provider::Sustainability,
        "Green Hosted",
        "contains(green_domains, domain(content.finalUrl))",
    )];
    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile")])
            .with_fields(fields)
            .with_header(Provider::Sustainability, &["Green Hosted"])
            .with_green_domains(vec!["site0.test".to_string()]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[
        r#"{"finalUrl":"https://site0.test/"}"#,
    ]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::Sustainability)
        .await
        .unwrap();

    let records = store.appended(Provider::Sustainability).await;
    assert_eq!(records, vec![vec!["true".to_string()]]);
}

/// ConfigStore wrapper that records every status written per row
struct StatusLog {
    inner: Arc<MemoryStore>,
    writes: Mutex<Vec<(usize, ItemStatus)>>,
}

impl StatusLog {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
        }
    }

    fn statuses_for(&self, row_id: usize) -> Vec<ItemStatus> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == row_id)
            .map(|(_, status)| *status)
            .collect()
    }
}

#[async_trait]
impl ConfigStore for StatusLog {
    async fn load_rows(&self) -> Result<Vec<ConfiguredRow>> {
        self.inner.load_rows().await
    }

    async fn load_fields(&self, provider: Provider) -> Result<Vec<FieldDefinition>> {
        self.inner.load_fields(provider).await
    }

    async fn set_status(
        &self,
        row_id: usize,
        status: ItemStatus,
        note: Option<String>,
    ) -> Result<()> {
        self.writes.lock().unwrap().push((row_id, status));
        self.inner.set_status(row_id, status, note).await
    }

    async fn api_key(&self) -> Result<Option<String>> {
        self.inner.api_key().await
    }
}

#[tokio::test]
async fn test_status_never_jumps_from_idle_to_terminal() {
    // A successful row walks Queued -> InFlight -> Succeeded; an
    // ineligible row is pinned at Idle and never reaches a terminal
    // status at all.
    let mut inactive = row(1, "Mobile");
    inactive.active = false;

    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![row(0, "Mobile"), inactive])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["LCP"]),
    );
    let log = Arc::new(StatusLog::new(store.clone()));
    let transport = Arc::new(MockTransport::with_bodies(&[&psi_body(2500.0, 0.9)]));
    let controller = RunController::new(log.clone(), store.clone(), store, transport, 10);

    controller.run_to_completion(Provider::PsiApi).await.unwrap();

    assert_eq!(
        log.statuses_for(0),
        vec![ItemStatus::Queued, ItemStatus::InFlight, ItemStatus::Succeeded]
    );
    assert_eq!(log.statuses_for(1), vec![ItemStatus::Idle]);
}

#[tokio::test]
async fn test_inactive_and_empty_rows_never_run() {
    let mut inactive = row(0, "Mobile");
    inactive.active = false;
    let mut empty = row(1, "Mobile");
    empty.target = String::new();

    let store = Arc::new(
        MemoryStore::new()
            .with_api_key("k1")
            .with_rows(vec![inactive, empty, row(2, "Mobile")])
            .with_fields(psi_fields())
            .with_header(Provider::PsiApi, &["Label"]),
    );
    let transport = Arc::new(MockTransport::with_bodies(&[&psi_body(2500.0, 0.9)]));

    controller(store.clone(), transport, 10)
        .run_to_completion(Provider::PsiApi)
        .await
        .unwrap();

    assert_eq!(store.row_status(0).await.unwrap().0, ItemStatus::Idle);
    assert_eq!(store.row_status(1).await.unwrap().0, ItemStatus::Idle);
    assert_eq!(store.row_status(2).await.unwrap().0, ItemStatus::Succeeded);

    let records = store.appended(Provider::PsiApi).await;
    assert_eq!(records, vec![vec!["site-2".to_string()]]);
}
