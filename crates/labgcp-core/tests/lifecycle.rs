//! Orchestrator scenarios against a scripted provider

use async_trait::async_trait;
use labgcp_cloud::{
    AccessConfig, AddressPoll, CloudError, ComputeProvider, InstanceRecord, InstanceSpec,
    InstanceStatus, NetworkInterface, OperationInfo, LABEL_ENV, LABEL_OWNER,
};
use labgcp_core::{CreateRequest, InstanceManager, LifecycleError, PolicyError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Calls {
    inserts: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    deletes: AtomicUsize,
    resizes: AtomicUsize,
    label_sets: AtomicUsize,
}

/// Scripted provider: successive `list_instances` calls pop from `listings`
/// (the last entry repeats); `get_instance` serves from `records`.
#[derive(Default)]
struct MockProvider {
    listings: Mutex<VecDeque<Vec<InstanceRecord>>>,
    records: Mutex<HashMap<String, InstanceRecord>>,
    conflict_on_set_labels: bool,
    submitted_labels: Arc<Mutex<Option<HashMap<String, String>>>>,
    calls: Arc<Calls>,
}

fn op(name: &str) -> OperationInfo {
    OperationInfo {
        name: Some(format!("operation-{name}")),
        operation_type: None,
        target_link: format!(
            "https://www.googleapis.com/compute/v1/projects/p/zones/z/instances/{name}"
        ),
        status: Some("RUNNING".to_string()),
    }
}

#[async_trait]
impl ComputeProvider for MockProvider {
    async fn list_instances(
        &self,
        _project: &str,
        _zone: &str,
    ) -> labgcp_cloud::Result<Vec<InstanceRecord>> {
        let mut listings = self.listings.lock().unwrap();
        if listings.len() > 1 {
            Ok(listings.pop_front().unwrap())
        } else {
            Ok(listings.front().cloned().unwrap_or_default())
        }
    }

    async fn get_instance(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<InstanceRecord> {
        self.records
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| CloudError::InstanceNotFound(name.to_string()))
    }

    async fn insert_instance(
        &self,
        _project: &str,
        _zone: &str,
        spec: &InstanceSpec,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(op(&spec.name))
    }

    async fn start_instance(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.starts.fetch_add(1, Ordering::SeqCst);
        Ok(op(name))
    }

    async fn stop_instance(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.stops.fetch_add(1, Ordering::SeqCst);
        Ok(op(name))
    }

    async fn delete_instance(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(op(name))
    }

    async fn set_machine_type(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
        _machine_type: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.resizes.fetch_add(1, Ordering::SeqCst);
        Ok(op(name))
    }

    async fn set_labels(
        &self,
        _project: &str,
        _zone: &str,
        name: &str,
        labels: &HashMap<String, String>,
        _fingerprint: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        self.calls.label_sets.fetch_add(1, Ordering::SeqCst);
        if self.conflict_on_set_labels {
            return Err(CloudError::LabelConflict(name.to_string()));
        }
        *self.submitted_labels.lock().unwrap() = Some(labels.clone());
        Ok(op(name))
    }
}

fn record(name: &str, status: InstanceStatus, owner: &str, ip: Option<&str>) -> InstanceRecord {
    let mut labels = HashMap::new();
    labels.insert(LABEL_OWNER.to_string(), owner.to_string());
    labels.insert(LABEL_ENV.to_string(), "time-managed".to_string());
    InstanceRecord {
        name: name.to_string(),
        status,
        labels,
        label_fingerprint: Some("fp-1".to_string()),
        machine_type: None,
        network_interfaces: vec![NetworkInterface {
            access_configs: vec![AccessConfig {
                nat_ip: ip.map(String::from),
            }],
        }],
    }
}

fn manager(provider: MockProvider) -> InstanceManager<MockProvider> {
    InstanceManager::new(provider, "sc-lab-1234", "us-central1-f", 2).with_poll(AddressPoll {
        interval: Duration::from_millis(1),
        max_attempts: 3,
    })
}

fn create_req(user: &str, instance: &str) -> CreateRequest {
    CreateRequest {
        user: user.to_string(),
        instance: instance.to_string(),
        machine_type: "n1-highmem-8".to_string(),
        boot_disk_size_gb: 200,
        image: "rstudio-sc-basic".to_string(),
        image_project: "sc-lab-1234".to_string(),
        startup_script: None,
    }
}

#[tokio::test]
async fn create_denied_at_quota_makes_no_insert() {
    let provider = MockProvider::default();
    provider.listings.lock().unwrap().push_back(vec![
        record("rstudio-alice", InstanceStatus::Running, "alice", None),
        record("rstudio-2-alice", InstanceStatus::Terminated, "alice", None),
    ]);
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr.create(&create_req("alice", "rstudio-3")).await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Policy(PolicyError::QuotaExceeded { limit: 2 })
    ));
    assert_eq!(calls.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_resolves_name_and_waits_for_address() {
    let provider = MockProvider::default();
    {
        let mut listings = provider.listings.lock().unwrap();
        // quota check sees an empty zone
        listings.push_back(Vec::new());
        // first re-query: instance exists but no address yet
        listings.push_back(vec![record(
            "rstudio-bob",
            InstanceStatus::Provisioning,
            "bob",
            None,
        )]);
        // second re-query: address assigned
        listings.push_back(vec![record(
            "rstudio-bob",
            InstanceStatus::Running,
            "bob",
            Some("34.66.1.2"),
        )]);
    }
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let outcome = mgr.create(&create_req("bob", "rstudio")).await.unwrap();

    assert_eq!(outcome.name, "rstudio-bob");
    assert_eq!(outcome.address, "34.66.1.2");
    assert_eq!(calls.inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_times_out_when_address_never_appears() {
    let provider = MockProvider::default();
    provider.listings.lock().unwrap().push_back(Vec::new());

    let mgr = manager(provider);
    let err = mgr.create(&create_req("bob", "rstudio")).await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Cloud(CloudError::AddressTimeout { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn resize_on_running_instance_denied_without_provider_call() {
    let provider = MockProvider::default();
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Running, "bob", Some("34.66.1.2")),
    );
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr
        .set_machine_type("bob", "rstudio", "n1-standard-4")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Policy(PolicyError::InvalidTransition { .. })
    ));
    assert_eq!(calls.resizes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resize_on_terminated_instance_goes_through() {
    let provider = MockProvider::default();
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Terminated, "bob", None),
    );
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let name = mgr
        .set_machine_type("bob", "rstudio", "n1-standard-4")
        .await
        .unwrap();

    assert_eq!(name, "rstudio-bob");
    assert_eq!(calls.resizes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn duplicate_start_denied_without_provider_call() {
    let provider = MockProvider::default();
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Running, "bob", Some("34.66.1.2")),
    );
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr.start("bob", "rstudio").await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Policy(PolicyError::InvalidTransition { .. })
    ));
    assert_eq!(calls.starts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_stop_denied_without_provider_call() {
    let provider = MockProvider::default();
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Terminated, "bob", None),
    );
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr.stop("bob", "rstudio").await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Policy(PolicyError::InvalidTransition { .. })
    ));
    assert_eq!(calls.stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_of_missing_instance_reports_not_found() {
    let provider = MockProvider::default();
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr.delete("bob", "rstudio").await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Cloud(CloudError::InstanceNotFound(name)) if name == "rstudio-bob"
    ));
    assert_eq!(calls.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn time_label_merge_keeps_existing_labels() {
    let provider = MockProvider::default();
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Running, "bob", Some("34.66.1.2")),
    );
    let submitted_labels = provider.submitted_labels.clone();

    let mgr = manager(provider);
    let (name, value) = mgr.set_time_label("bob", "rstudio", false).await.unwrap();

    assert_eq!(name, "rstudio-bob");
    assert_eq!(value, "time-unmanaged");

    let submitted = submitted_labels
        .lock()
        .unwrap()
        .clone()
        .expect("labels submitted");
    assert_eq!(submitted.get(LABEL_ENV).map(String::as_str), Some("time-unmanaged"));
    assert_eq!(submitted.get(LABEL_OWNER).map(String::as_str), Some("bob"));
}

#[tokio::test]
async fn stale_fingerprint_surfaces_conflict_without_retry() {
    let provider = MockProvider {
        conflict_on_set_labels: true,
        ..MockProvider::default()
    };
    provider.records.lock().unwrap().insert(
        "rstudio-bob".to_string(),
        record("rstudio-bob", InstanceStatus::Running, "bob", Some("34.66.1.2")),
    );
    let calls = provider.calls.clone();

    let mgr = manager(provider);
    let err = mgr.set_time_label("bob", "rstudio", true).await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Cloud(CloudError::LabelConflict(name)) if name == "rstudio-bob"
    ));
    // exactly one attempt, never retried with a fresh fetch
    assert_eq!(calls.label_sets.load(Ordering::SeqCst), 1);
}
