// Shared fakes for the integration tests; each test binary uses a subset.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use town_gateway_rust::discovery::{EnvironmentDocument, EnvironmentStore, StoreError};
use town_gateway_rust::gateway::{
    BackendError, EndpointSpec, EndpointTable, Operation, ProvisionBackend, ResourceId,
};

/// Provisioning backend fake: records every applied operation in order and
/// hands out sequential resource ids (`r0`, `r1`, ...). Can be told to
/// reject one operation id to exercise failure paths.
#[derive(Default)]
pub struct RecordingBackend {
    applied: Mutex<Vec<Operation>>,
    sequence: AtomicUsize,
    fail_on: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(operation_id: &str) -> Self {
        Self {
            fail_on: Some(operation_id.to_string()),
            ..Self::default()
        }
    }

    pub fn applied(&self) -> Vec<Operation> {
        self.applied.lock().unwrap().clone()
    }

    pub fn applied_ids(&self) -> Vec<String> {
        self.applied
            .lock()
            .unwrap()
            .iter()
            .map(|op| op.id.to_string())
            .collect()
    }
}

#[async_trait]
impl ProvisionBackend for RecordingBackend {
    async fn apply(&self, operation: &Operation) -> Result<ResourceId, BackendError> {
        if self.fail_on.as_deref() == Some(operation.id.as_str()) {
            return Err(BackendError::Rejected {
                operation: operation.id.to_string(),
                status: 409,
                message: "injected failure".to_string(),
            });
        }

        self.applied.lock().unwrap().push(operation.clone());
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        Ok(ResourceId::new(format!("r{}", sequence)))
    }
}

/// In-memory environment store that counts writes.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, EnvironmentDocument>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, environment: &str, document: EnvironmentDocument) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(environment.to_string(), document);
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvironmentStore for MemoryStore {
    async fn read(&self, environment: &str) -> Result<Option<EnvironmentDocument>, StoreError> {
        Ok(self.documents.lock().unwrap().get(environment).cloned())
    }

    async fn write(
        &self,
        environment: &str,
        document: &EnvironmentDocument,
    ) -> Result<(), StoreError> {
        self.documents
            .lock()
            .unwrap()
            .insert(environment.to_string(), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// The `/users` + `/users/active` scenario table.
pub fn users_table(backend_address: &str) -> EndpointTable {
    let mut table = EndpointTable::new();
    table.declare_handler(
        "/users",
        EndpointSpec {
            backend_address: backend_address.to_string(),
            methods: vec!["GET".to_string()],
        },
    );
    table.declare_handler(
        "/users/active",
        EndpointSpec {
            backend_address: backend_address.to_string(),
            methods: vec!["GET".to_string(), "POST".to_string()],
        },
    );
    table
}
