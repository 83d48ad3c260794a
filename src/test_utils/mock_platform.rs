//! In-memory [`TargetPlatform`] with scripted responses.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::models::ApiType;
use crate::platform::{CreateAction, PlatformError, PlatformResponse, TargetPlatform};

type Scripted = Result<PlatformResponse, PlatformError>;

/// A call observed by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Create {
        api_type: ApiType,
        name: String,
        action: CreateAction,
        bundle_len: usize,
    },
    GetEnvObject {
        env: String,
        kind: String,
        id_suffix: String,
    },
}

/// Scripted platform.
///
/// Responses queued for a key are served in order; the last one is repeated
/// once the queue is down to a single entry. Unscripted creates are accepted,
/// unscripted lookups are rejected with 404.
#[derive(Debug, Default)]
pub struct MockPlatform {
    creates: Mutex<HashMap<String, VecDeque<Scripted>>>,
    env_objects: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a create response for the bundle `name`.
    pub fn on_create(self, name: &str, response: Scripted) -> Self {
        self.creates.lock().unwrap().entry(name.to_string()).or_default().push_back(response);
        self
    }

    /// Queue a response for `get_env_object(env, kind, id_suffix)`.
    pub fn on_env_object(self, env: &str, kind: &str, id_suffix: &str, response: Scripted) -> Self {
        self.env_objects
            .lock()
            .unwrap()
            .entry(format!("{env}/{kind}/{id_suffix}"))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of create calls made for `name`.
    pub fn create_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::Create { name: n, .. } if n == name))
            .count()
    }

    /// Number of environment lookups made.
    pub fn lookup_count(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, PlatformCall::GetEnvObject { .. })).count()
    }

    fn next(queues: &Mutex<HashMap<String, VecDeque<Scripted>>>, key: &str) -> Option<Scripted> {
        let mut queues = queues.lock().unwrap();
        let queue = queues.get_mut(key)?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

/// A transient failure, as the client reports 5xx responses.
pub fn transient(operation: &str) -> PlatformError {
    PlatformError::Transient {
        operation: operation.to_string(),
        message: "HTTP 503: Service Unavailable".to_string(),
    }
}

#[async_trait]
impl TargetPlatform for MockPlatform {
    async fn create(
        &self,
        api_type: ApiType,
        name: &str,
        bundle: Vec<u8>,
        action: CreateAction,
    ) -> Result<PlatformResponse, PlatformError> {
        self.calls.lock().unwrap().push(PlatformCall::Create {
            api_type,
            name: name.to_string(),
            action,
            bundle_len: bundle.len(),
        });
        Self::next(&self.creates, name)
            .unwrap_or_else(|| Ok(PlatformResponse::Accepted(json!({"name": name, "revision": "1"}))))
    }

    async fn get_env_object(
        &self,
        env: &str,
        kind: &str,
        id_suffix: &str,
    ) -> Result<PlatformResponse, PlatformError> {
        self.calls.lock().unwrap().push(PlatformCall::GetEnvObject {
            env: env.to_string(),
            kind: kind.to_string(),
            id_suffix: id_suffix.to_string(),
        });
        Self::next(&self.env_objects, &format!("{env}/{kind}/{id_suffix}")).unwrap_or_else(|| {
            Ok(PlatformResponse::Rejected {
                status: 404,
                error: json!({"code": 404, "message": "not found"}),
            })
        })
    }
}
