//! Mock service manager for testing

use controlpod_util::ServiceName;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{HostError, HostResult, ServiceManager};

/// Mock service manager for unit/integration testing
pub struct MockServiceManager {
    requests: Arc<Mutex<Vec<ServiceName>>>,

    /// Configure restart requests to fail
    pub fail_restart: Arc<Mutex<bool>>,
}

impl MockServiceManager {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_restart: Arc::new(Mutex::new(false)),
        }
    }

    /// A mock whose restart requests are rejected
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_fail_restart(true);
        mock
    }

    pub fn set_fail_restart(&self, fail: bool) {
        *self.fail_restart.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    /// Every restart request received, including rejected ones
    pub fn restart_requests(&self) -> Vec<ServiceName> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn restart_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for MockServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager for MockServiceManager {
    fn request_restart(&self, service: &ServiceName) -> HostResult<()> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(service.clone());

        if *self.fail_restart.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(HostError::RestartRejected {
                code: Some(1),
                stderr: "Mock restart failure".into(),
            });
        }

        Ok(())
    }
}
