// Endpoint registry - API endpoint records and simulated checks
use crate::domain::endpoint::{
    ApiEndpoint, EndpointId, EndpointPatch, EndpointTestResult, HttpMethod, NewEndpoint,
};
use crate::domain::error::OverwatchError;
use chrono::Utc;
use parking_lot::RwLock;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct CheckSettings {
    pub max_latency: Duration,
    pub success_rate: f64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            max_latency: Duration::from_millis(1000),
            success_rate: 0.9,
        }
    }
}

impl CheckSettings {
    /// Clamps the success rate into [0, 1]; NaN falls back to the default rate.
    fn sanitized(self) -> Self {
        let success_rate = if self.success_rate.is_nan() {
            Self::default().success_rate
        } else {
            self.success_rate.clamp(0.0, 1.0)
        };
        Self { success_rate, ..self }
    }
}

pub struct EndpointRegistry {
    endpoints: RwLock<Vec<ApiEndpoint>>,
    next_id: AtomicU64,
    check: CheckSettings,
}

impl EndpointRegistry {
    pub fn new(check: CheckSettings) -> Self {
        Self::with_endpoints(Self::default_endpoints(), check)
    }

    pub fn with_endpoints(endpoints: Vec<ApiEndpoint>, check: CheckSettings) -> Self {
        let next_id = endpoints.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Self {
            endpoints: RwLock::new(endpoints),
            next_id: AtomicU64::new(next_id),
            check: check.sanitized(),
        }
    }

    fn default_endpoints() -> Vec<ApiEndpoint> {
        let seed = [
            (1, "Get Users", HttpMethod::Get, "/api/users", "Retrieve all users", 145),
            (2, "Create User", HttpMethod::Post, "/api/users", "Create a new user", 289),
            (3, "Get System Stats", HttpMethod::Get, "/api/system/stats", "Get system statistics", 67),
        ];
        let now = Utc::now();

        seed.into_iter()
            .map(|(id, name, method, path, description, response_time_ms)| {
                let mut endpoint = ApiEndpoint::from_new(
                    id,
                    NewEndpoint {
                        name: name.to_string(),
                        method,
                        path: path.to_string(),
                        description: description.to_string(),
                    },
                );
                endpoint.last_tested = Some(now);
                endpoint.response_time_ms = Some(response_time_ms);
                endpoint
            })
            .collect()
    }

    pub fn list(&self) -> Vec<ApiEndpoint> {
        self.endpoints.read().clone()
    }

    pub fn get(&self, id: EndpointId) -> Result<ApiEndpoint, OverwatchError> {
        self.endpoints
            .read()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(OverwatchError::EndpointNotFound(id))
    }

    pub fn create(&self, new: NewEndpoint) -> ApiEndpoint {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let endpoint = ApiEndpoint::from_new(id, new);
        tracing::info!(id, path = %endpoint.path, "endpoint created");
        self.endpoints.write().push(endpoint.clone());
        endpoint
    }

    pub fn update(&self, id: EndpointId, patch: EndpointPatch) -> Result<ApiEndpoint, OverwatchError> {
        let mut endpoints = self.endpoints.write();
        let endpoint = endpoints
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(OverwatchError::EndpointNotFound(id))?;
        endpoint.apply(patch);
        Ok(endpoint.clone())
    }

    pub fn delete(&self, id: EndpointId) -> Result<(), OverwatchError> {
        let mut endpoints = self.endpoints.write();
        let index = endpoints
            .iter()
            .position(|e| e.id == id)
            .ok_or(OverwatchError::EndpointNotFound(id))?;
        endpoints.remove(index);
        tracing::info!(id, "endpoint deleted");
        Ok(())
    }

    /// Simulated check: waits a random latency, then succeeds with the configured probability.
    pub async fn test(&self, id: EndpointId) -> Result<EndpointTestResult, OverwatchError> {
        self.get(id)?;

        let (latency, success) = {
            let mut rng = rand::thread_rng();
            let max_ms = self.check.max_latency.as_millis() as u64;
            let latency_ms = if max_ms == 0 { 0 } else { rng.gen_range(0..max_ms) };
            (
                Duration::from_millis(latency_ms),
                rng.gen_bool(self.check.success_rate),
            )
        };

        let started = tokio::time::Instant::now();
        tokio::time::sleep(latency).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = EndpointTestResult::new(success, elapsed_ms);

        let mut endpoints = self.endpoints.write();
        let endpoint = endpoints
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(OverwatchError::EndpointNotFound(id))?;
        endpoint.record_test(&outcome, Utc::now());

        tracing::info!(id, success, response_time_ms = elapsed_ms, "endpoint checked");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::endpoint::EndpointStatus;

    fn registry(success_rate: f64) -> EndpointRegistry {
        EndpointRegistry::new(CheckSettings {
            max_latency: Duration::from_millis(0),
            success_rate,
        })
    }

    fn new_endpoint() -> NewEndpoint {
        NewEndpoint {
            name: "List Servers".to_string(),
            method: HttpMethod::Get,
            path: "/api/servers".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_seeded_with_default_endpoints() {
        let registry = registry(1.0);
        let names: Vec<String> = registry.list().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Get Users", "Create User", "Get System Stats"]);
    }

    #[test]
    fn test_create_assigns_next_id_without_test_data() {
        let registry = registry(1.0);
        let created = registry.create(new_endpoint());

        assert_eq!(created.id, 4);
        assert_eq!(created.status, EndpointStatus::Active);
        assert!(created.last_tested.is_none());
        assert!(created.response_time_ms.is_none());
        assert_eq!(registry.list().len(), 4);
    }

    #[test]
    fn test_update_and_delete_missing_endpoint() {
        let registry = registry(1.0);

        let updated = registry
            .update(1, EndpointPatch { name: Some("Users".to_string()), ..EndpointPatch::default() })
            .unwrap();
        assert_eq!(updated.name, "Users");
        assert_eq!(updated.path, "/api/users");

        assert!(matches!(
            registry.update(42, EndpointPatch::default()),
            Err(OverwatchError::EndpointNotFound(42))
        ));
        assert!(matches!(registry.delete(42), Err(OverwatchError::EndpointNotFound(42))));

        registry.delete(2).unwrap();
        assert!(registry.get(2).is_err());
    }

    #[tokio::test]
    async fn test_check_records_success() {
        let registry = registry(1.0);
        let result = registry.test(3).await.unwrap();

        assert!(result.success);
        assert_eq!(result.status_code, 200);
        let endpoint = registry.get(3).unwrap();
        assert_eq!(endpoint.status, EndpointStatus::Active);
        assert_eq!(endpoint.response_time_ms, Some(result.response_time_ms));
    }

    #[tokio::test]
    async fn test_check_records_failure() {
        let registry = registry(0.0);
        let created = registry.create(new_endpoint());
        let result = registry.test(created.id).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.status_code, 500);
        let endpoint = registry.get(created.id).unwrap();
        assert_eq!(endpoint.status, EndpointStatus::Error);
        assert!(endpoint.last_tested.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_latency_stays_below_maximum() {
        let registry = EndpointRegistry::new(CheckSettings {
            max_latency: Duration::from_millis(250),
            success_rate: 1.0,
        });

        for _ in 0..5 {
            let result = registry.test(1).await.unwrap();
            assert!(result.response_time_ms < 250);
        }
    }

    #[tokio::test]
    async fn test_nan_success_rate_falls_back_to_default() {
        let registry = registry(f64::NAN);
        assert_eq!(registry.check.success_rate, 0.9);
        assert_eq!(registry.check.max_latency, Duration::ZERO);

        let clamped = self::registry(7.5);
        assert_eq!(clamped.check.success_rate, 1.0);
        assert!(registry.test(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_unknown_endpoint() {
        let registry = registry(1.0);
        assert!(matches!(registry.test(99).await, Err(OverwatchError::EndpointNotFound(99))));
    }
}
