//! In-memory `SourceFetcher` used by the engine and service tests.

use super::{normalize, SourceFetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Respond = Arc<dyn Fn(usize) -> Result<Value, FetchError> + Send + Sync>;

struct Route {
    delay: Duration,
    respond: Respond,
    hits: usize,
}

/// Answers each URL from a closure that receives the 1-based call number.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Route>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F>(self, url: &str, respond: F) -> Self
    where
        F: Fn(usize) -> Result<Value, FetchError> + Send + Sync + 'static,
    {
        self.route_with_delay(url, Duration::ZERO, respond)
    }

    pub fn route_with_delay<F>(self, url: &str, delay: Duration, respond: F) -> Self
    where
        F: Fn(usize) -> Result<Value, FetchError> + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route {
                delay,
                respond: Arc::new(respond),
                hits: 0,
            },
        );
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .map_or(0, |route| route.hits)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        let (call, delay, respond) = {
            let mut routes = self.routes.lock().unwrap();
            let Some(route) = routes.get_mut(url) else {
                return Err(FetchError::Network {
                    detail: format!("no route to {}", url),
                });
            };
            route.hits += 1;
            (route.hits, route.delay, route.respond.clone())
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(self.in_flight.clone());

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        respond(call).map(normalize)
    }
}
