/*
 * Per-client fixed window rate limiting
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug)]
struct ClientWindow {
    started: Instant,
    requests: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: u32,
    clients: Mutex<HashMap<String, ClientWindow>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `client`; false once the current minute's budget
    /// is spent.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut clients = self.clients.lock();
        if clients.len() >= PRUNE_THRESHOLD {
            clients.retain(|_, window| now.duration_since(window.started) < WINDOW);
        }

        let window = clients.entry(client.to_string()).or_insert(ClientWindow {
            started: now,
            requests: 0,
        });

        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.requests = 0;
        }

        if window.requests >= self.requests_per_minute {
            return false;
        }
        window.requests += 1;
        true
    }
}
