//! Connection lifecycle for the document store and the cache backend.
//!
//! The drivers (sqlx pool, redis connection manager) re-establish sockets on
//! their own. This module owns what they do not: a bounded exponential backoff
//! for the initial connect, and a supervisor that probes a backend on a cadence
//! and publishes an observable [`ConnectionState`].

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ConnectionSettings;

const METRIC_RECONNECT_TOTAL: &str = "polyfaq_connection_reconnect_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No probe has completed yet.
    Connecting,
    Connected,
    /// The last `attempt` probes failed; retrying with backoff.
    Reconnecting { attempt: u32 },
    /// Backoff attempts are exhausted. Probing continues at the maximum delay.
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting { .. } => "reconnecting",
            ConnectionState::Failed => "failed",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Consecutive failures tolerated before a component is reported as failed.
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(3),
            max_attempts: 5,
        }
    }
}

impl From<&ConnectionSettings> for BackoffPolicy {
    fn from(settings: &ConnectionSettings) -> Self {
        Self {
            initial_delay: settings.initial_backoff,
            max_delay: settings.max_backoff,
            max_attempts: settings.max_attempts.get(),
        }
    }
}

impl BackoffPolicy {
    /// Delay before retrying after the given 0-indexed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

/// Run `connect` until it succeeds or `policy.max_attempts` is exhausted.
pub async fn connect_with_backoff<F, Fut, T, E>(
    component: &'static str,
    policy: &BackoffPolicy,
    mut connect: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match connect().await {
            Ok(value) => {
                info!(target = "polyfaq::connection", component, "connected");
                return Ok(value);
            }
            Err(err) if attempt + 1 < attempts => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    target = "polyfaq::connection",
                    component,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "connection attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    target = "polyfaq::connection",
                    component,
                    attempts,
                    error = %err,
                    "giving up on connection"
                );
                return Err(err);
            }
        }
    }
}

/// A cheap liveness check against a backend.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> Result<(), String>;
}

/// Read-only view of a supervised component.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    component: &'static str,
    state: watch::Receiver<ConnectionState>,
}

impl ConnectionMonitor {
    /// A monitor whose state never changes, for components that are not supervised.
    pub fn fixed(component: &'static str, state: ConnectionState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self {
            component,
            state: rx,
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }
}

pub struct ConnectionSupervisor {
    component: &'static str,
    probe: Arc<dyn Probe>,
    policy: BackoffPolicy,
    probe_interval: Duration,
    failures: u32,
    state: watch::Sender<ConnectionState>,
}

impl ConnectionSupervisor {
    pub fn new(
        component: &'static str,
        probe: Arc<dyn Probe>,
        policy: BackoffPolicy,
        probe_interval: Duration,
    ) -> Self {
        let (state, _rx) = watch::channel(ConnectionState::Connecting);
        Self {
            component,
            probe,
            policy,
            probe_interval,
            failures: 0,
            state,
        }
    }

    pub fn monitor(&self) -> ConnectionMonitor {
        ConnectionMonitor {
            component: self.component,
            state: self.state.subscribe(),
        }
    }

    /// Probe once, publish the resulting state and return the delay before the next probe.
    pub async fn tick(&mut self) -> Duration {
        let previous = *self.state.borrow();
        match self.probe.probe().await {
            Ok(()) => {
                if self.failures > 0 {
                    counter!(METRIC_RECONNECT_TOTAL, "component" => self.component).increment(1);
                    info!(
                        target = "polyfaq::connection",
                        component = self.component,
                        after_failures = self.failures,
                        "connection restored"
                    );
                }
                self.failures = 0;
                self.publish(ConnectionState::Connected);
                self.probe_interval
            }
            Err(err) => {
                self.failures = self.failures.saturating_add(1);
                if self.failures >= self.policy.max_attempts.max(1) {
                    if previous != ConnectionState::Failed {
                        error!(
                            target = "polyfaq::connection",
                            component = self.component,
                            failures = self.failures,
                            error = %err,
                            "connection failed"
                        );
                    }
                    self.publish(ConnectionState::Failed);
                    self.policy.max_delay
                } else {
                    warn!(
                        target = "polyfaq::connection",
                        component = self.component,
                        attempt = self.failures,
                        error = %err,
                        "connection probe failed"
                    );
                    self.publish(ConnectionState::Reconnecting {
                        attempt: self.failures,
                    });
                    self.policy.delay_for_attempt(self.failures - 1)
                }
            }
        }
    }

    /// Probe forever. Dropping the returned handle's task stops supervision.
    pub fn spawn(mut self) -> (ConnectionMonitor, JoinHandle<()>) {
        let monitor = self.monitor();
        let handle = tokio::spawn(async move {
            loop {
                let delay = self.tick().await;
                tokio::time::sleep(delay).await;
            }
        });
        (monitor, handle)
    }

    fn publish(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }
}
