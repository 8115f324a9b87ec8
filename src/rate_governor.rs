/*!
 * Cooperative request throttling per backend identity.
 *
 * Enforcement is a fixed delay before each call, not a token bucket: a
 * single serialized request stream respects per-minute ceilings trivially
 * when spaced, so the sliding-window log here is kept for diagnostics
 * only. The governor assumes one caller sequence per run and does not
 * coordinate across processes.
 */

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::app_config::{Config, RatePolicy};
use crate::backends::BackendIdentity;

/// Width of the diagnostic request window.
const WINDOW: Duration = Duration::from_secs(60);

/// The kind of wait being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Spacing before an API request
    Request,
    /// Spacing between consecutive segments of one page
    InterSegment,
}

/// Best-effort throttle enforcing minimum spacing between outbound
/// translation requests, keyed by backend identity.
pub struct RateGovernor {
    policies: HashMap<BackendIdentity, RatePolicy>,
    request_log: Mutex<HashMap<BackendIdentity, Vec<Instant>>>,
}

impl RateGovernor {
    /// Build a governor with per-identity policies taken from the config.
    pub fn new(config: &Config) -> Self {
        let policies = BackendIdentity::ALL
            .iter()
            .map(|&identity| (identity, config.rate_policy(identity)))
            .collect();

        Self {
            policies,
            request_log: Mutex::new(HashMap::new()),
        }
    }

    /// Pause the calling flow for the configured delay, if any.
    ///
    /// A zero delay disables the wait for that identity and kind.
    pub async fn wait_if_needed(&self, identity: BackendIdentity, kind: CallKind) {
        let Some(policy) = self.policies.get(&identity) else {
            return;
        };

        let delay_ms = match kind {
            CallKind::Request => policy.request_delay_ms,
            CallKind::InterSegment => policy.segment_delay_ms,
        };

        if delay_ms > 0 {
            debug!(
                "Rate limiting: waiting {}ms for {} ({:?})",
                delay_ms, identity, kind
            );
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    /// Record a request timestamp for sliding-window accounting.
    ///
    /// Only entries within the trailing 60 seconds are kept. The count is
    /// diagnostic; when it exceeds the advisory per-minute ceiling a
    /// warning is logged, but nothing is blocked.
    pub fn log_request(&self, identity: BackendIdentity) {
        let now = Instant::now();
        let mut log = self.request_log.lock();
        let entries = log.entry(identity).or_default();

        entries.retain(|t| now.duration_since(*t) < WINDOW);
        entries.push(now);

        let count = entries.len();
        debug!("{} requests in last minute: {}", identity, count);

        if let Some(policy) = self.policies.get(&identity) {
            if let Some(ceiling) = policy.max_requests_per_minute {
                if count as u32 > ceiling {
                    warn!(
                        "{} request rate ({} in the last minute) exceeds the advisory ceiling of {}",
                        identity, count, ceiling
                    );
                }
            }
        }
    }

    /// Number of requests recorded for `identity` in the trailing window.
    pub fn requests_in_last_minute(&self, identity: BackendIdentity) -> usize {
        let now = Instant::now();
        let mut log = self.request_log.lock();
        let entries = log.entry(identity).or_default();
        entries.retain(|t| now.duration_since(*t) < WINDOW);
        entries.len()
    }
}
