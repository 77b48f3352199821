//! Rate-limited archive client with response caching
//!
//! [`ArchiveClient`] is the single gateway to the remote contest archive.
//! Every request goes through [`fetch`](ArchiveClient::fetch):
//! - a non-expired cache entry short-circuits the call entirely,
//! - cache misses pass a process-wide rate gate before going on the wire,
//!   so outbound calls are never closer than the configured minimum
//!   interval even under concurrent callers,
//! - successful responses are cached with a fixed TTL.
//!
//! The archive answers with an envelope `{status, result, comment}`; a
//! non-OK status becomes [`ArchiveError::Remote`] carrying the archive's
//! own message.

use chrono::Utc;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::archive::cache::ResponseCache;
use crate::archive::error::ArchiveError;
use crate::config::ArchiveConfig;
use crate::models::{Contest, Problem, Submission};

/// Response envelope used by the archive's query API
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    handle: String,
}

/// Shape of the `contest.standings` result; only the problem list is used
#[derive(Debug, Deserialize)]
struct Standings {
    #[serde(default)]
    problems: Vec<Problem>,
}

/// Cached, rate-limited client for the contest archive
pub struct ArchiveClient {
    http: Client,
    base_url: String,
    cache: ResponseCache,
    gate: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl ArchiveClient {
    /// Create a client from archive configuration
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Client`] if the HTTP client cannot be built
    /// and [`ArchiveError::InvalidInterval`] for a zero minimum interval.
    pub fn new(config: &ArchiveConfig) -> Result<Self, ArchiveError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ArchiveError::Client)?;

        let quota = Quota::with_period(Duration::from_millis(config.min_interval_ms))
            .ok_or(ArchiveError::InvalidInterval)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
            gate: RateLimiter::direct(quota),
        })
    }

    /// Fetch an endpoint's result, serving from cache when possible
    ///
    /// With `force_refresh` the cached entry is invalidated first, forcing
    /// a live call. Live calls wait on the shared rate gate; cache hits
    /// return immediately with no delay.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        force_refresh: bool,
    ) -> Result<Value, ArchiveError> {
        let key = ResponseCache::cache_key(endpoint, params);

        if force_refresh {
            self.cache.remove(&key);
        } else if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(endpoint = %endpoint, "Archive cache hit");
            return Ok(hit);
        }

        // Serializes concurrent callers at the minimum interval
        self.gate.until_ready().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(classify_transport)?;

        // Rejections arrive as an envelope on a non-2xx status, so parse
        // the body before judging the status code
        let status = response.status();
        let body = response.bytes().await.map_err(classify_transport)?;

        let envelope: ApiEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ArchiveError::Server(status.as_u16()));
            }
            Err(e) => return Err(ArchiveError::Decode(e.to_string())),
        };

        if envelope.status != "OK" {
            let message = envelope
                .comment
                .unwrap_or_else(|| String::from("archive returned a failure status"));
            tracing::warn!(endpoint = %endpoint, message = %message, "Archive request rejected");
            return Err(ArchiveError::Remote(message));
        }

        let result = envelope.result.unwrap_or(Value::Null);
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    /// List finished contests that started within `within_days`, newest
    /// first, truncated to `count`
    pub async fn recent_contests(
        &self,
        count: usize,
        within_days: i64,
    ) -> Result<Vec<Contest>, ArchiveError> {
        let params = [("gym", String::from("false"))];
        let raw = self.fetch("contest.list", &params, false).await?;

        let contests: Vec<Contest> = decode(raw)?;
        let cutoff = (Utc::now() - chrono::Duration::days(within_days)).timestamp();

        let mut recent: Vec<Contest> = contests
            .into_iter()
            .filter(|c| c.is_finished())
            .filter(|c| c.start_time_seconds.is_some_and(|t| t >= cutoff))
            .collect();
        recent.sort_by_key(|c| std::cmp::Reverse(c.start_time_seconds));
        recent.truncate(count);

        Ok(recent)
    }

    /// Problem list of one contest
    pub async fn contest_problems(&self, contest_id: i64) -> Result<Vec<Problem>, ArchiveError> {
        let params = [
            ("contestId", contest_id.to_string()),
            ("from", String::from("1")),
            ("count", String::from("1")),
            ("showUnofficial", String::from("false")),
        ];
        let raw = self.fetch("contest.standings", &params, false).await?;

        let standings: Standings = decode(raw)?;
        Ok(standings.problems)
    }

    /// A page of a user's submission history
    pub async fn user_submissions(
        &self,
        handle: &str,
        from: u32,
        count: u32,
        force_refresh: bool,
    ) -> Result<Vec<Submission>, ArchiveError> {
        let params = [
            ("handle", handle.to_string()),
            ("from", from.to_string()),
            ("count", count.to_string()),
        ];
        let raw = self.fetch("user.status", &params, force_refresh).await?;
        decode(raw)
    }

    /// Whether a handle exists in the archive
    ///
    /// An unknown handle comes back as a well-formed rejection, which maps
    /// to `false`; transport failures still propagate.
    pub async fn validate_handle(&self, handle: &str) -> Result<bool, ArchiveError> {
        let params = [("handles", handle.to_string())];
        match self.fetch("user.info", &params, false).await {
            Ok(raw) => {
                let users: Vec<UserInfo> = decode(raw)?;
                Ok(users
                    .first()
                    .is_some_and(|u| u.handle.eq_ignore_ascii_case(handle)))
            }
            Err(ArchiveError::Remote(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Purge cached submission history and profile data after a manual sync
    ///
    /// The handle is part of the hashed fingerprint, so the purge drops all
    /// entries of the user-scoped endpoints; they repopulate on next fetch.
    pub fn invalidate_user(&self, handle: &str) -> usize {
        let cleared =
            self.cache.remove_prefix("user.status:") + self.cache.remove_prefix("user.info:");
        tracing::info!(handle = %handle, cleared = cleared, "Invalidated cached user data");
        cleared
    }

    /// Access to the underlying cache, mainly for stats and tests
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

fn decode<T: serde::de::DeserializeOwned>(raw: Value) -> Result<T, ArchiveError> {
    serde_json::from_value(raw).map_err(|e| ArchiveError::Decode(e.to_string()))
}

fn classify_transport(err: reqwest::Error) -> ArchiveError {
    if err.is_timeout() {
        ArchiveError::Timeout
    } else if err.is_decode() {
        ArchiveError::Decode(err.to_string())
    } else {
        ArchiveError::Transport(err)
    }
}
