//! Daily generation trigger
//!
//! This module provides the mechanism for invoking problem set generation
//! at a fixed time every day (00:00 UTC) and once at process startup.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::error::{SchedulerError, SchedulerResult};
use crate::generator::{today_utc, Generator};
use crate::models::DailyProblemSet;

// ============================================================================
// Trigger Configuration
// ============================================================================

/// Configuration for the daily trigger
///
/// All times are UTC; generation dates are UTC calendar days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Time of day to generate the next set (24h format, e.g. "00:00")
    pub rotation_time: String,

    /// Whether to generate immediately on startup
    pub trigger_on_startup: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            rotation_time: "00:00".to_string(),
            trigger_on_startup: true,
        }
    }
}

impl TriggerConfig {
    /// Create a new config builder
    pub fn builder() -> TriggerConfigBuilder {
        TriggerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> SchedulerResult<()> {
        if NaiveTime::parse_from_str(&self.rotation_time, "%H:%M").is_err() {
            return Err(SchedulerError::trigger_config(
                "rotation_time",
                format!(
                    "Invalid time format '{}'. Expected HH:MM",
                    self.rotation_time
                ),
            ));
        }

        Ok(())
    }

    /// Parse the rotation time
    pub fn parse_rotation_time(&self) -> SchedulerResult<NaiveTime> {
        NaiveTime::parse_from_str(&self.rotation_time, "%H:%M").map_err(|_| {
            SchedulerError::trigger_config(
                "rotation_time",
                format!("Invalid time: {}", self.rotation_time),
            )
        })
    }
}

/// Builder for TriggerConfig
#[derive(Debug, Default)]
pub struct TriggerConfigBuilder {
    rotation_time: Option<String>,
    trigger_on_startup: Option<bool>,
}

impl TriggerConfigBuilder {
    /// Set rotation time
    pub fn rotation_time(mut self, time: impl Into<String>) -> Self {
        self.rotation_time = Some(time.into());
        self
    }

    /// Set trigger on startup
    pub fn trigger_on_startup(mut self, value: bool) -> Self {
        self.trigger_on_startup = Some(value);
        self
    }

    /// Build the config
    pub fn build(self) -> SchedulerResult<TriggerConfig> {
        let config = TriggerConfig {
            rotation_time: self.rotation_time.unwrap_or_else(|| "00:00".to_string()),
            trigger_on_startup: self.trigger_on_startup.unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Trigger Events
// ============================================================================

/// Events emitted by the trigger
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// A daily set was generated (or found already persisted)
    SetGenerated {
        set: DailyProblemSet,
        triggered_at: DateTime<Utc>,
    },

    /// A generation attempt failed; the loop keeps running
    GenerationFailed { date: NaiveDate, message: String },
}

// ============================================================================
// Daily Trigger
// ============================================================================

/// Drives the generator once at startup and once per day
pub struct DailyTrigger {
    config: TriggerConfig,
    generator: Arc<Generator>,
    event_sender: broadcast::Sender<TriggerEvent>,
    is_running: Arc<RwLock<bool>>,
}

impl DailyTrigger {
    /// Create a new daily trigger
    pub fn new(config: TriggerConfig, generator: Arc<Generator>) -> SchedulerResult<Self> {
        config.validate()?;

        let (event_sender, _) = broadcast::channel(16);

        Ok(Self {
            config,
            generator,
            event_sender,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Create with default config
    pub fn with_defaults(generator: Arc<Generator>) -> SchedulerResult<Self> {
        Self::new(TriggerConfig::default(), generator)
    }

    /// Subscribe to trigger events
    pub fn subscribe(&self) -> broadcast::Receiver<TriggerEvent> {
        self.event_sender.subscribe()
    }

    /// Duration until the next rotation instant
    pub fn duration_until_rotation(&self) -> SchedulerResult<Duration> {
        let rotation_time = self.config.parse_rotation_time()?;
        let now = Utc::now();

        let target_today = now.date_naive().and_time(rotation_time).and_utc();

        if now < target_today {
            Ok(target_today.signed_duration_since(now))
        } else {
            let target_tomorrow = target_today + Duration::days(1);
            Ok(target_tomorrow.signed_duration_since(now))
        }
    }

    /// Run one generation for today and broadcast the outcome.
    ///
    /// Failures are logged and emitted as events, never propagated; a
    /// broken archive must not kill the trigger loop.
    pub async fn run_generation(&self) {
        let date = today_utc();
        tracing::info!(date = %date, "Scheduled generation starting");

        match self.generator.generate(Some(date)).await {
            Ok(set) => {
                tracing::info!(date = %date, "Scheduled generation completed");
                let _ = self.event_sender.send(TriggerEvent::SetGenerated {
                    set,
                    triggered_at: Utc::now(),
                });
            }
            Err(e) => {
                tracing::error!(date = %date, error = %e, "Scheduled generation failed");
                let _ = self.event_sender.send(TriggerEvent::GenerationFailed {
                    date,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Start the trigger loop (runs until stopped)
    pub async fn start(&self) -> SchedulerResult<()> {
        *self.is_running.write().await = true;

        if self.config.trigger_on_startup {
            self.run_generation().await;
        }

        while *self.is_running.read().await {
            let sleep_duration = self
                .duration_until_rotation()?
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.run_generation().await;
                }
                _ = self.wait_for_stop() => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop the trigger loop
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    /// Check if the trigger is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    // Internal: Wait for stop signal
    async fn wait_for_stop(&self) {
        loop {
            if !*self.is_running.read().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    /// Get trigger status
    pub async fn status(&self) -> TriggerStatus {
        TriggerStatus {
            is_running: *self.is_running.read().await,
            rotation_time: self.config.rotation_time.clone(),
            seconds_until_rotation: self
                .duration_until_rotation()
                .ok()
                .map(|d| d.num_seconds()),
            generations_in_flight: self.generator.in_flight(),
        }
    }
}

/// Trigger status information
#[derive(Debug, Clone)]
pub struct TriggerStatus {
    pub is_running: bool,
    pub rotation_time: String,
    pub seconds_until_rotation: Option<i64>,
    pub generations_in_flight: usize,
}

impl TriggerStatus {
    /// Format as display string
    pub fn display(&self) -> String {
        let mut output = String::from("Trigger Status\n");
        output.push_str(&format!("{:-<40}\n", ""));
        output.push_str(&format!("Running: {}\n", self.is_running));
        output.push_str(&format!("Rotation Time (UTC): {}\n", self.rotation_time));

        if let Some(secs) = self.seconds_until_rotation {
            let hours = secs / 3600;
            let mins = (secs % 3600) / 60;
            output.push_str(&format!("Until Rotation: {hours}h {mins}m\n"));
        }

        output.push_str(&format!("In Flight: {}\n", self.generations_in_flight));

        output
    }
}

// ============================================================================
// Tests
// ============================================================================
