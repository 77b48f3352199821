use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::generator::Generator;
use crate::scheduler::{DailyTrigger, TriggerConfig};

/// Run the daily generation loop until interrupted
pub async fn serve(
    config: Config,
    rotation_time: Option<String>,
    no_startup: bool,
) -> Result<()> {
    let (archive, store) = super::build_services(&config)?;
    let generator = Arc::new(Generator::new(config.generator.clone(), archive, store));

    let mut builder = TriggerConfig::builder().trigger_on_startup(!no_startup);
    if let Some(time) = rotation_time {
        builder = builder.rotation_time(time);
    }
    let trigger_config = builder.build().context("Invalid trigger configuration")?;

    let trigger =
        DailyTrigger::new(trigger_config, generator).context("Failed to create daily trigger")?;

    println!("{}", trigger.status().await.display());

    tokio::select! {
        result = trigger.start() => {
            result.context("Trigger loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received, shutting down");
            trigger.stop().await;
        }
    }

    Ok(())
}
