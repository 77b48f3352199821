use anyhow::Result;
use chrono::NaiveDate;

use crate::config::Config;
use crate::generator::{today_utc, Generator};

/// Generate (or look up) the problem set for one date
pub async fn generate(config: Config, date: Option<NaiveDate>) -> Result<()> {
    let target = date.unwrap_or_else(today_utc);

    println!("Daily Problem Set Generation");
    println!("============================");
    println!("  Date: {target}");

    let (archive, store) = super::build_services(&config)?;
    let generator = Generator::new(config.generator.clone(), archive, store);

    let set = generator
        .generate(Some(target))
        .await
        .map_err(|e| anyhow::anyhow!("Generation failed: {e}"))?;

    println!();
    println!(
        "  easy:   {} (rating {})",
        set.easy.key(),
        set.easy.rating
    );
    println!(
        "  medium: {} (rating {})",
        set.medium.key(),
        set.medium.rating
    );
    println!(
        "  hard:   {} (rating {})",
        set.hard.key(),
        set.hard.rating
    );

    Ok(())
}
