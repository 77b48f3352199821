use anyhow::Result;
use chrono::NaiveDate;

use crate::config::Config;
use crate::generator::today_utc;
use crate::models::DayProgress;
use crate::progress::ProgressTracker;

fn mark(solved: bool) -> &'static str {
    if solved {
        "yes"
    } else {
        "no"
    }
}

fn print_row(progress: &DayProgress) {
    println!(
        "  {}  easy: {:<3} medium: {:<3} hard: {:<3}",
        progress.date,
        mark(progress.easy),
        mark(progress.medium),
        mark(progress.hard)
    );
}

/// Show a user's solve progress for a date or a date range
pub async fn progress(
    config: Config,
    handle: String,
    date: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    sync: bool,
) -> Result<()> {
    println!("Solve Progress for {handle}");
    println!("===========================");

    let page_size = config.generator.submission_page_size;
    let (archive, store) = super::build_services(&config)?;

    if !archive.validate_handle(&handle).await? {
        anyhow::bail!("Unknown handle: {handle}");
    }

    let tracker = ProgressTracker::new(archive, store, page_size);

    match (from, to) {
        (Some(from), Some(to)) => {
            let rows = tracker.for_range(&handle, from, to, sync).await?;
            if rows.is_empty() {
                println!("  No problem sets in {from}..{to}");
            }
            for row in &rows {
                print_row(row);
            }
        }
        (None, None) => {
            let target = date.unwrap_or_else(today_utc);
            let row = if sync {
                tracker.sync(&handle, target).await?
            } else {
                tracker.for_date(&handle, target, false).await?
            };
            print_row(&row);
        }
        _ => anyhow::bail!("--from and --to must be given together"),
    }

    Ok(())
}
