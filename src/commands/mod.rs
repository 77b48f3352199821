pub mod generate;
pub mod progress;
pub mod serve;

// Re-export command functions for convenience
pub use generate::generate;
pub use progress::progress;
pub use serve::serve;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::archive::ArchiveClient;
use crate::config::Config;
use crate::storage::{create_sqlite_repository, SharedProblemSetRepository};

/// Build the shared services every command needs
pub(crate) fn build_services(
    config: &Config,
) -> Result<(Arc<ArchiveClient>, SharedProblemSetRepository)> {
    let archive = Arc::new(
        ArchiveClient::new(&config.archive).context("Failed to create archive client")?,
    );
    let store = create_sqlite_repository(&config.database.sqlite_path)
        .context("Failed to open problem set database")?;
    Ok((archive, store))
}
