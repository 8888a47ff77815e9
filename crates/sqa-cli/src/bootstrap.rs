use anyhow::Context;
use sqa_config::ScreenQaConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration (plus `--config` if given).
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ScreenQaConfig> {
    load_dotenv()?;

    match &flags.config {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            ScreenQaConfig::load_with_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => ScreenQaConfig::load().context("failed to load configuration"),
    }
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(anyhow::Error::from(error).context("failed to load .env file")),
    }
}
