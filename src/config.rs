use std::path::PathBuf;

use anyhow::Context;

use crate::catalog::CriteriaCatalog;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub criteria_path: Option<PathBuf>,
    pub max_connections: u32,
}

impl Config {
    /// Reads settings from the environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to a production Postgres instance")?;
        let criteria_path = std::env::var_os("EVAL_CRITERIA_PATH").map(PathBuf::from);
        let max_connections = match std::env::var("EVAL_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("EVAL_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            criteria_path,
            max_connections,
        })
    }

    pub fn load_catalog(&self) -> anyhow::Result<CriteriaCatalog> {
        match &self.criteria_path {
            Some(path) => CriteriaCatalog::from_json_file(path),
            None => Ok(CriteriaCatalog::default()),
        }
    }
}
