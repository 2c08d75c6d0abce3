// src/config.rs

use crate::db::{self, StoreKind};
use crate::error::Result;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub address: Ipv4Addr,
    pub port: u16,
    pub log_level: String,
    pub store: StoreKind,
    pub data_path: Option<PathBuf>,
    pub admin_user: String,
    pub admin_password: String,
    pub operators_file: Option<PathBuf>,
}

impl Config {
    /// Defaults, then `worklog.toml` if present, then `WORKLOG_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 3000u16)?
            .set_default("log_level", "info")?
            .set_default("store", "json")?
            .set_default("admin_user", "admin")?
            .set_default("admin_password", "admin")?
            .add_source(config::File::with_name("worklog").required(false))
            .add_source(config::Environment::with_prefix("WORKLOG"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Configured data file, or the per-user default for the store kind.
    pub fn resolve_data_path(&self) -> Result<PathBuf> {
        match &self.data_path {
            Some(p) => Ok(p.clone()),
            None => db::get_default_path(self.store),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: Ipv4Addr::new(127, 0, 0, 1),
            port: 3000u16,
            log_level: String::from("info"),
            store: StoreKind::Json,
            data_path: None,
            admin_user: String::from("admin"),
            admin_password: String::from("admin"),
            operators_file: None,
        }
    }
}
