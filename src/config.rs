use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL. Accounts are kept in memory when unset.
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Values of the protected account (id 1) inserted on bootstrap
    #[serde(default)]
    pub seed_account: SeedAccountConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeedAccountConfig {
    pub agency: i64,
    pub number: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Default for SeedAccountConfig {
    fn default() -> Self {
        Self {
            agency: 1,
            number: 1,
            balance: Decimal::new(0, 2),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`. `DATABASE_URL` takes precedence over `postgres_url`.
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path))?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.postgres_url = Some(url);
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn bind_addr(&self, port_override: Option<u16>) -> String {
        format!(
            "{}:{}",
            self.gateway.host,
            port_override.unwrap_or(self.gateway.port)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
log_level: info
log_dir: ./logs
log_file: account_api.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 8080
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert!(config.postgres_url.is_none());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.seed_account.agency, 1);
        assert_eq!(config.seed_account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_seed_account_override() {
        let yaml = format!(
            "{}postgres_url: postgresql://localhost/accounts\nseed_account:\n  agency: 33\n  number: 1000\n  balance: 12.5\n",
            MINIMAL
        );
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(
            config.postgres_url.as_deref(),
            Some("postgresql://localhost/accounts")
        );
        assert_eq!(config.seed_account.agency, 33);
        assert_eq!(config.seed_account.number, 1000);
        assert_eq!(config.seed_account.balance, Decimal::new(125, 1));
    }

    #[test]
    fn test_bind_addr_port_override() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.bind_addr(None), "0.0.0.0:8080");
        assert_eq!(config.bind_addr(Some(9090)), "0.0.0.0:9090");
    }

    #[test]
    fn test_missing_gateway_section_fails() {
        let yaml = "log_level: info\nlog_dir: .\nlog_file: a.log\nuse_json: false\nrotation: never\n";
        assert!(AppConfig::from_yaml(yaml).is_err());
    }
}
