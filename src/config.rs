use crate::domain::Decimal;
use crate::engine::{CommissionPlan, PrizeSchedule};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub record_store: RecordStoreConfig,
    pub sales_import_csv: Option<String>,
    pub plan: CommissionPlan,
}

/// Where ledger and employee rows are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStoreConfig {
    Sqlite { database_path: String },
    Rest { base_url: String, api_key: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let record_store = match env_map
            .get("RECORD_STORE")
            .map(|s| s.as_str())
            .unwrap_or("sqlite")
        {
            "sqlite" => RecordStoreConfig::Sqlite {
                database_path: required(&env_map, "DATABASE_PATH")?,
            },
            "rest" => RecordStoreConfig::Rest {
                base_url: required(&env_map, "RECORD_STORE_URL")?,
                api_key: required(&env_map, "RECORD_STORE_API_KEY")?,
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "RECORD_STORE".to_string(),
                    format!("must be sqlite or rest, got {}", other),
                ))
            }
        };

        let sales_import_csv = env_map
            .get("SALES_IMPORT_CSV")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let plan = parse_plan_from_map(&env_map)?;

        Ok(Config {
            port,
            record_store,
            sales_import_csv,
            plan,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn decimal_or(
    env_map: &HashMap<String, String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let Some(raw) = env_map.get(key) else {
        return Ok(default);
    };
    let value = Decimal::from_str_canonical(raw).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), "must be a decimal number".to_string())
    })?;
    if value.is_negative() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(value)
}

/// Commission plan with per-variable overrides of the standard terms.
fn parse_plan_from_map(env_map: &HashMap<String, String>) -> Result<CommissionPlan, ConfigError> {
    let d = CommissionPlan::default();
    let p = &d.prizes;

    let prizes = PrizeSchedule {
        fast_start: decimal_or(env_map, "PRIZE_FAST_START", p.fast_start)?,
        fast_middle: decimal_or(env_map, "PRIZE_FAST_MIDDLE", p.fast_middle)?,
        fast_finish: decimal_or(env_map, "PRIZE_FAST_FINISH", p.fast_finish)?,
        same_day_fast_start: decimal_or(env_map, "PRIZE_SAME_DAY_FAST_START", p.same_day_fast_start)?,
        same_day_fast_middle: decimal_or(
            env_map,
            "PRIZE_SAME_DAY_FAST_MIDDLE",
            p.same_day_fast_middle,
        )?,
        same_day_fast_finish: decimal_or(
            env_map,
            "PRIZE_SAME_DAY_FAST_FINISH",
            p.same_day_fast_finish,
        )?,
        top_seller: decimal_or(env_map, "PRIZE_TOP_SELLER", p.top_seller)?,
    };

    Ok(CommissionPlan {
        in_office_rate: decimal_or(env_map, "RATE_IN_OFFICE", d.in_office_rate)?,
        remote_rate: decimal_or(env_map, "RATE_REMOTE", d.remote_rate)?,
        in_office_draw: decimal_or(env_map, "DRAW_IN_OFFICE", d.in_office_draw)?,
        remote_draw: decimal_or(env_map, "DRAW_REMOTE", d.remote_draw)?,
        prizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/paydesk.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.record_store,
            RecordStoreConfig::Sqlite {
                database_path: "/tmp/paydesk.db".to_string()
            }
        );
        assert_eq!(config.plan, CommissionPlan::default());
        assert_eq!(config.sales_import_csv, None);
    }

    #[test]
    fn test_missing_database_path() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_rest_store_requires_url_and_key() {
        let mut env_map = HashMap::new();
        env_map.insert("RECORD_STORE".to_string(), "rest".to_string());
        env_map.insert(
            "RECORD_STORE_URL".to_string(),
            "https://store.example".to_string(),
        );
        match Config::from_env_map(env_map.clone()) {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "RECORD_STORE_API_KEY"),
            _ => panic!("Expected MissingEnv error"),
        }

        env_map.insert("RECORD_STORE_API_KEY".to_string(), "secret".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert!(matches!(config.record_store, RecordStoreConfig::Rest { .. }));
    }

    #[test]
    fn test_invalid_record_store() {
        let mut env_map = setup_required_env();
        env_map.insert("RECORD_STORE".to_string(), "postgres".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "RECORD_STORE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_plan_overrides() {
        let mut env_map = setup_required_env();
        env_map.insert("RATE_REMOTE".to_string(), "0.12".to_string());
        env_map.insert("PRIZE_TOP_SELLER".to_string(), "750".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.plan.remote_rate.to_canonical_string(), "0.12");
        assert_eq!(config.plan.prizes.top_seller, Decimal::from_units(750));
        assert_eq!(config.plan.in_office_rate.to_canonical_string(), "0.14");
    }

    #[test]
    fn test_invalid_plan_values() {
        let mut env_map = setup_required_env();
        env_map.insert("DRAW_IN_OFFICE".to_string(), "lots".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DRAW_IN_OFFICE"),
            _ => panic!("Expected InvalidValue error"),
        }

        let mut env_map = setup_required_env();
        env_map.insert("PRIZE_FAST_START".to_string(), "-1".to_string());
        assert!(Config::from_env_map(env_map).is_err());
    }
}
