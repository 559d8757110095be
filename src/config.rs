use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsdaConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.nal.usda.gov/fdc/v1".into(),
            page_size: 15,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub usda: UsdaConfig,
    pub store_backend: StoreBackend,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "macrotrack".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "macrotrack-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };

        let defaults = UsdaConfig::default();
        let usda = UsdaConfig {
            api_key: std::env::var("USDA_API_KEY").ok(),
            base_url: std::env::var("USDA_BASE_URL").unwrap_or(defaults.base_url),
            page_size: env_parse("USDA_PAGE_SIZE").unwrap_or(defaults.page_size),
            timeout_secs: env_parse("USDA_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        };

        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres,
            Ok(other) => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        };

        Ok(Self {
            database_url,
            jwt,
            usda,
            store_backend,
        })
    }
}
