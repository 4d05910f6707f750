use orders_api_core::keys::DEFAULT_ORDER_STATUS_INDEX;

pub const TABLE_NAME_VAR: &str = "SINGLE_TABLE_DDB";
pub const STATUS_INDEX_VAR: &str = "ORDER_STATUS_INDEX";
pub const ENDPOINT_VAR: &str = "DYNAMODB_ENDPOINT";

/// Settings read once per cold start. Region and credentials come from the
/// AWS SDK default chain, not from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub table_name: String,
    pub status_index: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            table_name: non_blank(TABLE_NAME_VAR).ok_or(ConfigError::Missing(TABLE_NAME_VAR))?,
            status_index: non_blank(STATUS_INDEX_VAR)
                .unwrap_or_else(|| DEFAULT_ORDER_STATUS_INDEX.to_string()),
            endpoint: non_blank(ENDPOINT_VAR),
        })
    }
}
