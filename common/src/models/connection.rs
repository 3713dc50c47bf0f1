//! Connection descriptor models.
//!
//! Credentials are supplied by the user per connect request and are never
//! persisted.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Port used when the request does not carry one.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Request body for opening the shared connection pool.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct ConnectRequest {
    /// Database host, trimmed.
    #[validate(length(min = 1, message = "Host is required"))]
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    pub host: String,
    /// Database port; accepts a number or a numeric string.
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
    /// Database user, trimmed.
    #[validate(length(min = 1, message = "User is required"))]
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    pub user: String,
    /// Database password.
    #[serde(default)]
    pub password: String,
    /// Default schema; empty means none.
    #[serde(default)]
    pub database: String,
}

impl ConnectRequest {
    /// Port to connect to.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_MYSQL_PORT)
    }

    /// Default schema, if one was given.
    pub fn database(&self) -> Option<&str> {
        let database = self.database.trim();
        (!database.is_empty()).then_some(database)
    }
}

impl std::fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(value.trim().to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortInput {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PortInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortInput::Number(port)) => Ok(Some(port)),
        Some(PortInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortInput::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port: {}", text))),
    }
}

/// Result of a successful connect.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionStatus {
    /// Human-readable status message.
    pub message: String,
    /// Connected host.
    pub host: String,
    /// Connected port.
    pub port: u16,
    /// Default schema, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_accepts_string_and_number() {
        let from_text: ConnectRequest = serde_json::from_str(
            r#"{"host":"localhost","port":"3307","user":"root","password":"","database":"xyz_company"}"#,
        )
        .unwrap();
        assert_eq!(from_text.port_or_default(), 3307);

        let from_number: ConnectRequest =
            serde_json::from_str(r#"{"host":"localhost","port":3308,"user":"root"}"#).unwrap();
        assert_eq!(from_number.port_or_default(), 3308);
    }

    #[test]
    fn test_missing_port_uses_default() {
        let req: ConnectRequest =
            serde_json::from_str(r#"{"host":"db","port":"","user":"root"}"#).unwrap();
        assert_eq!(req.port_or_default(), DEFAULT_MYSQL_PORT);
        assert_eq!(req.database(), None);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = serde_json::from_str::<ConnectRequest>(
            r#"{"host":"db","port":"abc","user":"root"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_requires_host_and_user() {
        let req: ConnectRequest = serde_json::from_str(r#"{"host":"","user":""}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("host"));
        assert!(fields.contains_key("user"));
    }

    #[test]
    fn test_blank_host_is_rejected_after_trim() {
        let req: ConnectRequest =
            serde_json::from_str(r#"{"host":"   ","user":" root ","password":""}"#).unwrap();
        assert_eq!(req.host, "");
        assert_eq!(req.user, "root");
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("host"));
        assert!(!errors.field_errors().contains_key("user"));
    }

    #[test]
    fn test_debug_hides_password() {
        let req: ConnectRequest =
            serde_json::from_str(r#"{"host":"db","user":"root","password":"hunter2"}"#).unwrap();
        let printed = format!("{:?}", req);
        assert!(!printed.contains("hunter2"));
    }
}
