use crate::transaction::TransactionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default chunk size for reading result bodies
pub const DEFAULT_READ_BUFFER_SIZE: usize = 100 * 1024;

/// Flat settings shape, as loaded from a configuration file
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Scheme and host, e.g. `http://localhost`
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub user: String,
    pub password: String,
    pub transaction_kind: TransactionKind,
    /// Bytes read from a result body per chunk
    pub read_buffer_size: usize,
    /// Reasoning flag sent when beginning remote transactions
    pub reasoning: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            database_host: "http://localhost".to_string(),
            database_port: 5820,
            database_name: String::new(),
            user: "admin".to_string(),
            password: "admin".to_string(),
            transaction_kind: TransactionKind::Remote,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            reasoning: false,
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("database_host", &self.database_host)
            .field("database_port", &self.database_port)
            .field("database_name", &self.database_name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("transaction_kind", &self.transaction_kind)
            .field("read_buffer_size", &self.read_buffer_size)
            .field("reasoning", &self.reasoning)
            .finish()
    }
}

/// Immutable client configuration with the endpoint URLs derived once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClientSettings", into = "ClientSettings")]
pub struct ClientConfig {
    settings: ClientSettings,
    query_url: String,
    update_url: String,
    database_base_path: String,
    transaction_base_url: String,
}

impl ClientConfig {
    pub fn new(host: &str, port: u16, database: &str) -> Self {
        ClientSettings {
            database_host: host.to_string(),
            database_port: port,
            database_name: database.to_string(),
            ..ClientSettings::default()
        }
        .into()
    }

    pub fn with_credentials(self, user: &str, password: &str) -> Self {
        ClientSettings {
            user: user.to_string(),
            password: password.to_string(),
            ..self.settings
        }
        .into()
    }

    pub fn with_transaction_kind(self, transaction_kind: TransactionKind) -> Self {
        ClientSettings {
            transaction_kind,
            ..self.settings
        }
        .into()
    }

    pub fn with_read_buffer_size(self, read_buffer_size: usize) -> Self {
        ClientSettings {
            read_buffer_size,
            ..self.settings
        }
        .into()
    }

    pub fn with_reasoning(self, reasoning: bool) -> Self {
        ClientSettings {
            reasoning,
            ..self.settings
        }
        .into()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn user(&self) -> &str {
        &self.settings.user
    }

    pub fn password(&self) -> &str {
        &self.settings.password
    }

    pub fn transaction_kind(&self) -> TransactionKind {
        self.settings.transaction_kind
    }

    pub fn read_buffer_size(&self) -> usize {
        self.settings.read_buffer_size
    }

    pub fn reasoning(&self) -> bool {
        self.settings.reasoning
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }

    pub fn database_base_path(&self) -> &str {
        &self.database_base_path
    }

    pub fn transaction_base_url(&self) -> &str {
        &self.transaction_base_url
    }
}

impl From<ClientSettings> for ClientConfig {
    fn from(settings: ClientSettings) -> Self {
        let database_base_path = format!(
            "{}:{}/{}",
            settings.database_host.trim_end_matches('/'),
            settings.database_port,
            settings.database_name
        );
        Self {
            query_url: format!("{}/query", database_base_path),
            update_url: format!("{}/update", database_base_path),
            transaction_base_url: format!("{}/transaction", database_base_path),
            database_base_path,
            settings,
        }
    }
}

impl From<ClientConfig> for ClientSettings {
    fn from(config: ClientConfig) -> Self {
        config.settings
    }
}
