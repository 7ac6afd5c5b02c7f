//! Client configuration persistence.

use chat_core::ports::StoragePort;
use chat_types::{ChatError, Result, config::ClientConfig};

pub(crate) const CONFIG_STORAGE_KEY: &str = "chat:config";

/// Resolve the configuration for a new client.
///
/// An explicit override wins and is persisted; otherwise the stored copy is
/// used, and anything unreadable falls back to defaults.
pub(crate) async fn load_config(
    storage: &dyn StoragePort,
    override_json: Option<&str>,
) -> Result<ClientConfig> {
    if let Some(json) = override_json {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|e| ChatError::Config(e.to_string()))?;
        save_config(storage, &config).await;
        return Ok(config);
    }

    match storage.get(CONFIG_STORAGE_KEY).await {
        Ok(Some(data)) => match serde_json::from_str::<ClientConfig>(&data) {
            Ok(config) => {
                log::info!("Config restored from storage");
                Ok(config)
            }
            Err(e) => {
                log::warn!("Stored config unreadable ({}), using defaults", e);
                Ok(ClientConfig::default())
            }
        },
        Ok(None) => Ok(ClientConfig::default()),
        Err(e) => {
            log::warn!("Config restore failed: {}", e);
            Ok(ClientConfig::default())
        }
    }
}

pub(crate) async fn save_config(storage: &dyn StoragePort, config: &ClientConfig) {
    match serde_json::to_string(config) {
        Ok(json) => match storage.set(CONFIG_STORAGE_KEY, &json).await {
            Ok(()) => log::info!("Config saved to storage"),
            Err(e) => log::warn!("Config save failed: {}", e),
        },
        Err(e) => log::warn!("Config not serializable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_platform::storage::MemoryStorage;
    use chat_types::config::SendMode;
    use futures::executor::block_on;

    #[test]
    fn defaults_when_nothing_stored() {
        let storage = MemoryStorage::new();
        let config = block_on(load_config(&storage, None)).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn override_is_persisted() {
        let storage = MemoryStorage::new();
        let json = r#"{"session":{"mode":"buffered"}}"#;
        let config = block_on(load_config(&storage, Some(json))).unwrap();
        assert_eq!(config.session.mode, SendMode::Buffered);

        let restored = block_on(load_config(&storage, None)).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn bad_override_is_an_error() {
        let storage = MemoryStorage::new();
        let err = block_on(load_config(&storage, Some("{not json"))).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn corrupt_stored_config_falls_back() {
        let storage = MemoryStorage::new();
        block_on(storage.set(CONFIG_STORAGE_KEY, "][")).unwrap();
        let config = block_on(load_config(&storage, None)).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
