// ==========================================
// 线索分配系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新
// 说明: 分配相关配置在构建 AppState 时读取快照，更新后于下次构建生效
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager, DispatchSettings};
use crate::domain::WeightPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有已覆写的配置（按 key 排序）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let items = self
            .config_manager
            .list_config()?
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect();
        Ok(items)
    }

    /// 当前生效值（缺省项取默认值）
    pub fn get_settings(&self) -> ApiResult<DispatchSettings> {
        Ok(self.config_manager.load_settings()?)
    }

    /// 更新单个配置
    ///
    /// 只接受已知 key，值格式不合法时拒绝写入
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let value = value.trim();
        let valid = match key {
            config_keys::DEFAULT_LOAD_LIMIT => value.parse::<i64>().map(|v| v >= 0).unwrap_or(false),
            config_keys::WEIGHT_POLICY => WeightPolicy::from_str(value).is_some(),
            config_keys::CONTACT_REOPEN_ENABLED => value.parse::<bool>().is_ok(),
            config_keys::BUSY_TIMEOUT_MS => value.parse::<u64>().is_ok(),
            _ => return Err(ApiError::InvalidInput(format!("未知配置项: {}", key))),
        };
        if !valid {
            return Err(ApiError::InvalidInput(format!(
                "配置值不合法: {}={}",
                key, value
            )));
        }

        self.config_manager.set_config_value(key, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::session::Database;

    fn api() -> ConfigApi {
        let db = Database::open_in_memory().unwrap();
        ConfigApi::new(Arc::new(
            ConfigManager::from_connection(db.shared_connection()).unwrap(),
        ))
    }

    #[test]
    fn test_update_and_read_back() {
        let api = api();
        api.update_config(config_keys::WEIGHT_POLICY, "reject").unwrap();
        api.update_config(config_keys::DEFAULT_LOAD_LIMIT, " 4 ").unwrap();

        let settings = api.get_settings().unwrap();
        assert_eq!(settings.weight_policy, WeightPolicy::Reject);
        assert_eq!(settings.default_load_limit, 4);

        let items = api.list_configs().unwrap();
        assert_eq!(
            items,
            vec![
                ConfigItem {
                    key: config_keys::DEFAULT_LOAD_LIMIT.to_string(),
                    value: "4".to_string()
                },
                ConfigItem {
                    key: config_keys::WEIGHT_POLICY.to_string(),
                    value: "reject".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_key_and_bad_value() {
        let api = api();
        assert!(matches!(
            api.update_config("colour", "blue"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.update_config(config_keys::DEFAULT_LOAD_LIMIT, "-3"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.update_config(config_keys::CONTACT_REOPEN_ENABLED, "yes"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(api.list_configs().unwrap().is_empty());
    }
}
