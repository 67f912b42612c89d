// ==========================================
// 线索分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use crate::domain::types::WeightPolicy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// DispatchSettings - 分配配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// 新建操作员未指定 load_limit 时的默认值
    pub default_load_limit: i64,
    /// 非正权重处理策略
    pub weight_policy: WeightPolicy,
    /// 是否允许 closed → active
    pub contact_reopen_enabled: bool,
    /// SQLite busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            default_load_limit: defaults::DEFAULT_LOAD_LIMIT,
            weight_policy: WeightPolicy::Ignore,
            contact_reopen_enabled: false,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 全部配置（按 key 排序）
    pub fn list_config(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// 读取并解析配置，缺失或格式错误时回退默认值
    fn get_parsed_or_default<T: FromStr>(&self, key: &str, default: T) -> RepositoryResult<T> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    // ===== 分配相关配置 =====

    pub fn get_default_load_limit(&self) -> RepositoryResult<i64> {
        let limit = self.get_parsed_or_default(config_keys::DEFAULT_LOAD_LIMIT, defaults::DEFAULT_LOAD_LIMIT)?;
        if limit < 0 {
            tracing::warn!(config_key = config_keys::DEFAULT_LOAD_LIMIT, limit, "负数负载上限，使用默认值");
            return Ok(defaults::DEFAULT_LOAD_LIMIT);
        }
        Ok(limit)
    }

    pub fn get_weight_policy(&self) -> RepositoryResult<WeightPolicy> {
        let raw = match self.get_config_value(config_keys::WEIGHT_POLICY)? {
            Some(v) => v,
            None => return Ok(WeightPolicy::default()),
        };
        Ok(WeightPolicy::from_str(&raw).unwrap_or_else(|| {
            tracing::warn!(config_key = config_keys::WEIGHT_POLICY, raw_value = %raw, "未知权重策略，使用 IGNORE");
            WeightPolicy::default()
        }))
    }

    pub fn get_contact_reopen_enabled(&self) -> RepositoryResult<bool> {
        self.get_parsed_or_default(config_keys::CONTACT_REOPEN_ENABLED, false)
    }

    pub fn get_busy_timeout_ms(&self) -> RepositoryResult<u64> {
        self.get_parsed_or_default(config_keys::BUSY_TIMEOUT_MS, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// 加载完整配置快照
    pub fn load_settings(&self) -> RepositoryResult<DispatchSettings> {
        Ok(DispatchSettings {
            default_load_limit: self.get_default_load_limit()?,
            weight_policy: self.get_weight_policy()?,
            contact_reopen_enabled: self.get_contact_reopen_enabled()?,
            busy_timeout_ms: self.get_busy_timeout_ms()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const DEFAULT_LOAD_LIMIT: &str = "default_load_limit";
    pub const WEIGHT_POLICY: &str = "non_positive_weight_policy"; // IGNORE / REJECT
    pub const CONTACT_REOPEN_ENABLED: &str = "contact_reopen_enabled";
    pub const BUSY_TIMEOUT_MS: &str = "busy_timeout_ms";
}

pub mod defaults {
    pub const DEFAULT_LOAD_LIMIT: i64 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::session::Database;

    fn manager() -> ConfigManager {
        let db = Database::open_in_memory().unwrap();
        ConfigManager::from_connection(db.shared_connection()).unwrap()
    }

    #[test]
    fn test_defaults_when_table_empty() {
        let settings = manager().load_settings().unwrap();
        assert_eq!(settings, DispatchSettings::default());
        assert_eq!(settings.default_load_limit, 10);
    }

    #[test]
    fn test_overrides_are_read_back() {
        let cm = manager();
        cm.set_config_value(config_keys::DEFAULT_LOAD_LIMIT, "3").unwrap();
        cm.set_config_value(config_keys::WEIGHT_POLICY, "reject").unwrap();
        cm.set_config_value(config_keys::CONTACT_REOPEN_ENABLED, "true").unwrap();

        let settings = cm.load_settings().unwrap();
        assert_eq!(settings.default_load_limit, 3);
        assert_eq!(settings.weight_policy, WeightPolicy::Reject);
        assert!(settings.contact_reopen_enabled);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let cm = manager();
        cm.set_config_value(config_keys::DEFAULT_LOAD_LIMIT, "many").unwrap();
        cm.set_config_value(config_keys::WEIGHT_POLICY, "sometimes").unwrap();
        cm.set_config_value(config_keys::BUSY_TIMEOUT_MS, "-1").unwrap();

        let settings = cm.load_settings().unwrap();
        assert_eq!(settings, DispatchSettings::default());
    }

    #[test]
    fn test_set_overwrites_existing_key() {
        let cm = manager();
        cm.set_config_value(config_keys::DEFAULT_LOAD_LIMIT, "3").unwrap();
        cm.set_config_value(config_keys::DEFAULT_LOAD_LIMIT, "4").unwrap();

        let all = cm.list_config().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get(config_keys::DEFAULT_LOAD_LIMIT).map(String::as_str), Some("4"));
    }
}
