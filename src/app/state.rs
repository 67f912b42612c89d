// ==========================================
// 线索分配系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::{ConfigApi, ContactApi, LeadApi, OperatorApi, SourceApi, StatsApi};
use crate::config::config_manager::{ConfigManager, DispatchSettings};
use crate::db::configure_sqlite_connection_with_timeout;
use crate::engine::{
    Clock, DispatchOrchestrator, RandomSource, SystemClock, ThreadRandom,
};
use crate::repository::session::Database;

/// 应用状态
///
/// 所有 API 共享同一个 Database 句柄
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时读取的配置快照
    pub settings: DispatchSettings,

    pub database: Database,

    pub operator_api: Arc<OperatorApi>,
    pub source_api: Arc<SourceApi>,
    pub contact_api: Arc<ContactApi>,
    pub lead_api: Arc<LeadApi>,
    pub stats_api: Arc<StatsApi>,
    pub config_api: Arc<ConfigApi>,

    pub orchestrator: Arc<DispatchOrchestrator>,
}

impl AppState {
    /// 创建新的AppState实例（线程随机源 + 系统时钟）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_components(db_path, Arc::new(ThreadRandom), Arc::new(SystemClock))
    }

    /// 指定随机源与时钟创建（演示数据、测试用）
    ///
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 读取配置快照并应用 busy_timeout
    /// 3. 创建编排器与所有API实例
    pub fn with_components(
        db_path: String,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let database = Database::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;

        let config_manager = Arc::new(
            ConfigManager::from_connection(database.shared_connection())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = config_manager
            .load_settings()
            .map_err(|e| format!("无法加载配置: {}", e))?;

        {
            let conn = database.shared_connection();
            let guard = conn.lock().map_err(|e| format!("数据库锁获取失败: {}", e))?;
            configure_sqlite_connection_with_timeout(&guard, settings.busy_timeout_ms)
                .map_err(|e| format!("无法设置 busy_timeout: {}", e))?;
        }
        tracing::debug!(?settings, "配置快照已加载");

        // ==========================================
        // 引擎编排
        // ==========================================
        let orchestrator = Arc::new(
            DispatchOrchestrator::new(database.clone(), random, clock)
                .with_reopen_enabled(settings.contact_reopen_enabled),
        );

        // ==========================================
        // API层
        // ==========================================
        let operator_api = Arc::new(OperatorApi::new(database.clone(), settings.default_load_limit));
        let source_api = Arc::new(SourceApi::new(database.clone(), settings.weight_policy));
        let contact_api = Arc::new(ContactApi::new(database.clone(), orchestrator.clone()));
        let lead_api = Arc::new(LeadApi::new(database.clone(), orchestrator.clone()));
        let stats_api = Arc::new(StatsApi::new(database.clone()));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            settings,
            database,
            operator_api,
            source_api,
            contact_api,
            lead_api,
            stats_api,
            config_api,
            orchestrator,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 LEAD_DISPATCH_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("LEAD_DISPATCH_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./lead_dispatch.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("lead-dispatch");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("lead_dispatch.db");
        }
    }

    path.to_string_lossy().to_string()
}
