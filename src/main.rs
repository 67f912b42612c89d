// ==========================================
// 线索分配系统 - 主入口
// ==========================================
// 行为: 初始化日志 → 打开默认数据库 → 打印 schema 版本与当前统计
// 环境变量:
// - LEAD_DISPATCH_DB_PATH: 数据库路径
// - LEAD_DISPATCH_LOG_JSON: 非空时输出 JSON 日志
// ==========================================

use std::process::ExitCode;

use lead_dispatch::app::{get_default_db_path, AppState};
use lead_dispatch::db::read_schema_version;
use lead_dispatch::logging;

fn main() -> ExitCode {
    let json_logs = std::env::var("LEAD_DISPATCH_LOG_JSON")
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    if json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", lead_dispatch::APP_NAME, lead_dispatch::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = print_summary(&state) {
        tracing::error!("读取统计失败: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_summary(state: &AppState) -> anyhow::Result<()> {
    let version = {
        let conn = state.database.shared_connection();
        let guard = conn
            .lock()
            .map_err(|e| anyhow::anyhow!("数据库锁获取失败: {}", e))?;
        read_schema_version(&guard)?
    };
    println!("schema_version: {}", version.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()));
    println!("settings: {}", serde_json::to_string(&state.settings)?);

    println!("contacts by operator:");
    for row in state.stats_api.stats_by_operator()? {
        println!("  {:>4}  {:<20} {}", row.operator_id, row.operator_name, row.contacts_count);
    }
    println!("contacts by source:");
    for row in state.stats_api.stats_by_source()? {
        println!("  {:>4}  {:<20} {}", row.source_id, row.source_name, row.contacts_count);
    }
    Ok(())
}
