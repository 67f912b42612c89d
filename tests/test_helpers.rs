// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、基础数据写入等功能
// ==========================================
#![allow(dead_code)]

use lead_dispatch::domain::{Operator, Source};
use lead_dispatch::engine::{Clock, DispatchOrchestrator, RandomSource, SystemClock};
use lead_dispatch::repository::store::{OperatorStore, SourceStore, WeightStore};
use lead_dispatch::repository::{Database, RepositoryResult};
use std::error::Error;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    lead_dispatch::logging::init_test();
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    // 打开即建表
    Database::open(&db_path)?;

    Ok((temp_file, db_path))
}

/// 写入一个操作员
pub fn seed_operator(db: &Database, name: &str, load_limit: i64) -> Operator {
    db.write(|s| s.insert_operator(name, load_limit)).unwrap()
}

/// 写入一个来源
pub fn seed_source(db: &Database, name: &str) -> Source {
    db.write(|s| s.insert_source(name, None)).unwrap()
}

/// 设置权重
pub fn seed_weight(db: &Database, operator_id: i64, source_id: i64, weight: i64) {
    db.write(|s| -> RepositoryResult<()> {
        s.upsert_weight(operator_id, source_id, weight)?;
        Ok(())
    })
    .unwrap();
}

/// 基于指定随机源创建编排器
pub fn orchestrator_with(db: &Database, random: Arc<dyn RandomSource>) -> DispatchOrchestrator {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    DispatchOrchestrator::new(db.clone(), random, clock)
}
