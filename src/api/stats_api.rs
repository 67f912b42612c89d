// ==========================================
// 线索分配系统 - 统计 API
// ==========================================
// 口径: 全部状态的接触计数，无接触的操作员/来源计 0
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{OperatorStats, SourceStats};
use crate::repository::session::Database;
use crate::repository::store::StatsStore;

pub struct StatsApi {
    db: Database,
}

impl StatsApi {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn stats_by_operator(&self) -> ApiResult<Vec<OperatorStats>> {
        Ok(self.db.read(|s| s.operator_contact_stats())?)
    }

    pub fn stats_by_source(&self) -> ApiResult<Vec<SourceStats>> {
        Ok(self.db.read(|s| s.source_contact_stats())?)
    }
}
