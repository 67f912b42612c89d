// ==========================================
// 线索分配系统 - 来源与权重 API
// ==========================================
// 职责: 来源登记/查询，(操作员, 来源) 权重维护
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::validator::{optional_non_blank, require_non_blank};
use crate::domain::{OperatorSourceWeight, Source, WeightPolicy};
use crate::engine::weight_table::WeightTable;
use crate::repository::session::Database;
use crate::repository::store::SourceStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCreate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSet {
    pub operator_id: i64,
    pub source_id: i64,
    pub weight: i64,
}

// ==========================================
// SourceApi - 来源与权重 API
// ==========================================
pub struct SourceApi {
    db: Database,
    weights: WeightTable,
}

impl SourceApi {
    pub fn new(db: Database, weight_policy: WeightPolicy) -> Self {
        Self {
            db,
            weights: WeightTable::new(weight_policy),
        }
    }

    /// 登记来源
    ///
    /// name、code（给出时）均唯一，重复时返回 BusinessRuleViolation
    pub fn create_source(&self, req: &SourceCreate) -> ApiResult<Source> {
        require_non_blank("name", &req.name)?;
        optional_non_blank("code", req.code.as_deref())?;

        let source = self
            .db
            .write(|s| s.insert_source(req.name.trim(), req.code.as_deref().map(str::trim)))?;
        info!(source_id = source.id, source_name = %source.name, "来源已登记");
        Ok(source)
    }

    pub fn list_sources(&self) -> ApiResult<Vec<Source>> {
        Ok(self.db.read(|s| s.list_sources())?)
    }

    /// 设置权重（按 (operator_id, source_id) 覆盖）
    pub fn set_weight(&self, req: &WeightSet) -> ApiResult<OperatorSourceWeight> {
        Ok(self.db.write(|s| {
            self.weights
                .set_weight(s, req.operator_id, req.source_id, req.weight)
        })?)
    }

    /// 来源下的全部权重行（含非正权重）
    pub fn list_weights_for_source(&self, source_id: i64) -> ApiResult<Vec<OperatorSourceWeight>> {
        Ok(self
            .db
            .read(|s| self.weights.weights_for_source(s, source_id))?)
    }
}
