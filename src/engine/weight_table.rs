// ==========================================
// 线索分配系统 - 权重表
// ==========================================
// 职责: 维护 (操作员, 来源) → 权重
// 规则: 每对至多一行，重复设置覆盖旧值
// 非正权重: IGNORE 落库但不参与选择；REJECT 直接拒绝
// ==========================================

use crate::domain::{OperatorSourceWeight, WeightPolicy};
use crate::engine::error::{DispatchError, DispatchResult};
use crate::repository::store::{OperatorStore, SourceStore, WeightStore};
use tracing::{info, instrument, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct WeightTable {
    policy: WeightPolicy,
}

impl WeightTable {
    pub fn new(policy: WeightPolicy) -> Self {
        Self { policy }
    }

    /// 设置权重（UPSERT）
    #[instrument(skip(self, store))]
    pub fn set_weight<S>(
        &self,
        store: &S,
        operator_id: i64,
        source_id: i64,
        weight: i64,
    ) -> DispatchResult<OperatorSourceWeight>
    where
        S: OperatorStore + SourceStore + WeightStore + ?Sized,
    {
        if store.find_operator(operator_id)?.is_none() {
            return Err(DispatchError::OperatorNotFound { operator_id });
        }
        if store.find_source(source_id)?.is_none() {
            return Err(DispatchError::SourceNotFound { source_id });
        }

        if weight <= 0 {
            match self.policy {
                WeightPolicy::Reject => {
                    return Err(DispatchError::InvalidWeight {
                        operator_id,
                        source_id,
                        weight,
                    })
                }
                WeightPolicy::Ignore => {
                    warn!("非正权重已保存，该操作员不会从此来源获得分配");
                }
            }
        }

        let row = store.upsert_weight(operator_id, source_id, weight)?;
        info!(weight_id = row.id, "权重已设置");
        Ok(row)
    }

    /// 来源下的全部权重行
    pub fn weights_for_source<S>(&self, store: &S, source_id: i64) -> DispatchResult<Vec<OperatorSourceWeight>>
    where
        S: SourceStore + WeightStore + ?Sized,
    {
        if store.find_source(source_id)?.is_none() {
            return Err(DispatchError::SourceNotFound { source_id });
        }
        Ok(store.list_weights_for_source(source_id)?)
    }
}
