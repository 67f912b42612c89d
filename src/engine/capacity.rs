// ==========================================
// 线索分配系统 - 负载追踪
// ==========================================
// 口径: 操作员当前负载 = 其名下 status=ACTIVE 的接触数
// 不缓存，始终以调用方事务内的数据为准
// ==========================================

use crate::domain::{Operator, WeightedCandidate};
use crate::repository::error::RepositoryResult;
use crate::repository::store::ContactStore;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityTracker;

impl CapacityTracker {
    pub fn new() -> Self {
        Self
    }

    /// 操作员当前处理中的接触数（未知操作员返回 0）
    pub fn active_count<S>(&self, store: &S, operator_id: i64) -> RepositoryResult<i64>
    where
        S: ContactStore + ?Sized,
    {
        store.count_active_contacts(operator_id)
    }

    /// 操作员是否还能再接一个接触
    pub fn has_capacity<S>(&self, store: &S, operator: &Operator) -> RepositoryResult<bool>
    where
        S: ContactStore + ?Sized,
    {
        let active = self.active_count(store, operator.id)?;
        Ok(operator.has_capacity_for(active))
    }

    /// 过滤出未满载的候选，保持原有顺序
    pub fn retain_with_capacity<S>(
        &self,
        store: &S,
        candidates: Vec<WeightedCandidate>,
    ) -> RepositoryResult<Vec<WeightedCandidate>>
    where
        S: ContactStore + ?Sized,
    {
        let mut eligible = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self.has_capacity(store, &candidate.operator)? {
                eligible.push(candidate);
            } else {
                debug!(
                    operator_id = candidate.operator.id,
                    load_limit = candidate.operator.load_limit,
                    "操作员已满载，跳过"
                );
            }
        }
        Ok(eligible)
    }
}
