// ==========================================
// 线索分配系统 - 操作员选择引擎
// ==========================================
// 流程:
// 1) 校验来源存在
// 2) 取来源下的候选（启用 + weight > 0，按 operator_id 升序）
// 3) 剔除满载操作员（active_count >= load_limit）
// 4) 总权重 W，抽 r ∈ [0, W)，累加权重首个 >= r 的候选胜出
// 5) 无候选 → None（接触仍然登记，只是不分配）
// ==========================================

use crate::domain::{Operator, WeightedCandidate};
use crate::engine::capacity::CapacityTracker;
use crate::engine::error::{DispatchError, DispatchResult};
use crate::engine::random::RandomSource;
use crate::repository::store::{ContactStore, SourceStore, WeightStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct SelectionEngine {
    random: Arc<dyn RandomSource>,
    capacity: CapacityTracker,
}

impl SelectionEngine {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            random,
            capacity: CapacityTracker::new(),
        }
    }

    /// 为来源选择一名操作员
    ///
    /// # 返回
    /// - Ok(Some(op)): 选中的操作员
    /// - Ok(None): 没有可用操作员（正常结果，不是错误）
    /// - Err(SourceNotFound): 来源不存在
    #[instrument(skip(self, store), fields(source_id = %source_id))]
    pub fn choose_operator<S>(&self, store: &S, source_id: i64) -> DispatchResult<Option<Operator>>
    where
        S: SourceStore + WeightStore + ContactStore + ?Sized,
    {
        if store.find_source(source_id)?.is_none() {
            return Err(DispatchError::SourceNotFound { source_id });
        }

        let candidates: Vec<WeightedCandidate> = store
            .list_candidate_weights(source_id)?
            .into_iter()
            .filter(|c| c.operator.is_active && c.weight > 0)
            .collect();
        let eligible = self.capacity.retain_with_capacity(store, candidates)?;

        if eligible.is_empty() {
            info!("没有可用操作员，接触将不分配");
            return Ok(None);
        }

        // 单个权重可达 i64::MAX，按 i128 累加
        let total: i128 = eligible.iter().map(|c| i128::from(c.weight)).sum();
        let r = self.random.uniform(0.0, total as f64);
        debug!(candidates = eligible.len(), total_weight = %total, r, "加权抽样");

        let chosen = pick_weighted(&eligible, r).map(|c| c.operator.clone());
        if let Some(op) = &chosen {
            info!(operator_id = op.id, operator_name = %op.name, "选中操作员");
        }
        Ok(chosen)
    }
}

/// 累积权重选择
///
/// 按顺序累加权重，返回首个累加值 >= r 的候选；
/// 浮点误差导致无候选命中时回退到最后一个。空列表返回 None。
pub fn pick_weighted(candidates: &[WeightedCandidate], r: f64) -> Option<&WeightedCandidate> {
    let mut upto = 0.0_f64;
    for candidate in candidates {
        upto += candidate.weight as f64;
        if upto >= r {
            return Some(candidate);
        }
    }
    candidates.last()
}
