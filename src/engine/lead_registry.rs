// ==========================================
// 线索分配系统 - 线索登记
// ==========================================
// 职责: 按 external_id 幂等地解析线索
// 规则:
// 1) 已存在 → 返回既有线索；库中名称为空且本次带名称时回填
// 2) 不存在 → 新建
// 3) 并发创建冲突（唯一约束）→ 重读一次，取胜出方
// ==========================================

use crate::domain::Lead;
use crate::engine::error::{DispatchError, DispatchResult};
use crate::repository::store::LeadStore;
use tracing::{debug, instrument, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct LeadRegistry;

impl LeadRegistry {
    pub fn new() -> Self {
        Self
    }

    /// 解析（查找或创建）线索
    ///
    /// # 参数
    /// - `external_id`: 外部稳定标识，不能为空白
    /// - `name`: 可选名称，仅用于新建或回填，不会覆盖已有名称
    #[instrument(skip(self, store, name), fields(external_id = %external_id))]
    pub fn resolve_lead<S>(&self, store: &S, external_id: &str, name: Option<&str>) -> DispatchResult<Lead>
    where
        S: LeadStore + ?Sized,
    {
        if external_id.trim().is_empty() {
            return Err(DispatchError::InvalidInput(
                "external_id 不能为空".to_string(),
            ));
        }

        if let Some(existing) = store.find_lead_by_external_id(external_id)? {
            return self.backfill_name(store, existing, name);
        }

        let initial_name = name.filter(|n| !n.trim().is_empty());
        match store.insert_lead(external_id, initial_name) {
            Ok(created) => {
                debug!(lead_id = created.id, "新建线索");
                Ok(created)
            }
            Err(err) if err.is_unique_violation() => {
                warn!("线索并发创建冲突，重读胜出方");
                match store.find_lead_by_external_id(external_id)? {
                    Some(winner) => self.backfill_name(store, winner, name),
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn backfill_name<S>(&self, store: &S, mut lead: Lead, name: Option<&str>) -> DispatchResult<Lead>
    where
        S: LeadStore + ?Sized,
    {
        if let Some(new_name) = lead.backfill_candidate(name) {
            store.update_lead_name(lead.id, new_name)?;
            debug!(lead_id = lead.id, "回填线索名称");
            lead.name = Some(new_name.to_string());
        }
        Ok(lead)
    }
}
