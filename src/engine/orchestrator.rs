// ==========================================
// 线索分配系统 - 分配编排器
// ==========================================
// 用途: 协调 线索登记 → 操作员选择 → 接触登记
// 事务: register_contact 整体在一个 IMMEDIATE 事务内完成，
//       “读取负载 → 写入接触”跨连接串行，load_limit 不会被并发突破
// ==========================================

use crate::domain::{Contact, ContactStatus, Lead, Operator, Source};
use crate::engine::capacity::CapacityTracker;
use crate::engine::clock::Clock;
use crate::engine::contact_ledger::ContactLedger;
use crate::engine::error::{DispatchError, DispatchResult};
use crate::engine::lead_registry::LeadRegistry;
use crate::engine::random::RandomSource;
use crate::engine::selection::SelectionEngine;
use crate::repository::session::Database;
use crate::repository::store::SourceStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// ContactEvent - 一次入站接触
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEvent {
    pub lead_external_id: String,
    pub lead_name: Option<String>,
    pub source_id: i64,
    pub payload: Option<String>,
}

// ==========================================
// DispatchOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub lead: Lead,
    pub source: Source,
    pub operator: Option<Operator>,
    pub contact: Contact,
}

// ==========================================
// DispatchOrchestrator - 分配编排器
// ==========================================
pub struct DispatchOrchestrator {
    db: Database,
    leads: LeadRegistry,
    capacity: CapacityTracker,
    selection: SelectionEngine,
    ledger: ContactLedger,
}

impl DispatchOrchestrator {
    pub fn new(db: Database, random: Arc<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            leads: LeadRegistry::new(),
            capacity: CapacityTracker::new(),
            selection: SelectionEngine::new(random),
            ledger: ContactLedger::new(clock),
        }
    }

    /// 是否允许 closed → active
    pub fn with_reopen_enabled(mut self, enabled: bool) -> Self {
        self.ledger = self.ledger.with_reopen_enabled(enabled);
        self
    }

    /// 解析线索（语句逐条提交，并发冲突由 LeadRegistry 重读处理）
    pub fn resolve_lead(&self, external_id: &str, name: Option<&str>) -> DispatchResult<Lead> {
        self.db
            .autocommit(|s| self.leads.resolve_lead(s, external_id, name))
    }

    pub fn active_count(&self, operator_id: i64) -> DispatchResult<i64> {
        Ok(self
            .db
            .read(|s| self.capacity.active_count(s, operator_id))?)
    }

    /// 单独的选择调用（只读，不占用容量）
    pub fn choose_operator(&self, source_id: i64) -> DispatchResult<Option<Operator>> {
        self.db
            .read(|s| self.selection.choose_operator(s, source_id))
    }

    pub fn record_contact(
        &self,
        lead_id: i64,
        source_id: i64,
        operator_id: Option<i64>,
        payload: Option<String>,
    ) -> DispatchResult<Contact> {
        self.db.write(|s| {
            self.ledger
                .record_contact(s, lead_id, source_id, operator_id, payload)
        })
    }

    pub fn set_status(&self, contact_id: i64, status: ContactStatus) -> DispatchResult<Contact> {
        self.db
            .write(|s| self.ledger.set_status(s, contact_id, status))
    }

    /// 登记一次入站接触并分配操作员
    ///
    /// 步骤:
    /// 1) 校验来源（不存在则不创建线索）
    /// 2) 解析线索
    /// 3) 选择操作员（可能为空）
    /// 4) 登记接触
    ///
    /// 任一步失败整个事务回滚
    #[instrument(skip(self, event), fields(source_id = %event.source_id, external_id = %event.lead_external_id))]
    pub fn register_contact(&self, event: &ContactEvent) -> DispatchResult<DispatchOutcome> {
        let outcome = self.db.write(|s| -> DispatchResult<DispatchOutcome> {
            let source = s
                .find_source(event.source_id)?
                .ok_or(DispatchError::SourceNotFound {
                    source_id: event.source_id,
                })?;

            let lead = self
                .leads
                .resolve_lead(s, &event.lead_external_id, event.lead_name.as_deref())?;

            let operator = self.selection.choose_operator(s, source.id)?;

            let contact = self.ledger.record_contact(
                s,
                lead.id,
                source.id,
                operator.as_ref().map(|op| op.id),
                event.payload.clone(),
            )?;

            Ok(DispatchOutcome {
                lead,
                source,
                operator,
                contact,
            })
        })?;

        match &outcome.operator {
            Some(op) => info!(
                contact_id = outcome.contact.id,
                lead_id = outcome.lead.id,
                operator_id = op.id,
                "接触已分配"
            ),
            None => info!(
                contact_id = outcome.contact.id,
                lead_id = outcome.lead.id,
                "接触未分配（无可用操作员）"
            ),
        }
        Ok(outcome)
    }
}
