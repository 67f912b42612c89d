// ==========================================
// 线索分配系统 - 接触台账
// ==========================================
// 职责: 登记接触、变更接触状态
// 规则:
// - 新接触一律 ACTIVE，created_at 取注入时钟（UTC）
// - operator_id 可为空（无可用操作员时照常登记）
// - 同状态重复写入为幂等操作
// - closed → active 默认拒绝，开启 contact_reopen_enabled 后放行
// ==========================================

use crate::domain::{Contact, ContactStatus, NewContact};
use crate::engine::clock::Clock;
use crate::engine::error::{DispatchError, DispatchResult};
use crate::repository::store::{ContactStore, LeadStore, OperatorStore, SourceStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct ContactLedger {
    clock: Arc<dyn Clock>,
    reopen_enabled: bool,
}

impl ContactLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            reopen_enabled: false,
        }
    }

    pub fn with_reopen_enabled(mut self, enabled: bool) -> Self {
        self.reopen_enabled = enabled;
        self
    }

    /// 登记一条接触
    ///
    /// # 参数
    /// - `operator_id`: None 表示未分配
    /// - `payload`: 调用方原始报文，原样保存
    #[instrument(skip(self, store, payload))]
    pub fn record_contact<S>(
        &self,
        store: &S,
        lead_id: i64,
        source_id: i64,
        operator_id: Option<i64>,
        payload: Option<String>,
    ) -> DispatchResult<Contact>
    where
        S: LeadStore + SourceStore + OperatorStore + ContactStore + ?Sized,
    {
        if store.find_lead(lead_id)?.is_none() {
            return Err(DispatchError::LeadNotFound { lead_id });
        }
        if store.find_source(source_id)?.is_none() {
            return Err(DispatchError::SourceNotFound { source_id });
        }
        if let Some(op_id) = operator_id {
            if store.find_operator(op_id)?.is_none() {
                return Err(DispatchError::OperatorNotFound { operator_id: op_id });
            }
        }

        let contact = store.insert_contact(&NewContact {
            lead_id,
            source_id,
            operator_id,
            status: ContactStatus::Active,
            created_at: self.clock.now(),
            payload,
        })?;
        debug!(contact_id = contact.id, assigned = contact.is_assigned(), "接触已登记");
        Ok(contact)
    }

    /// 变更接触状态
    #[instrument(skip(self, store))]
    pub fn set_status<S>(&self, store: &S, contact_id: i64, status: ContactStatus) -> DispatchResult<Contact>
    where
        S: ContactStore + ?Sized,
    {
        let current = store
            .find_contact(contact_id)?
            .ok_or(DispatchError::ContactNotFound { contact_id })?;

        if current.status == status {
            return Ok(current);
        }

        if current.status == ContactStatus::Closed && status == ContactStatus::Active && !self.reopen_enabled {
            return Err(DispatchError::InvalidStatusTransition {
                from: current.status,
                to: status,
            });
        }

        if !store.update_contact_status(contact_id, status)? {
            return Err(DispatchError::ContactNotFound { contact_id });
        }
        info!(
            from = %current.status,
            to = %status,
            frees_capacity = current.status.occupies_capacity() && !status.occupies_capacity(),
            "接触状态已变更"
        );

        Ok(Contact { status, ..current })
    }
}
