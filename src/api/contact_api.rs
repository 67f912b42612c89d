// ==========================================
// 线索分配系统 - 接触 API
// ==========================================
// 职责: 入站接触登记（含自动分配）、接触状态变更
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_non_blank;
use crate::domain::{Contact, ContactStatus, Lead, Operator, Source};
use crate::engine::orchestrator::{ContactEvent, DispatchOrchestrator};
use crate::repository::error::RepositoryResult;
use crate::repository::session::{Database, StoreSession};
use crate::repository::store::{ContactStore, LeadStore, OperatorStore, SourceStore};

/// 接触登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactCreate {
    /// 线索的外部稳定标识（去重键）
    pub lead_external_id: String,
    pub lead_name: Option<String>,
    pub source_id: i64,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactStatusUpdate {
    pub status: ContactStatus,
}

// ==========================================
// ContactView - 接触完整视图（线索 + 来源 + 操作员）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactView {
    pub id: i64,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
    pub payload: Option<String>,
    pub lead: Lead,
    pub source: Source,
    pub operator: Option<Operator>,
}

impl ContactView {
    pub fn new(contact: Contact, lead: Lead, source: Source, operator: Option<Operator>) -> Self {
        Self {
            id: contact.id,
            status: contact.status,
            created_at: contact.created_at,
            payload: contact.payload,
            lead,
            source,
            operator,
        }
    }
}

// ==========================================
// ContactApi - 接触 API
// ==========================================
pub struct ContactApi {
    db: Database,
    orchestrator: Arc<DispatchOrchestrator>,
}

impl ContactApi {
    pub fn new(db: Database, orchestrator: Arc<DispatchOrchestrator>) -> Self {
        Self { db, orchestrator }
    }

    /// 登记入站接触并自动分配
    ///
    /// 没有可用操作员时接触照常登记，operator 为空
    pub fn register_contact(&self, req: &ContactCreate) -> ApiResult<ContactView> {
        require_non_blank("lead_external_id", &req.lead_external_id)?;

        let outcome = self.orchestrator.register_contact(&ContactEvent {
            lead_external_id: req.lead_external_id.clone(),
            lead_name: req.lead_name.clone(),
            source_id: req.source_id,
            payload: req.payload.clone(),
        })?;

        Ok(ContactView::new(
            outcome.contact,
            outcome.lead,
            outcome.source,
            outcome.operator,
        ))
    }

    /// 变更接触状态
    pub fn update_contact_status(
        &self,
        contact_id: i64,
        update: &ContactStatusUpdate,
    ) -> ApiResult<ContactView> {
        let contact = self.orchestrator.set_status(contact_id, update.status)?;
        self.build_view(contact)
    }

    pub fn get_contact(&self, contact_id: i64) -> ApiResult<ContactView> {
        let contact = self
            .db
            .read(|s| s.find_contact(contact_id))?
            .ok_or_else(|| ApiError::NotFound(format!("接触(id={})不存在", contact_id)))?;
        self.build_view(contact)
    }

    fn build_view(&self, contact: Contact) -> ApiResult<ContactView> {
        let (lead, source, operator) = self.db.read(|s| load_relations(s, &contact))?;
        let lead = lead.ok_or_else(|| {
            ApiError::InternalError(format!("接触(id={})关联的线索缺失", contact.id))
        })?;
        let source = source.ok_or_else(|| {
            ApiError::InternalError(format!("接触(id={})关联的来源缺失", contact.id))
        })?;
        Ok(ContactView::new(contact, lead, source, operator))
    }
}

type Relations = (Option<Lead>, Option<Source>, Option<Operator>);

fn load_relations(s: &StoreSession<'_>, contact: &Contact) -> RepositoryResult<Relations> {
    let lead = s.find_lead(contact.lead_id)?;
    let source = s.find_source(contact.source_id)?;
    let operator = match contact.operator_id {
        Some(op_id) => s.find_operator(op_id)?,
        None => None,
    };
    Ok((lead, source, operator))
}
