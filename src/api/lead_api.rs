// ==========================================
// 线索分配系统 - 线索 API
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Contact, ContactStatus, Lead};
use crate::engine::orchestrator::DispatchOrchestrator;
use crate::repository::error::RepositoryResult;
use crate::repository::session::Database;
use crate::repository::store::{ContactStore, LeadStore};

/// 线索下的接触摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
}

impl From<Contact> for ContactSummary {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            source_id: c.source_id,
            operator_id: c.operator_id,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadWithContacts {
    pub id: i64,
    pub external_id: String,
    pub name: Option<String>,
    pub contacts: Vec<ContactSummary>,
}

pub struct LeadApi {
    db: Database,
    orchestrator: Arc<DispatchOrchestrator>,
}

impl LeadApi {
    pub fn new(db: Database, orchestrator: Arc<DispatchOrchestrator>) -> Self {
        Self { db, orchestrator }
    }

    /// 按 external_id 解析线索（不存在则创建）
    pub fn resolve_lead(&self, external_id: &str, name: Option<&str>) -> ApiResult<Lead> {
        Ok(self.orchestrator.resolve_lead(external_id, name)?)
    }

    pub fn find_by_external_id(&self, external_id: &str) -> ApiResult<Lead> {
        self.db
            .read(|s| s.find_lead_by_external_id(external_id))?
            .ok_or_else(|| ApiError::NotFound(format!("线索(external_id={})不存在", external_id)))
    }

    /// 全部线索及其接触（线索按 id，接触按 id 升序）
    pub fn list_leads(&self) -> ApiResult<Vec<LeadWithContacts>> {
        let leads = self.db.read(|s| -> RepositoryResult<Vec<LeadWithContacts>> {
            let mut result = Vec::new();
            for lead in s.list_leads()? {
                let contacts = s
                    .list_contacts_for_lead(lead.id)?
                    .into_iter()
                    .map(ContactSummary::from)
                    .collect();
                result.push(LeadWithContacts {
                    id: lead.id,
                    external_id: lead.external_id,
                    name: lead.name,
                    contacts,
                });
            }
            Ok(result)
        })?;
        Ok(leads)
    }
}
