// ==========================================
// 线索分配系统 - 接触台账数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（状态流转规则在 ContactLedger）
// 说明: status 以 ACTIVE/CLOSED 落库，created_at 以 UTC 文本落库
// ==========================================

use crate::domain::{Contact, ContactStatus, NewContact};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::session::StoreSession;
use crate::repository::store::ContactStore;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

/// created_at 存储格式（微秒精度）
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const CONTACT_COLUMNS: &str = "id, lead_id, source_id, operator_id, status, created_at, payload";

pub(crate) fn format_created_at(ts: &NaiveDateTime) -> String {
    ts.format(CREATED_AT_FORMAT).to_string()
}

fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok()
}

fn map_contact_row(row: &Row<'_>) -> SqliteResult<Contact> {
    let status_raw: String = row.get(4)?;
    let status = ContactStatus::from_db_str(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("未知接触状态: {}", status_raw).into(),
        )
    })?;

    let created_raw: String = row.get(5)?;
    let created_at = parse_created_at(&created_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("无法解析 created_at: {}", created_raw).into(),
        )
    })?;

    Ok(Contact {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        source_id: row.get(2)?,
        operator_id: row.get(3)?,
        status,
        created_at,
        payload: row.get(6)?,
    })
}

impl ContactStore for StoreSession<'_> {
    fn insert_contact(&self, contact: &NewContact) -> RepositoryResult<Contact> {
        self.conn().execute(
            r#"
            INSERT INTO contacts (lead_id, source_id, operator_id, status, created_at, payload)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                contact.lead_id,
                contact.source_id,
                contact.operator_id,
                contact.status.to_db_str(),
                format_created_at(&contact.created_at),
                contact.payload,
            ],
        )?;

        let id = self.conn().last_insert_rowid();
        self.find_contact(id)?.ok_or_else(|| {
            RepositoryError::InternalError(format!("接触写入后无法读回: id={}", id))
        })
    }

    fn find_contact(&self, contact_id: i64) -> RepositoryResult<Option<Contact>> {
        let contact = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM contacts WHERE id = ?1", CONTACT_COLUMNS),
                params![contact_id],
                map_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn update_contact_status(&self, contact_id: i64, status: ContactStatus) -> RepositoryResult<bool> {
        let affected = self.conn().execute(
            "UPDATE contacts SET status = ?1 WHERE id = ?2",
            params![status.to_db_str(), contact_id],
        )?;
        Ok(affected > 0)
    }

    fn count_active_contacts(&self, operator_id: i64) -> RepositoryResult<i64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM contacts WHERE operator_id = ?1 AND status = ?2",
            params![operator_id, ContactStatus::Active.to_db_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_contacts_for_lead(&self, lead_id: i64) -> RepositoryResult<Vec<Contact>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM contacts WHERE lead_id = ?1 ORDER BY id",
            CONTACT_COLUMNS
        ))?;
        let contacts = stmt
            .query_map(params![lead_id], map_contact_row)?
            .collect::<SqliteResult<Vec<Contact>>>()?;
        Ok(contacts)
    }
}
