// ==========================================
// 线索分配系统 - 线索数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（补填规则在 LeadRegistry）
// 约束: leads.external_id UNIQUE
// ==========================================

use crate::domain::Lead;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::session::StoreSession;
use crate::repository::store::LeadStore;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const LEAD_COLUMNS: &str = "id, external_id, name";

fn map_lead_row(row: &Row<'_>) -> SqliteResult<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        external_id: row.get(1)?,
        name: row.get(2)?,
    })
}

impl LeadStore for StoreSession<'_> {
    fn find_lead_by_external_id(&self, external_id: &str) -> RepositoryResult<Option<Lead>> {
        let lead = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM leads WHERE external_id = ?1", LEAD_COLUMNS),
                params![external_id],
                map_lead_row,
            )
            .optional()?;
        Ok(lead)
    }

    fn find_lead(&self, lead_id: i64) -> RepositoryResult<Option<Lead>> {
        let lead = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS),
                params![lead_id],
                map_lead_row,
            )
            .optional()?;
        Ok(lead)
    }

    fn insert_lead(&self, external_id: &str, name: Option<&str>) -> RepositoryResult<Lead> {
        self.conn().execute(
            "INSERT INTO leads (external_id, name) VALUES (?1, ?2)",
            params![external_id, name],
        )?;

        Ok(Lead {
            id: self.conn().last_insert_rowid(),
            external_id: external_id.to_string(),
            name: name.map(|n| n.to_string()),
        })
    }

    fn update_lead_name(&self, lead_id: i64, name: &str) -> RepositoryResult<()> {
        let affected = self.conn().execute(
            "UPDATE leads SET name = ?1 WHERE id = ?2",
            params![name, lead_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Lead", lead_id));
        }
        Ok(())
    }

    fn list_leads(&self) -> RepositoryResult<Vec<Lead>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {} FROM leads ORDER BY id", LEAD_COLUMNS))?;
        let leads = stmt
            .query_map([], map_lead_row)?
            .collect::<SqliteResult<Vec<Lead>>>()?;
        Ok(leads)
    }
}
