// ==========================================
// 线索分配系统 - 统计查询仓储
// ==========================================
// 口径: LEFT JOIN，全部状态计数，无接触计 0
// ==========================================

use crate::domain::{OperatorStats, SourceStats};
use crate::repository::error::RepositoryResult;
use crate::repository::session::StoreSession;
use crate::repository::store::StatsStore;
use rusqlite::Result as SqliteResult;

impl StatsStore for StoreSession<'_> {
    fn operator_contact_stats(&self) -> RepositoryResult<Vec<OperatorStats>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT o.id, o.name, COUNT(c.id)
            FROM operators o
            LEFT JOIN contacts c ON c.operator_id = o.id
            GROUP BY o.id, o.name
            ORDER BY o.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(OperatorStats {
                    operator_id: row.get(0)?,
                    operator_name: row.get(1)?,
                    contacts_count: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<OperatorStats>>>()?;
        Ok(rows)
    }

    fn source_contact_stats(&self) -> RepositoryResult<Vec<SourceStats>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT s.id, s.name, COUNT(c.id)
            FROM sources s
            LEFT JOIN contacts c ON c.source_id = s.id
            GROUP BY s.id, s.name
            ORDER BY s.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SourceStats {
                    source_id: row.get(0)?,
                    source_name: row.get(1)?,
                    contacts_count: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<SourceStats>>>()?;
        Ok(rows)
    }
}
