// ==========================================
// 线索分配系统 - 来源数据仓储
// ==========================================
// 约束: sources.name UNIQUE, sources.code UNIQUE（允许 NULL）
// ==========================================

use crate::domain::Source;
use crate::repository::error::RepositoryResult;
use crate::repository::session::StoreSession;
use crate::repository::store::SourceStore;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

fn map_source_row(row: &Row<'_>) -> SqliteResult<Source> {
    Ok(Source {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
    })
}

impl SourceStore for StoreSession<'_> {
    fn insert_source(&self, name: &str, code: Option<&str>) -> RepositoryResult<Source> {
        self.conn().execute(
            "INSERT INTO sources (name, code) VALUES (?1, ?2)",
            params![name, code],
        )?;

        Ok(Source {
            id: self.conn().last_insert_rowid(),
            name: name.to_string(),
            code: code.map(|c| c.to_string()),
        })
    }

    fn find_source(&self, source_id: i64) -> RepositoryResult<Option<Source>> {
        let source = self
            .conn()
            .query_row(
                "SELECT id, name, code FROM sources WHERE id = ?1",
                params![source_id],
                map_source_row,
            )
            .optional()?;
        Ok(source)
    }

    fn list_sources(&self) -> RepositoryResult<Vec<Source>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, code FROM sources ORDER BY id")?;
        let sources = stmt
            .query_map([], map_source_row)?
            .collect::<SqliteResult<Vec<Source>>>()?;
        Ok(sources)
    }
}
