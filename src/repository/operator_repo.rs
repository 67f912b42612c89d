// ==========================================
// 线索分配系统 - 操作员数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::{Operator, OperatorUpdate};
use crate::repository::error::RepositoryResult;
use crate::repository::session::StoreSession;
use crate::repository::store::OperatorStore;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const OPERATOR_COLUMNS: &str = "id, name, is_active, load_limit";

pub(crate) fn map_operator_row(row: &Row<'_>) -> SqliteResult<Operator> {
    Ok(Operator {
        id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get(2)?,
        load_limit: row.get(3)?,
    })
}

impl OperatorStore for StoreSession<'_> {
    fn insert_operator(&self, name: &str, load_limit: i64) -> RepositoryResult<Operator> {
        self.conn().execute(
            "INSERT INTO operators (name, is_active, load_limit) VALUES (?1, 1, ?2)",
            params![name, load_limit],
        )?;

        Ok(Operator {
            id: self.conn().last_insert_rowid(),
            name: name.to_string(),
            is_active: true,
            load_limit,
        })
    }

    fn find_operator(&self, operator_id: i64) -> RepositoryResult<Option<Operator>> {
        let operator = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM operators WHERE id = ?1", OPERATOR_COLUMNS),
                params![operator_id],
                map_operator_row,
            )
            .optional()?;
        Ok(operator)
    }

    fn list_operators(&self) -> RepositoryResult<Vec<Operator>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {} FROM operators ORDER BY id", OPERATOR_COLUMNS))?;
        let operators = stmt
            .query_map([], map_operator_row)?
            .collect::<SqliteResult<Vec<Operator>>>()?;
        Ok(operators)
    }

    fn update_operator(
        &self,
        operator_id: i64,
        update: &OperatorUpdate,
    ) -> RepositoryResult<Option<Operator>> {
        let mut operator = match self.find_operator(operator_id)? {
            Some(op) => op,
            None => return Ok(None),
        };

        if update.is_empty() {
            return Ok(Some(operator));
        }

        update.apply_to(&mut operator);
        self.conn().execute(
            "UPDATE operators SET is_active = ?1, load_limit = ?2 WHERE id = ?3",
            params![operator.is_active, operator.load_limit, operator_id],
        )?;

        Ok(Some(operator))
    }
}
