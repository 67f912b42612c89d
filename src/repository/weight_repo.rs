// ==========================================
// 线索分配系统 - 权重表数据仓储
// ==========================================
// 约束: (operator_id, source_id) UNIQUE (uix_operator_source)
// 说明: 非正权重允许落库，候选查询时排除
// ==========================================

use crate::domain::{Operator, OperatorSourceWeight, WeightedCandidate};
use crate::repository::error::RepositoryResult;
use crate::repository::session::StoreSession;
use crate::repository::store::WeightStore;
use rusqlite::{params, Result as SqliteResult, Row};

fn map_weight_row(row: &Row<'_>) -> SqliteResult<OperatorSourceWeight> {
    Ok(OperatorSourceWeight {
        id: row.get(0)?,
        operator_id: row.get(1)?,
        source_id: row.get(2)?,
        weight: row.get(3)?,
    })
}

impl WeightStore for StoreSession<'_> {
    fn upsert_weight(
        &self,
        operator_id: i64,
        source_id: i64,
        weight: i64,
    ) -> RepositoryResult<OperatorSourceWeight> {
        self.conn().execute(
            r#"
            INSERT INTO operator_source_weights (operator_id, source_id, weight)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(operator_id, source_id) DO UPDATE SET weight = excluded.weight
            "#,
            params![operator_id, source_id, weight],
        )?;

        let stored = self.conn().query_row(
            r#"
            SELECT id, operator_id, source_id, weight
            FROM operator_source_weights
            WHERE operator_id = ?1 AND source_id = ?2
            "#,
            params![operator_id, source_id],
            map_weight_row,
        )?;
        Ok(stored)
    }

    fn list_weights_for_source(&self, source_id: i64) -> RepositoryResult<Vec<OperatorSourceWeight>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT id, operator_id, source_id, weight
            FROM operator_source_weights
            WHERE source_id = ?1
            ORDER BY operator_id
            "#,
        )?;
        let weights = stmt
            .query_map(params![source_id], map_weight_row)?
            .collect::<SqliteResult<Vec<OperatorSourceWeight>>>()?;
        Ok(weights)
    }

    fn list_candidate_weights(&self, source_id: i64) -> RepositoryResult<Vec<WeightedCandidate>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT o.id, o.name, o.is_active, o.load_limit, w.weight
            FROM operator_source_weights w
            JOIN operators o ON o.id = w.operator_id
            WHERE w.source_id = ?1
              AND o.is_active = 1
              AND w.weight > 0
            ORDER BY o.id
            "#,
        )?;
        let candidates = stmt
            .query_map(params![source_id], |row| {
                Ok(WeightedCandidate {
                    operator: Operator {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        is_active: row.get(2)?,
                        load_limit: row.get(3)?,
                    },
                    weight: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<WeightedCandidate>>>()?;
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::OperatorUpdate;
    use crate::repository::error::RepositoryResult;
    use crate::repository::session::Database;
    use crate::repository::store::{OperatorStore, SourceStore, WeightStore};

    #[test]
    fn test_upsert_overwrites_same_pair() {
        let db = Database::open_in_memory().unwrap();
        let (op_id, source_id) = db
            .write(|s| -> RepositoryResult<(i64, i64)> {
                let op = s.insert_operator("Op1", 10)?;
                let src = s.insert_source("Bot", None)?;
                Ok((op.id, src.id))
            })
            .unwrap();

        let first = db.write(|s| s.upsert_weight(op_id, source_id, 2)).unwrap();
        let second = db.write(|s| s.upsert_weight(op_id, source_id, 9)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.weight, 9);
        assert_eq!(db.read(|s| s.list_weights_for_source(source_id)).unwrap().len(), 1);
    }

    #[test]
    fn test_candidates_exclude_inactive_and_non_positive() {
        let db = Database::open_in_memory().unwrap();
        let source_id = db
            .write(|s| -> RepositoryResult<i64> {
                let src = s.insert_source("Bot", None)?;
                let ok = s.insert_operator("Ok", 10)?;
                let zero = s.insert_operator("Zero", 10)?;
                let negative = s.insert_operator("Negative", 10)?;
                let inactive = s.insert_operator("Inactive", 10)?;

                s.upsert_weight(ok.id, src.id, 5)?;
                s.upsert_weight(zero.id, src.id, 0)?;
                s.upsert_weight(negative.id, src.id, -3)?;
                s.upsert_weight(inactive.id, src.id, 8)?;
                s.update_operator(
                    inactive.id,
                    &OperatorUpdate {
                        load_limit: None,
                        is_active: Some(false),
                    },
                )?;
                Ok(src.id)
            })
            .unwrap();

        let candidates = db.read(|s| s.list_candidate_weights(source_id)).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].operator.name, "Ok");
        assert_eq!(candidates[0].weight, 5);

        // 非正权重仍然落库
        assert_eq!(db.read(|s| s.list_weights_for_source(source_id)).unwrap().len(), 4);
    }

    #[test]
    fn test_weight_requires_existing_operator() {
        let db = Database::open_in_memory().unwrap();
        let src = db.write(|s| s.insert_source("Bot", None)).unwrap();

        let err = db.write(|s| s.upsert_weight(404, src.id, 1)).unwrap_err();
        assert!(matches!(
            err,
            crate::repository::error::RepositoryError::ForeignKeyViolation(_)
        ));
    }
}
