// ==========================================
// 线索分配系统 - 操作员 API
// ==========================================
// 职责: 操作员创建、查询、局部更新
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{require_non_blank, validate_load_limit};
use crate::domain::{Operator, OperatorUpdate};
use crate::repository::session::Database;
use crate::repository::store::OperatorStore;

/// 创建操作员请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorCreate {
    pub name: String,
    /// 缺省时取配置 default_load_limit
    pub load_limit: Option<i64>,
}

// ==========================================
// OperatorApi - 操作员 API
// ==========================================
pub struct OperatorApi {
    db: Database,
    default_load_limit: i64,
}

impl OperatorApi {
    pub fn new(db: Database, default_load_limit: i64) -> Self {
        Self {
            db,
            default_load_limit,
        }
    }

    /// 创建操作员（新操作员默认启用）
    pub fn create_operator(&self, req: &OperatorCreate) -> ApiResult<Operator> {
        require_non_blank("name", &req.name)?;
        let load_limit = req.load_limit.unwrap_or(self.default_load_limit);
        validate_load_limit(load_limit)?;

        let operator = self
            .db
            .write(|s| s.insert_operator(req.name.trim(), load_limit))?;
        info!(operator_id = operator.id, load_limit, "操作员已创建");
        Ok(operator)
    }

    /// 查询全部操作员（按 id 升序）
    pub fn list_operators(&self) -> ApiResult<Vec<Operator>> {
        Ok(self.db.read(|s| s.list_operators())?)
    }

    pub fn get_operator(&self, operator_id: i64) -> ApiResult<Operator> {
        self.db
            .read(|s| s.find_operator(operator_id))?
            .ok_or_else(|| ApiError::NotFound(format!("操作员(id={})不存在", operator_id)))
    }

    /// 局部更新操作员
    ///
    /// 调低 load_limit 不影响已分配的接触，只约束之后的分配
    pub fn update_operator(&self, operator_id: i64, update: &OperatorUpdate) -> ApiResult<Operator> {
        if let Some(limit) = update.load_limit {
            validate_load_limit(limit)?;
        }

        let updated = self
            .db
            .write(|s| s.update_operator(operator_id, update))?
            .ok_or_else(|| ApiError::NotFound(format!("操作员(id={})不存在", operator_id)))?;

        info!(
            operator_id,
            load_limit = updated.load_limit,
            is_active = updated.is_active,
            "操作员已更新"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> OperatorApi {
        OperatorApi::new(Database::open_in_memory().unwrap(), 10)
    }

    #[test]
    fn test_create_uses_default_limit() {
        let api = api();
        let op = api
            .create_operator(&OperatorCreate {
                name: "Anna".to_string(),
                load_limit: None,
            })
            .unwrap();

        assert_eq!(op.load_limit, 10);
        assert!(op.is_active);
        assert_eq!(api.list_operators().unwrap(), vec![op]);
    }

    #[test]
    fn test_create_validates_input() {
        let api = api();
        let blank = api.create_operator(&OperatorCreate {
            name: " ".to_string(),
            load_limit: Some(3),
        });
        assert!(matches!(blank, Err(ApiError::InvalidInput(_))));

        let negative = api.create_operator(&OperatorCreate {
            name: "Bob".to_string(),
            load_limit: Some(-1),
        });
        assert!(matches!(negative, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_partial_update() {
        let api = api();
        let op = api
            .create_operator(&OperatorCreate {
                name: "Anna".to_string(),
                load_limit: Some(4),
            })
            .unwrap();

        let updated = api
            .update_operator(
                op.id,
                &OperatorUpdate {
                    load_limit: None,
                    is_active: Some(false),
                },
            )
            .unwrap();

        assert_eq!(updated.load_limit, 4);
        assert!(!updated.is_active);
        assert_eq!(api.get_operator(op.id).unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_operator() {
        let result = api().update_operator(5, &OperatorUpdate::default());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
