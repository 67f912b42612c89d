// ==========================================
// 线索分配系统 - 操作员领域模型
// ==========================================
// 红线: load_limit 只在选择时刻生效，下调不追溯已分配接触
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Operator - 操作员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub is_active: bool,   // 停用后不参与分配
    pub load_limit: i64,   // 同时处理中的接触数上限
}

impl Operator {
    /// 给定当前处理中数量，判断是否还能接收新接触
    pub fn has_capacity_for(&self, active_count: i64) -> bool {
        active_count < self.load_limit
    }
}

// ==========================================
// OperatorUpdate - 操作员局部更新
// ==========================================
/// None 字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorUpdate {
    pub load_limit: Option<i64>,
    pub is_active: Option<bool>,
}

impl OperatorUpdate {
    pub fn is_empty(&self) -> bool {
        self.load_limit.is_none() && self.is_active.is_none()
    }

    /// 将更新应用到操作员副本
    pub fn apply_to(&self, operator: &mut Operator) {
        if let Some(limit) = self.load_limit {
            operator.load_limit = limit;
        }
        if let Some(active) = self.is_active {
            operator.is_active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(load_limit: i64) -> Operator {
        Operator {
            id: 1,
            name: "Op".to_string(),
            is_active: true,
            load_limit,
        }
    }

    #[test]
    fn test_capacity_boundary() {
        let op = operator(2);
        assert!(op.has_capacity_for(0));
        assert!(op.has_capacity_for(1));
        assert!(!op.has_capacity_for(2));
        assert!(!op.has_capacity_for(5));
    }

    #[test]
    fn test_zero_limit_never_has_capacity() {
        assert!(!operator(0).has_capacity_for(0));
    }

    #[test]
    fn test_partial_update_keeps_missing_fields() {
        let mut op = operator(10);
        let update = OperatorUpdate {
            load_limit: None,
            is_active: Some(false),
        };
        update.apply_to(&mut op);

        assert_eq!(op.load_limit, 10);
        assert!(!op.is_active);
        assert!(!update.is_empty());
        assert!(OperatorUpdate::default().is_empty());
    }
}
