// ==========================================
// 线索分配系统 - 来源与权重领域模型
// ==========================================
// 红线: (operator_id, source_id) 唯一；weight <= 0 不是可用亲和度
// ==========================================

use crate::domain::operator::Operator;
use serde::{Deserialize, Serialize};

// ==========================================
// Source - 获客来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

// ==========================================
// OperatorSourceWeight - 操作员 × 来源 权重
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSourceWeight {
    pub id: i64,
    pub operator_id: i64,
    pub source_id: i64,
    pub weight: i64,
}

impl OperatorSourceWeight {
    /// 是否可作为选择候选的亲和度
    pub fn is_usable(&self) -> bool {
        self.weight > 0
    }
}

// ==========================================
// WeightedCandidate - 选择候选
// ==========================================
/// 已通过"启用 + 正权重"过滤的候选，容量过滤由选择引擎完成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedCandidate {
    pub operator: Operator,
    pub weight: i64,
}
