// ==========================================
// 线索分配系统 - 统计视图
// ==========================================
// 口径: 全部状态的接触数（含已关闭），无接触的行计 0
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorStats {
    pub operator_id: i64,
    pub operator_name: String,
    pub contacts_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub source_id: i64,
    pub source_name: String,
    pub contacts_count: i64,
}
