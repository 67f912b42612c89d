// ==========================================
// 线索分配系统 - 接触领域模型
// ==========================================
// 红线: operator_id 在创建时确定，之后不再改派
// 红线: 创建后只有 status 可变
// ==========================================

use crate::domain::types::ContactStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Contact - 接触记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub lead_id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>, // None = 未分配（正常状态）
    pub status: ContactStatus,
    pub created_at: NaiveDateTime, // UTC
    pub payload: Option<String>,   // 原样保存，不解析
}

impl Contact {
    pub fn is_assigned(&self) -> bool {
        self.operator_id.is_some()
    }
}

// ==========================================
// NewContact - 待写入的接触
// ==========================================
#[derive(Debug, Clone)]
pub struct NewContact {
    pub lead_id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
    pub payload: Option<String>,
}
