// ==========================================
// 线索分配系统 - 领域类型定义
// ==========================================
// 职责: 封闭枚举，杜绝字符串状态在边界处越界
// 序列化格式: 对外 JSON 小写，数据库 SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 接触状态 (Contact Status)
// ==========================================
// 红线: 只有 active / closed 两种取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Active, // 处理中（计入操作员负载）
    Closed, // 已关闭
}

impl ContactStatus {
    /// 从数据库字符串解析
    ///
    /// 未知取值返回 None，由调用方决定如何报错
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Some(ContactStatus::Active),
            "CLOSED" => Some(ContactStatus::Closed),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "ACTIVE",
            ContactStatus::Closed => "CLOSED",
        }
    }

    /// 是否计入操作员当前负载
    pub fn occupies_capacity(&self) -> bool {
        matches!(self, ContactStatus::Active)
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactStatus::Active => write!(f, "active"),
            ContactStatus::Closed => write!(f, "closed"),
        }
    }
}

// ==========================================
// 非正权重策略 (Non-positive Weight Policy)
// ==========================================
// Ignore: 允许落库，选择时排除
// Reject: 写入时直接拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightPolicy {
    Ignore,
    Reject,
}

impl WeightPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "IGNORE" => Some(WeightPolicy::Ignore),
            "REJECT" => Some(WeightPolicy::Reject),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            WeightPolicy::Ignore => "IGNORE",
            WeightPolicy::Reject => "REJECT",
        }
    }
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy::Ignore
    }
}

impl fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
