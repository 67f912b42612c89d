// ==========================================
// 线索分配系统 - 线索领域模型
// ==========================================
// 红线: 每个 external_id 只对应一条线索
// 红线: name 可以补填，一旦非空不再覆盖
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub external_id: String, // 调用方提供的稳定去重键
    pub name: Option<String>,
}

impl Lead {
    /// 判断是否需要用传入的名称补填
    ///
    /// 只有当已存名称为空且传入名称非空时返回该名称
    pub fn backfill_candidate<'a>(&self, incoming: Option<&'a str>) -> Option<&'a str> {
        let stored_empty = self
            .name
            .as_deref()
            .map(|n| n.trim().is_empty())
            .unwrap_or(true);
        if !stored_empty {
            return None;
        }
        incoming.filter(|n| !n.trim().is_empty())
    }
}
