// ==========================================
// 线索分配系统 - 入参校验
// ==========================================
// 职责: API 边界处的字段级校验，失败统一返回 ApiError::InvalidInput
// ==========================================

use crate::api::error::{ApiError, ApiResult};

/// 必填文本字段：去除首尾空白后不能为空
pub fn require_non_blank(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(())
}

/// 可选文本字段：给出时不能为空白
pub fn optional_non_blank(field: &str, value: Option<&str>) -> ApiResult<()> {
    match value {
        Some(v) => require_non_blank(field, v),
        None => Ok(()),
    }
}

/// 负载上限：不能为负（0 表示不接新接触）
pub fn validate_load_limit(load_limit: i64) -> ApiResult<()> {
    if load_limit < 0 {
        return Err(ApiError::InvalidInput(format!(
            "load_limit 不能为负数: {}",
            load_limit
        )));
    }
    Ok(())
}
