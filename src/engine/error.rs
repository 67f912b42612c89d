// ==========================================
// 线索分配系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 仓储错误原样透传（#[from]），业务规则错误各自独立变体
// ==========================================

use crate::domain::types::ContactStatus;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    // ===== 引用不存在 =====
    #[error("来源不存在: source_id={source_id}")]
    SourceNotFound { source_id: i64 },

    #[error("操作员不存在: operator_id={operator_id}")]
    OperatorNotFound { operator_id: i64 },

    #[error("线索不存在: lead_id={lead_id}")]
    LeadNotFound { lead_id: i64 },

    #[error("接触不存在: contact_id={contact_id}")]
    ContactNotFound { contact_id: i64 },

    // ===== 业务规则 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("非正权重被拒绝: operator_id={operator_id}, source_id={source_id}, weight={weight}")]
    InvalidWeight {
        operator_id: i64,
        source_id: i64,
        weight: i64,
    },

    #[error("不允许的状态流转: {from} -> {to}")]
    InvalidStatusTransition {
        from: ContactStatus,
        to: ContactStatus,
    },

    // ===== 存储 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DispatchError {
    /// 是否为“引用对象不存在”类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::SourceNotFound { .. }
                | DispatchError::OperatorNotFound { .. }
                | DispatchError::LeadNotFound { .. }
                | DispatchError::ContactNotFound { .. }
                | DispatchError::Repository(RepositoryError::NotFound { .. })
        )
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_is_wrapped() {
        let err: DispatchError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, DispatchError::Repository(_)));
        assert!(err.to_string().contains("poisoned"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(DispatchError::SourceNotFound { source_id: 1 }.is_not_found());
        assert!(DispatchError::ContactNotFound { contact_id: 1 }.is_not_found());
        assert!(!DispatchError::InvalidInput("x".to_string()).is_not_found());
    }

    #[test]
    fn test_transition_message_uses_lowercase_status() {
        let err = DispatchError::InvalidStatusTransition {
            from: ContactStatus::Closed,
            to: ContactStatus::Active,
        };
        assert_eq!(err.to_string(), "不允许的状态流转: closed -> active");
    }
}
