// ==========================================
// 线索分配系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口（入参校验 + 错误归一 + 视图组装）
// ==========================================

pub mod config_api;
pub mod contact_api;
pub mod error;
pub mod lead_api;
pub mod operator_api;
pub mod source_api;
pub mod stats_api;
pub mod validator;

// 重导出核心类型
pub use config_api::{ConfigApi, ConfigItem};
pub use contact_api::{ContactApi, ContactCreate, ContactStatusUpdate, ContactView};
pub use error::{ApiError, ApiResult};
pub use lead_api::{ContactSummary, LeadApi, LeadWithContacts};
pub use operator_api::{OperatorApi, OperatorCreate};
pub use source_api::{SourceApi, SourceCreate, WeightSet};
pub use stats_api::StatsApi;
