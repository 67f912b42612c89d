// ==========================================
// 线索分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod contact;
pub mod lead;
pub mod operator;
pub mod source;
pub mod stats;
pub mod types;

// 重导出核心类型
pub use contact::{Contact, NewContact};
pub use lead::Lead;
pub use operator::{Operator, OperatorUpdate};
pub use source::{OperatorSourceWeight, Source, WeightedCandidate};
pub use stats::{OperatorStats, SourceStats};
pub use types::{ContactStatus, WeightPolicy};
