// ==========================================
// 线索分配系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod contact_repo;
pub mod error;
pub mod lead_repo;
pub mod operator_repo;
pub mod session;
pub mod source_repo;
pub mod stats_repo;
pub mod store;
pub mod weight_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use session::{Database, StoreSession};
pub use store::{
    ContactStore, DispatchStore, LeadStore, OperatorStore, SourceStore, StatsStore, WeightStore,
};
