// ==========================================
// 线索分配系统 - 仓储能力 Trait
// ==========================================
// 职责: 定义核心引擎所需的数据访问接口（不包含业务逻辑）
// 实现者: StoreSession（rusqlite，绑定在一次事务上）
// ==========================================
// 引擎只依赖这些 Trait，事务边界由调用方（Database::read/write）显式给出
// ==========================================

use crate::domain::{
    Contact, ContactStatus, Lead, NewContact, Operator, OperatorSourceWeight, OperatorStats,
    OperatorUpdate, Source, SourceStats, WeightedCandidate,
};
use crate::repository::error::RepositoryResult;

// ==========================================
// LeadStore - 线索
// ==========================================
pub trait LeadStore {
    /// 按外部标识查询线索
    fn find_lead_by_external_id(&self, external_id: &str) -> RepositoryResult<Option<Lead>>;

    /// 按主键查询线索
    fn find_lead(&self, lead_id: i64) -> RepositoryResult<Option<Lead>>;

    /// 插入线索
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): external_id 已存在（并发创建的失败方）
    fn insert_lead(&self, external_id: &str, name: Option<&str>) -> RepositoryResult<Lead>;

    /// 更新线索名称
    fn update_lead_name(&self, lead_id: i64, name: &str) -> RepositoryResult<()>;

    /// 全部线索（按 id 升序）
    fn list_leads(&self) -> RepositoryResult<Vec<Lead>>;
}

// ==========================================
// OperatorStore - 操作员
// ==========================================
pub trait OperatorStore {
    fn insert_operator(&self, name: &str, load_limit: i64) -> RepositoryResult<Operator>;

    fn find_operator(&self, operator_id: i64) -> RepositoryResult<Option<Operator>>;

    fn list_operators(&self) -> RepositoryResult<Vec<Operator>>;

    /// 局部更新操作员
    ///
    /// # 返回
    /// - Ok(None): 操作员不存在
    fn update_operator(
        &self,
        operator_id: i64,
        update: &OperatorUpdate,
    ) -> RepositoryResult<Option<Operator>>;
}

// ==========================================
// SourceStore - 来源
// ==========================================
pub trait SourceStore {
    fn insert_source(&self, name: &str, code: Option<&str>) -> RepositoryResult<Source>;

    fn find_source(&self, source_id: i64) -> RepositoryResult<Option<Source>>;

    fn list_sources(&self) -> RepositoryResult<Vec<Source>>;
}

// ==========================================
// WeightStore - 权重表
// ==========================================
pub trait WeightStore {
    /// 按 (operator_id, source_id) 插入或覆盖权重
    fn upsert_weight(
        &self,
        operator_id: i64,
        source_id: i64,
        weight: i64,
    ) -> RepositoryResult<OperatorSourceWeight>;

    /// 来源下的全部权重行（含非正权重）
    fn list_weights_for_source(&self, source_id: i64) -> RepositoryResult<Vec<OperatorSourceWeight>>;

    /// 来源下的选择候选
    ///
    /// 只返回启用操作员且 weight > 0 的行，按 operator_id 升序（稳定迭代顺序）
    fn list_candidate_weights(&self, source_id: i64) -> RepositoryResult<Vec<WeightedCandidate>>;
}

// ==========================================
// ContactStore - 接触台账
// ==========================================
pub trait ContactStore {
    fn insert_contact(&self, contact: &NewContact) -> RepositoryResult<Contact>;

    fn find_contact(&self, contact_id: i64) -> RepositoryResult<Option<Contact>>;

    /// 覆盖写入状态
    ///
    /// # 返回
    /// - Ok(false): 接触不存在
    fn update_contact_status(&self, contact_id: i64, status: ContactStatus) -> RepositoryResult<bool>;

    /// 操作员当前处理中（ACTIVE）的接触数
    fn count_active_contacts(&self, operator_id: i64) -> RepositoryResult<i64>;

    fn list_contacts_for_lead(&self, lead_id: i64) -> RepositoryResult<Vec<Contact>>;
}

// ==========================================
// StatsStore - 统计
// ==========================================
pub trait StatsStore {
    fn operator_contact_stats(&self) -> RepositoryResult<Vec<OperatorStats>>;

    fn source_contact_stats(&self) -> RepositoryResult<Vec<SourceStats>>;
}

/// 全部能力的聚合
pub trait DispatchStore:
    LeadStore + OperatorStore + SourceStore + WeightStore + ContactStore + StatsStore
{
}

impl<T> DispatchStore for T where
    T: LeadStore + OperatorStore + SourceStore + WeightStore + ContactStore + StatsStore
{
}
