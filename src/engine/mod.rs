// ==========================================
// 线索分配系统 - 引擎层
// ==========================================
// 职责: 实现分配业务规则,不拼 SQL
// 红线: Engine 只依赖仓储 Trait，事务边界由编排器给出
// ==========================================

pub mod capacity;
pub mod clock;
pub mod contact_ledger;
pub mod error;
pub mod lead_registry;
pub mod orchestrator;
pub mod random;
pub mod selection;
pub mod weight_table;

// 重导出核心引擎
pub use capacity::CapacityTracker;
pub use clock::{Clock, FixedClock, SystemClock};
pub use contact_ledger::ContactLedger;
pub use error::{DispatchError, DispatchResult};
pub use lead_registry::LeadRegistry;
pub use orchestrator::{ContactEvent, DispatchOrchestrator, DispatchOutcome};
pub use random::{FixedRandom, RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use selection::{pick_weighted, SelectionEngine};
pub use weight_table::WeightTable;
