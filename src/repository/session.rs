// ==========================================
// 线索分配系统 - 数据库句柄与事务会话
// ==========================================
// 职责: 显式给出事务边界
// - read:       DEFERRED 事务（只读查询）
// - write:      IMMEDIATE 事务（开始即持有写锁，跨连接串行化"读负载 → 写接触"）
// - autocommit: 不开事务，每条语句独立提交
// ==========================================

use crate::db::{configure_sqlite_connection_with_timeout, init_schema, DEFAULT_BUSY_TIMEOUT_MS};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ==========================================
// StoreSession - 绑定在一个连接/事务上的仓储会话
// ==========================================
/// 各仓储 Trait 的 rusqlite 实现都挂在这个类型上（见 *_repo.rs）
///
/// 红线: 会话不自行提交/回滚，生命周期内的所有语句属于同一事务
pub struct StoreSession<'c> {
    conn: &'c Connection,
}

impl<'c> StoreSession<'c> {
    /// 基于连接（或 Transaction，经 Deref）创建会话
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn conn(&self) -> &Connection {
        self.conn
    }
}

// ==========================================
// Database - 共享数据库句柄
// ==========================================
/// 同一句柄内的调用由 Mutex 串行；不同句柄（不同连接/进程）之间由 SQLite 锁串行
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// 打开数据库文件并初始化 schema
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        Self::open_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// 打开数据库文件（指定 busy_timeout）
    pub fn open_with_timeout(db_path: &str, busy_timeout_ms: u64) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::prepare(conn, busy_timeout_ms)
    }

    /// 内存数据库（单元测试用）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::prepare(conn, DEFAULT_BUSY_TIMEOUT_MS)
    }

    fn prepare(conn: Connection, busy_timeout_ms: u64) -> RepositoryResult<Self> {
        configure_sqlite_connection_with_timeout(&conn, busy_timeout_ms)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 共享底层连接（供 ConfigManager 等复用）
    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    /// 获取数据库连接
    ///
    /// 锁中毒时继续使用连接：持锁方 panic 时未提交的事务已随 Transaction 析构回滚
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// 在 DEFERRED 事务内执行只读操作
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreSession<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        self.run_in_transaction(TransactionBehavior::Deferred, f)
    }

    /// 在 IMMEDIATE 事务内执行读写操作
    ///
    /// 闭包返回 Err 时整个事务回滚
    pub fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreSession<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        self.run_in_transaction(TransactionBehavior::Immediate, f)
    }

    /// 不开事务，语句逐条自动提交
    pub fn autocommit<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreSession<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let conn = self.get_conn()?;
        let session = StoreSession::new(&conn);
        f(&session)
    }

    fn run_in_transaction<T, E, F>(&self, behavior: TransactionBehavior, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreSession<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let value = {
            let session = StoreSession::new(&tx);
            f(&session)?
        };

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(value)
    }
}
