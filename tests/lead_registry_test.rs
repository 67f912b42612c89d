// ==========================================
// 线索登记集成测试
// ==========================================
// 职责: 验证 external_id 幂等解析、名称回填、多连接并发解析
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod lead_registry_test {
    use lead_dispatch::engine::{DispatchError, FixedRandom};
    use lead_dispatch::repository::store::LeadStore;
    use lead_dispatch::repository::Database;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use crate::test_helpers::{create_test_db, orchestrator_with};

    #[test]
    fn test_resolve_is_idempotent_across_handles() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let db1 = Database::open(&db_path).unwrap();
        let db2 = Database::open(&db_path).unwrap();

        let first = orchestrator_with(&db1, Arc::new(FixedRandom(0.0)))
            .resolve_lead("tg:42", None)
            .unwrap();
        let second = orchestrator_with(&db2, Arc::new(FixedRandom(0.0)))
            .resolve_lead("tg:42", Some("Pavel"))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_deref(), Some("Pavel"));

        let stored = db1.read(|s| s.find_lead(first.id)).unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Pavel"));
        println!("✅ 跨连接幂等解析测试通过");
    }

    #[test]
    fn test_existing_name_is_never_overwritten() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let db = Database::open(&db_path).unwrap();
        let orch = orchestrator_with(&db, Arc::new(FixedRandom(0.0)));

        orch.resolve_lead("u1", Some("Alice")).unwrap();
        let again = orch.resolve_lead("u1", Some("Mallory")).unwrap();
        let blank = orch.resolve_lead("u1", Some("")).unwrap();

        assert_eq!(again.name.as_deref(), Some("Alice"));
        assert_eq!(blank.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_empty_external_id_rejected() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let db = Database::open(&db_path).unwrap();
        let orch = orchestrator_with(&db, Arc::new(FixedRandom(0.0)));

        assert!(matches!(
            orch.resolve_lead("", None),
            Err(DispatchError::InvalidInput(_))
        ));
        assert!(db.read(|s| s.list_leads()).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_resolution_creates_single_lead() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let workers = 8;

        // 各线程独立连接，先在主线程打开
        let handles: Vec<Database> = (0..workers)
            .map(|_| Database::open(&db_path).unwrap())
            .collect();
        let barrier = Arc::new(Barrier::new(workers));

        let threads: Vec<_> = handles
            .into_iter()
            .enumerate()
            .map(|(i, db)| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let orch = orchestrator_with(&db, Arc::new(FixedRandom(0.0)));
                    barrier.wait();
                    let name = format!("name-{}", i);
                    orch.resolve_lead("shared-ext", Some(&name)).map(|lead| lead.id)
                })
            })
            .collect();

        let ids: Vec<i64> = threads
            .into_iter()
            .map(|t| t.join().unwrap().unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] == w[1]), "ids diverged: {:?}", ids);

        let db = Database::open(&db_path).unwrap();
        let leads = db.read(|s| s.list_leads()).unwrap();
        assert_eq!(leads.len(), 1);
        assert!(leads[0].name.as_deref().map(|n| n.starts_with("name-")).unwrap_or(false));
        println!("✅ 并发解析唯一性测试通过");
    }
}
