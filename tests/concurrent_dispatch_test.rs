// ==========================================
// 并发分配测试
// ==========================================
// 职责: 多连接并发登记接触时 load_limit 不被突破
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod concurrent_dispatch_test {
    use lead_dispatch::engine::{ContactEvent, ThreadRandom};
    use lead_dispatch::repository::store::{ContactStore, StatsStore};
    use lead_dispatch::repository::Database;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use crate::test_helpers::{
        create_test_db, orchestrator_with, seed_operator, seed_source, seed_weight,
    };

    #[test]
    fn test_load_limit_holds_under_concurrency() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let setup = Database::open(&db_path).unwrap();

        let a = seed_operator(&setup, "A", 3);
        let b = seed_operator(&setup, "B", 2);
        let source = seed_source(&setup, "Bot");
        seed_weight(&setup, a.id, source.id, 1);
        seed_weight(&setup, b.id, source.id, 1);

        let workers = 6;
        let per_worker = 4;
        let handles: Vec<Database> = (0..workers)
            .map(|_| Database::open(&db_path).unwrap())
            .collect();
        let barrier = Arc::new(Barrier::new(workers));

        let threads: Vec<_> = handles
            .into_iter()
            .enumerate()
            .map(|(w, db)| {
                let barrier = barrier.clone();
                let source_id = source.id;
                thread::spawn(move || {
                    let orch = orchestrator_with(&db, Arc::new(ThreadRandom));
                    barrier.wait();
                    let mut assigned = 0;
                    for i in 0..per_worker {
                        let outcome = orch
                            .register_contact(&ContactEvent {
                                lead_external_id: format!("w{}-c{}", w, i),
                                lead_name: None,
                                source_id,
                                payload: None,
                            })
                            .unwrap();
                        if outcome.operator.is_some() {
                            assigned += 1;
                        }
                    }
                    assigned
                })
            })
            .collect();

        let assigned: i32 = threads.into_iter().map(|t| t.join().unwrap()).sum();

        let active_a = setup.read(|s| s.count_active_contacts(a.id)).unwrap();
        let active_b = setup.read(|s| s.count_active_contacts(b.id)).unwrap();
        assert!(active_a <= a.load_limit, "A over limit: {}", active_a);
        assert!(active_b <= b.load_limit, "B over limit: {}", active_b);

        // 24 次登记远超总容量 5，容量必然被占满
        assert_eq!(active_a, 3);
        assert_eq!(active_b, 2);
        assert_eq!(assigned, 5);

        let total: i64 = setup
            .read(|s| s.source_contact_stats())
            .unwrap()
            .iter()
            .map(|row| row.contacts_count)
            .sum();
        assert_eq!(total, (workers * per_worker) as i64);
        println!("✅ 并发分配容量约束测试通过");
    }
}
