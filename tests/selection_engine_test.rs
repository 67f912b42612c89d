// ==========================================
// 操作员选择引擎集成测试
// ==========================================
// 职责: 验证加权选择、满载排除、非正权重与停用操作员的处理
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod selection_engine_test {
    use lead_dispatch::domain::{ContactStatus, OperatorUpdate};
    use lead_dispatch::engine::{
        DispatchError, FixedRandom, SelectionEngine, SequenceRandom, ThreadRandom,
    };
    use lead_dispatch::repository::store::OperatorStore;
    use lead_dispatch::repository::Database;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::test_helpers::{
        create_test_db, orchestrator_with, seed_operator, seed_source, seed_weight,
    };

    fn open() -> (tempfile::NamedTempFile, Database) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let db = Database::open(&db_path).unwrap();
        (temp_file, db)
    }

    #[test]
    fn test_fixed_draw_picks_heavier_operator() {
        let (_tmp, db) = open();
        let op1 = seed_operator(&db, "Op1", 10);
        let op2 = seed_operator(&db, "Op2", 10);
        let source = seed_source(&db, "Bot A");
        seed_weight(&db, op1.id, source.id, 1);
        seed_weight(&db, op2.id, source.id, 3);

        // 总权重 4，r = 2.5 → Op2
        let engine = SelectionEngine::new(Arc::new(FixedRandom(2.5)));
        let chosen = db.read(|s| engine.choose_operator(s, source.id)).unwrap();

        assert_eq!(chosen.map(|op| op.id), Some(op2.id));
        println!("✅ 固定抽样选择测试通过");
    }

    #[test]
    fn test_operator_at_load_limit_is_excluded() {
        let (_tmp, db) = open();
        let op = seed_operator(&db, "Limited Op", 1);
        let source = seed_source(&db, "Bot B");
        seed_weight(&db, op.id, source.id, 10);

        let orch = orchestrator_with(&db, Arc::new(FixedRandom(0.0)));
        let first = orch.register_contact(&event("user_1", source.id)).unwrap();
        assert_eq!(first.contact.operator_id, Some(op.id));

        let engine = SelectionEngine::new(Arc::new(FixedRandom(0.0)));
        let chosen = db.read(|s| engine.choose_operator(s, source.id)).unwrap();
        assert!(chosen.is_none(), "满载操作员不应被选中");
        println!("✅ 满载排除测试通过");
    }

    #[test]
    fn test_non_positive_weights_are_never_chosen() {
        let (_tmp, db) = open();
        let zero = seed_operator(&db, "Zero", 10);
        let negative = seed_operator(&db, "Negative", 10);
        let positive = seed_operator(&db, "Positive", 10);
        let source = seed_source(&db, "Web");
        seed_weight(&db, zero.id, source.id, 0);
        seed_weight(&db, negative.id, source.id, -5);
        seed_weight(&db, positive.id, source.id, 1);

        let engine = SelectionEngine::new(Arc::new(ThreadRandom));
        for _ in 0..200 {
            let chosen = db.read(|s| engine.choose_operator(s, source.id)).unwrap();
            assert_eq!(chosen.map(|op| op.id), Some(positive.id));
        }
    }

    #[test]
    fn test_only_non_positive_weights_yields_none() {
        let (_tmp, db) = open();
        let op = seed_operator(&db, "Zero", 10);
        let source = seed_source(&db, "Web");
        seed_weight(&db, op.id, source.id, 0);

        let engine = SelectionEngine::new(Arc::new(FixedRandom(0.0)));
        let chosen = db.read(|s| engine.choose_operator(s, source.id)).unwrap();
        assert!(chosen.is_none());
    }

    #[test]
    fn test_inactive_operator_is_skipped() {
        let (_tmp, db) = open();
        let inactive = seed_operator(&db, "Off", 10);
        let active = seed_operator(&db, "On", 10);
        let source = seed_source(&db, "Bot");
        seed_weight(&db, inactive.id, source.id, 100);
        seed_weight(&db, active.id, source.id, 1);
        db.write(|s| {
            s.update_operator(
                inactive.id,
                &OperatorUpdate {
                    load_limit: None,
                    is_active: Some(false),
                },
            )
        })
        .unwrap();

        let engine = SelectionEngine::new(Arc::new(FixedRandom(0.0)));
        let chosen = db.read(|s| engine.choose_operator(s, source.id)).unwrap();
        assert_eq!(chosen.map(|op| op.id), Some(active.id));
    }

    #[test]
    fn test_unknown_source_is_an_error() {
        let (_tmp, db) = open();
        let engine = SelectionEngine::new(Arc::new(FixedRandom(0.0)));
        let result = db.read(|s| engine.choose_operator(s, 12345));
        assert!(matches!(
            result,
            Err(DispatchError::SourceNotFound { source_id: 12345 })
        ));
    }

    #[test]
    fn test_selection_frequency_converges_to_weights() {
        let (_tmp, db) = open();
        let a = seed_operator(&db, "A", 1_000);
        let b = seed_operator(&db, "B", 1_000);
        let c = seed_operator(&db, "C", 1_000);
        let source = seed_source(&db, "Bot");
        seed_weight(&db, a.id, source.id, 1);
        seed_weight(&db, b.id, source.id, 2);
        seed_weight(&db, c.id, source.id, 7);

        let draws = 1_000;
        let engine = SelectionEngine::new(Arc::new(SequenceRandom::new(draws)));
        let mut hits: HashMap<i64, u64> = HashMap::new();
        for _ in 0..draws {
            let chosen = db
                .read(|s| engine.choose_operator(s, source.id))
                .unwrap()
                .unwrap();
            *hits.entry(chosen.id).or_default() += 1;
        }

        // 分层抽样下频率与权重比例一致（允许 1 次边界误差）
        let expect = |id: i64, share: u64| {
            let got = hits.get(&id).copied().unwrap_or(0);
            let want = draws * share / 10;
            assert!(got.abs_diff(want) <= 1, "operator {}: got {}, want {}", id, got, want);
        };
        expect(a.id, 1);
        expect(b.id, 2);
        expect(c.id, 7);
        println!("✅ 权重收敛测试通过: {:?}", hits);
    }

    #[test]
    fn test_closing_contact_restores_eligibility() {
        let (_tmp, db) = open();
        let op = seed_operator(&db, "Solo", 1);
        let source = seed_source(&db, "Bot");
        seed_weight(&db, op.id, source.id, 1);

        let orch = orchestrator_with(&db, Arc::new(FixedRandom(0.0)));
        let first = orch.register_contact(&event("u1", source.id)).unwrap();
        assert!(orch.choose_operator(source.id).unwrap().is_none());

        orch.set_status(first.contact.id, ContactStatus::Closed).unwrap();
        assert_eq!(
            orch.choose_operator(source.id).unwrap().map(|o| o.id),
            Some(op.id)
        );
    }

    #[test]
    fn test_max_weight_registration_keeps_database_usable() {
        let (_tmp, db) = open();
        let heavy = seed_operator(&db, "Heavy", 10);
        let light = seed_operator(&db, "Light", 10);
        let source = seed_source(&db, "Bot");
        seed_weight(&db, heavy.id, source.id, i64::MAX);
        seed_weight(&db, light.id, source.id, 1);

        let orch = orchestrator_with(&db, Arc::new(ThreadRandom));
        for i in 0..5 {
            let outcome = orch
                .register_contact(&event(&format!("big-{}", i), source.id))
                .unwrap();
            assert!(outcome.operator.is_some());
        }
        assert_eq!(
            orch.active_count(heavy.id).unwrap() + orch.active_count(light.id).unwrap(),
            5
        );
    }

    fn event(external_id: &str, source_id: i64) -> lead_dispatch::engine::ContactEvent {
        lead_dispatch::engine::ContactEvent {
            lead_external_id: external_id.to_string(),
            lead_name: None,
            source_id,
            payload: None,
        }
    }
}
