// ==========================================
// 线索分配系统 - 演示数据生成
// ==========================================
// 用法: seed_demo_data [db_path] [contact_count] [seed]
// 行为: 备份并重置数据库 → 写入操作员/来源/权重 → 批量登记接触 → 打印分布
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use lead_dispatch::api::{ContactCreate, OperatorCreate, SourceCreate, WeightSet};
use lead_dispatch::app::{get_default_db_path, AppState};
use lead_dispatch::engine::{SeededRandom, SystemClock};
use lead_dispatch::logging;

const DEFAULT_CONTACT_COUNT: usize = 60;
const DEFAULT_SEED: u64 = 20_240_601;

/// (名称, 负载上限)
const OPERATORS: &[(&str, i64)] = &[("Anna", 10), ("Boris", 5), ("Vera", 20)];

/// (名称, 编码)
const SOURCES: &[(&str, &str)] = &[("Telegram bot", "tg_bot"), ("Website form", "web_form")];

/// (操作员下标, 来源下标, 权重)
const WEIGHTS: &[(usize, usize, i64)] = &[
    (0, 0, 10),
    (1, 0, 30),
    (2, 0, 60),
    (0, 1, 1),
    (2, 1, 3),
];

fn main() -> Result<()> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let contact_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_CONTACT_COUNT);
    let seed = std::env::args()
        .nth(3)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    backup_and_reset_db(&db_path)?;

    let state = AppState::with_components(
        db_path.clone(),
        Arc::new(SeededRandom::new(seed)),
        Arc::new(SystemClock),
    )
    .map_err(|e| anyhow!(e))?;

    let source_ids = seed_reference_data(&state)?;
    register_demo_contacts(&state, &source_ids, contact_count)?;
    print_distribution(&state)?;

    eprintln!("Seeded {} ({} contacts, seed={})", db_path, contact_count, seed);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path).with_context(|| format!("备份失败: {}", db_path))?;
    fs::remove_file(path).with_context(|| format!("删除旧库失败: {}", db_path))?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

/// 写入操作员、来源与权重，返回来源 id 列表
fn seed_reference_data(state: &AppState) -> Result<Vec<i64>> {
    let mut operator_ids = Vec::with_capacity(OPERATORS.len());
    for (name, load_limit) in OPERATORS {
        let op = state.operator_api.create_operator(&OperatorCreate {
            name: name.to_string(),
            load_limit: Some(*load_limit),
        })?;
        operator_ids.push(op.id);
    }

    let mut source_ids = Vec::with_capacity(SOURCES.len());
    for (name, code) in SOURCES {
        let source = state.source_api.create_source(&SourceCreate {
            name: name.to_string(),
            code: Some(code.to_string()),
        })?;
        source_ids.push(source.id);
    }

    for &(op_idx, src_idx, weight) in WEIGHTS {
        state.source_api.set_weight(&WeightSet {
            operator_id: operator_ids[op_idx],
            source_id: source_ids[src_idx],
            weight,
        })?;
    }

    Ok(source_ids)
}

/// 轮流从各来源登记接触；线索 id 取模复用，模拟回头客
fn register_demo_contacts(state: &AppState, source_ids: &[i64], count: usize) -> Result<()> {
    let lead_pool = (count / 3).max(1);
    let mut unassigned = 0usize;

    for i in 0..count {
        let source_id = source_ids[i % source_ids.len()];
        let lead_no = i % lead_pool;
        let view = state.contact_api.register_contact(&ContactCreate {
            lead_external_id: format!("demo-lead-{:04}", lead_no),
            lead_name: Some(format!("Demo Lead {}", lead_no)),
            source_id,
            payload: Some(format!("demo message #{}", i)),
        })?;
        if view.operator.is_none() {
            unassigned += 1;
        }
    }

    if unassigned > 0 {
        eprintln!("{} contacts left unassigned (all operators at load limit)", unassigned);
    }
    Ok(())
}

fn print_distribution(state: &AppState) -> Result<()> {
    println!("== contacts by operator ==");
    for row in state.stats_api.stats_by_operator()? {
        println!("  #{:<3} {:<12} {}", row.operator_id, row.operator_name, row.contacts_count);
    }

    println!("== contacts by source ==");
    for row in state.stats_api.stats_by_source()? {
        println!("  #{:<3} {:<12} {}", row.source_id, row.source_name, row.contacts_count);
    }

    let leads = state.lead_api.list_leads()?;
    println!("== leads: {} ==", leads.len());
    Ok(())
}
