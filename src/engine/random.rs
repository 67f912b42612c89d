// ==========================================
// 线索分配系统 - 随机源
// ==========================================
// 职责: 为加权选择提供 [low, high) 上的均匀抽样
// 约定: 选择引擎只依赖 RandomSource Trait，测试注入确定性实现
// ==========================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub trait RandomSource: Send + Sync {
    /// 在 [low, high) 上均匀抽样
    ///
    /// high <= low 时返回 low
    fn uniform(&self, low: f64, high: f64) -> f64;
}

// ==========================================
// ThreadRandom - 线程本地随机数（生产默认）
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        // NaN 端点同样视为退化区间
        if low.is_nan() || high.is_nan() || high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }
}

// ==========================================
// SeededRandom - 固定种子（可复现的演示数据）
// ==========================================
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        // NaN 端点同样视为退化区间
        if low.is_nan() || high.is_nan() || high <= low {
            return low;
        }
        // 锁中毒时继续使用内部状态
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(low..high)
    }
}

// ==========================================
// FixedRandom - 每次返回同一个值
// ==========================================
/// 不做区间裁剪，可用于构造 r 越界的边界场景
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn uniform(&self, _low: f64, _high: f64) -> f64 {
        self.0
    }
}

// ==========================================
// SequenceRandom - 分层等距抽样
// ==========================================
/// 第 i 次抽样返回 low + (high - low) * ((i mod n) + 0.5) / n
///
/// 连续 n 次抽样恰好均匀覆盖 [low, high)，用于概率收敛类测试
#[derive(Debug)]
pub struct SequenceRandom {
    strata: u64,
    counter: AtomicU64,
}

impl SequenceRandom {
    pub fn new(strata: u64) -> Self {
        Self {
            strata: strata.max(1),
            counter: AtomicU64::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        let i = self.counter.fetch_add(1, Ordering::Relaxed) % self.strata;
        let fraction = (i as f64 + 0.5) / self.strata as f64;
        low + (high - low) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom;
        for _ in 0..1000 {
            let r = random.uniform(0.0, 4.0);
            assert!((0.0..4.0).contains(&r), "out of range: {}", r);
        }
    }

    #[test]
    fn test_degenerate_range_returns_low() {
        assert_eq!(ThreadRandom.uniform(3.0, 3.0), 3.0);
        assert_eq!(SeededRandom::new(7).uniform(5.0, 1.0), 5.0);
    }

    #[test]
    fn test_nan_bounds_do_not_panic() {
        assert_eq!(ThreadRandom.uniform(0.0, f64::NAN), 0.0);
        assert!(ThreadRandom.uniform(f64::NAN, 1.0).is_nan());
        assert_eq!(SeededRandom::new(7).uniform(2.0, f64::NAN), 2.0);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let left: Vec<f64> = (0..20).map(|_| a.uniform(0.0, 10.0)).collect();
        let right: Vec<f64> = (0..20).map(|_| b.uniform(0.0, 10.0)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_sequence_random_covers_strata() {
        let random = SequenceRandom::new(4);
        let draws: Vec<f64> = (0..5).map(|_| random.uniform(0.0, 4.0)).collect();
        assert_eq!(draws, vec![0.5, 1.5, 2.5, 3.5, 0.5]);
    }
}
