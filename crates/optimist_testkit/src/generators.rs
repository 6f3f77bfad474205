//! Property-based test generators using proptest.
//!
//! Strategies produce write plans against a small pool of integer signals,
//! which is enough to exercise capture ordering, first-touch and nesting.

use proptest::prelude::*;

/// A single write against signal `signal` of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOp {
    /// Index into the signal pool.
    pub signal: usize,
    /// Value to store.
    pub value: i32,
}

/// Where a write happens relative to the transaction under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Write inside `execute`.
    Inside(WriteOp),
    /// Write outside any transaction.
    Outside(WriteOp),
    /// Run a nested transaction inside `execute` and settle it.
    Nested {
        /// Writes made by the nested transaction.
        writes: Vec<WriteOp>,
        /// Whether the nested transaction commits or rolls back.
        commit: bool,
    },
}

/// Strategy for initial values of a signal pool.
pub fn initial_values_strategy(pool: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), pool..=pool)
}

/// Strategy for one write against a pool of `pool` signals.
pub fn write_op_strategy(pool: usize) -> impl Strategy<Value = WriteOp> {
    (0..pool, any::<i32>()).prop_map(|(signal, value)| WriteOp { signal, value })
}

/// Strategy for a sequence of writes.
pub fn write_sequence_strategy(
    pool: usize,
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<WriteOp>> {
    prop::collection::vec(write_op_strategy(pool), min_ops..max_ops)
}

/// Strategy for a mixed plan of inside, outside and nested steps.
pub fn plan_strategy(pool: usize, max_steps: usize) -> impl Strategy<Value = Vec<PlanStep>> {
    let step = prop_oneof![
        4 => write_op_strategy(pool).prop_map(PlanStep::Inside),
        1 => write_op_strategy(pool).prop_map(PlanStep::Outside),
        1 => (write_sequence_strategy(pool, 1, 4), any::<bool>())
            .prop_map(|(writes, commit)| PlanStep::Nested { writes, commit }),
    ];
    prop::collection::vec(step, 0..max_steps)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn writes_stay_in_pool(ops in write_sequence_strategy(3, 0, 20)) {
            prop_assert!(ops.iter().all(|op| op.signal < 3));
        }

        #[test]
        fn initial_values_match_pool(values in initial_values_strategy(5)) {
            prop_assert_eq!(values.len(), 5);
        }

        #[test]
        fn nested_steps_are_never_empty(plan in plan_strategy(4, 16)) {
            for step in plan {
                if let PlanStep::Nested { writes, .. } = step {
                    prop_assert!(!writes.is_empty());
                }
            }
        }
    }

    #[test]
    fn quick_runs_fewer_cases() {
        assert!(PropTestConfig::quick().cases < PropTestConfig::default().cases);
        assert!(PropTestConfig::thorough().cases > PropTestConfig::default().cases);
        assert_eq!(PropTestConfig::quick().to_proptest_config().cases, 32);
    }
}
