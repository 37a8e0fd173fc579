//! External collaborators the optimizer reads from, and the per-call
//! context bundling them with the memo (spec §6, §9).
//!
//! The source this optimizer is modeled on embeds the rule library, the
//! configuration store, and the catalog as process-wide singletons. Here
//! all three are passed as constructor parameters so tests can substitute
//! each one; nothing in this crate reaches for a global.

use std::collections::HashMap;

use crate::memo::Memo;
use crate::node::{NodeAttributes, NodeKind};

/// Read-only schema/metadata lookup (spec §6, "Catalog interface").
/// Implemented by the surrounding database; the optimizer never mutates
/// it.
pub trait Catalog<M>: Send + Sync {
    fn get_dataset_metadata(&self, name: &str) -> anyhow::Result<M>;
}

/// Read-only configuration lookup (spec §6, "Configuration interface").
pub trait Configuration: Send + Sync {
    fn get_i64(&self, section: &str, key: &str) -> Option<i64>;
}

/// An in-memory `Configuration` for tests and for embedding the optimizer
/// without a real configuration-loading subsystem.
#[derive(Clone, Debug, Default)]
pub struct StaticConfiguration {
    values: HashMap<(String, String), i64>,
}

impl StaticConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: &str, key: &str, value: i64) -> Self {
        self.values
            .insert((section.to_string(), key.to_string()), value);
        self
    }
}

impl Configuration for StaticConfiguration {
    fn get_i64(&self, section: &str, key: &str) -> Option<i64> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .copied()
    }
}

/// Bundles the memo with the read-only collaborators, passed to every
/// `Rule::check`/`Rule::apply` call (spec §9).
pub struct OptimizerContext<'a, T: NodeKind, A: NodeAttributes> {
    pub memo: &'a Memo<T, A>,
    pub config: &'a dyn Configuration,
}

impl<'a, T: NodeKind, A: NodeAttributes> OptimizerContext<'a, T, A> {
    pub fn new(memo: &'a Memo<T, A>, config: &'a dyn Configuration) -> Self {
        Self { memo, config }
    }

    pub fn batch_mem_size(&self) -> i64 {
        const DEFAULT_BATCH_MEM_SIZE: i64 = 30_000_000;
        self.config
            .get_i64("executor", "batch_mem_size")
            .unwrap_or(DEFAULT_BATCH_MEM_SIZE)
    }
}
