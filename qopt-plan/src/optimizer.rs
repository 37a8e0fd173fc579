//! The top-level optimizer facade (spec §4.4, §6).

use qopt_core::context::{Catalog, Configuration};
use qopt_core::driver;
use qopt_core::error::OptimizerError;
use qopt_core::memo::Memo;

use crate::build;
use crate::catalog::DatasetMetadata;
use crate::expr::Expr;
use crate::operator::{OperatorData, OperatorKind, PlanOperator};
use crate::registry;

/// Owns the fixed rule set and the collaborators (catalog, configuration)
/// a caller constructs once and reuses across queries.
pub struct Optimizer<'a> {
    catalog: &'a dyn Catalog<DatasetMetadata>,
    config: &'a dyn Configuration,
    rules: Vec<Box<dyn qopt_core::rule::Rule<OperatorKind, OperatorData>>>,
}

impl<'a> Optimizer<'a> {
    pub fn new(catalog: &'a dyn Catalog<DatasetMetadata>, config: &'a dyn Configuration) -> Self {
        Self {
            catalog,
            config,
            rules: registry::rule_set(),
        }
    }

    pub fn catalog(&self) -> &dyn Catalog<DatasetMetadata> {
        self.catalog
    }

    /// Construct a `LogicalGet` for `dataset`, resolving its `is_video`
    /// flag via the catalog (spec §6, "Catalog interface"; spec §7,
    /// `CatalogLookupFailed`). Every rule afterwards reads `is_video` off
    /// the resulting operator's own attributes rather than calling the
    /// catalog again.
    pub fn build_logical_get(
        &self,
        dataset: impl Into<String>,
        alias: impl Into<String>,
        predicate: Option<Expr>,
        target_list: Vec<Expr>,
    ) -> Result<PlanOperator, OptimizerError> {
        let dataset = dataset.into();
        let metadata = self
            .catalog
            .get_dataset_metadata(&dataset)
            .map_err(|e| OptimizerError::CatalogLookupFailed(dataset.clone(), e))?;
        Ok(build::logical_get(dataset, metadata.is_video, alias, predicate, target_list))
    }

    /// Insert, explore, implement, extract (spec §4.4). `plan`'s
    /// `LogicalGet` nodes are expected to already carry the catalog's
    /// `is_video` flag in their attributes; this optimizer never calls
    /// the catalog itself during optimization.
    pub fn optimize(&self, plan: &PlanOperator) -> Result<PlanOperator, OptimizerError> {
        let mut memo = Memo::new();
        let root = driver::insert_plan(&mut memo, plan);
        driver::explore(&mut memo, &self.rules, self.config)?;
        driver::implement(&mut memo, &self.rules, self.config)?;
        driver::extract(&memo, root)
    }
}
