//! Test-only builder helpers, mirroring the teacher's
//! `testing::new_dummy_optimizer` convenience.

use qopt_core::context::StaticConfiguration;

use crate::catalog::{ColumnInfo, DatasetMetadata, StaticCatalog};
use crate::expr::DataType;
use crate::optimizer::Optimizer;

/// A catalog with a single non-video dataset named `t` with an integer
/// `id` column, for tests that don't care about schema specifics.
pub fn new_test_catalog() -> StaticCatalog {
    StaticCatalog::new().with_dataset(
        "t",
        DatasetMetadata {
            is_video: false,
            columns: vec![ColumnInfo { name: "id".into(), data_type: DataType::Integer }],
        },
    )
}

pub fn new_test_optimizer<'a>(
    catalog: &'a StaticCatalog,
    config: &'a StaticConfiguration,
) -> Optimizer<'a> {
    Optimizer::new(catalog, config)
}
