//! The concrete `Catalog` instantiation (spec §6). `qopt-core`'s
//! `Catalog<M>` trait is generic over the metadata type; this crate fixes
//! `M = DatasetMetadata`.

use std::collections::HashMap;

use qopt_core::context::Catalog;

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: crate::expr::DataType,
}

#[derive(Clone, Debug)]
pub struct DatasetMetadata {
    pub is_video: bool,
    pub columns: Vec<ColumnInfo>,
}

/// An in-memory catalog for tests and for embedding the optimizer
/// without a real schema-loading subsystem, mirroring
/// `qopt_core::context::StaticConfiguration`.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    datasets: HashMap<String, DatasetMetadata>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, metadata: DatasetMetadata) -> Self {
        self.datasets.insert(name.into(), metadata);
        self
    }
}

impl Catalog<DatasetMetadata> for StaticCatalog {
    fn get_dataset_metadata(&self, name: &str) -> anyhow::Result<DatasetMetadata> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown dataset `{name}`"))
    }
}
