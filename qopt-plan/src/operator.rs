//! The closed operator kind set (spec §3, "Operator") and the attribute
//! payload paired with each kind, plus the `NodeKind`/`NodeAttributes`
//! impls that let `qopt-core`'s memo and pattern matcher operate on them.
//!
//! A logical kind and its physical counterpart frequently share the same
//! attribute shape (a `LogicalFilter` and a `PredicatePlan` are both just
//! "a predicate plus children"), so `OperatorData` has one variant per
//! distinct payload shape, not one per `OperatorKind` tag.

use qopt_core::memo::GroupId;
use qopt_core::node::{NodeAttributes, NodeKind, Operator};

use crate::expr::Expr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JoinType {
    Inner,
    Lateral,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OperatorKind {
    LogicalGet,
    LogicalFilter,
    LogicalJoin(JoinType),
    LogicalProject,
    LogicalSample,
    LogicalUnion,
    LogicalOrderBy,
    LogicalLimit,
    LogicalInsert,
    LogicalCreate,
    LogicalLoadData,
    LogicalUpload,
    LogicalCreateUdf,
    LogicalDropUdf,
    LogicalDrop,
    LogicalRename,
    LogicalShow,
    LogicalCreateMaterializedView,
    LogicalQueryDerivedGet,
    LogicalFunctionScan,

    SeqScan,
    PredicatePlan,
    ProjectPlan,
    HashJoinBuild,
    HashJoinProbe,
    LateralJoinPlan,
    FunctionScanPlan,
    UniformSamplePlan,
    UnionPlan,
    OrderByPlan,
    LimitPlan,
    InsertPlan,
    CreatePlan,
    LoadDataPlan,
    UploadPlan,
    CreateUdfPlan,
    DropPlan,
    DropUdfPlan,
    RenamePlan,
    ShowInfoPlan,
    CreateMaterializedViewPlan,
    StoragePlan,

    Dummy,
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl NodeKind for OperatorKind {
    fn dummy() -> Self {
        OperatorKind::Dummy
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct GetData {
    pub dataset: String,
    pub is_video: bool,
    pub alias: String,
    pub predicate: Option<Expr>,
    pub target_list: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FilterData {
    pub predicate: Expr,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct JoinData {
    pub join_type: JoinType,
    pub predicate: Option<Expr>,
    pub project: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ProjectData {
    pub target_list: Vec<Expr>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SampleData {
    pub sample_freq: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct UnionData {
    pub all: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct OrderByData {
    pub orderby_list: Vec<(Expr, bool)>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LimitData {
    pub limit_count: i64,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct InsertData {
    pub table: String,
    pub column_list: Vec<String>,
    pub value_list: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CreateData {
    pub table: String,
    pub column_list: Vec<String>,
    pub if_not_exists: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LoadDataData {
    pub table: String,
    pub path: String,
    pub column_list: Vec<String>,
    pub file_options: Vec<String>,
    /// `None` on the logical operator; resolved to a concrete byte count
    /// by `LogicalLoadData`'s implementation rule (spec §4.3, §6).
    pub batch_mem_size: Option<i64>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct UploadData {
    pub path: String,
    pub video_blob: String,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CreateUdfData {
    pub name: String,
    pub if_not_exists: bool,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub impl_path: String,
    pub udf_type: String,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DropUdfData {
    pub name: String,
    pub if_exists: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DropData {
    pub table_refs: Vec<String>,
    pub if_exists: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RenameData {
    pub old_table: String,
    pub new_name: String,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ShowData {
    pub show_type: String,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CreateMaterializedViewData {
    pub view: String,
    pub col_list: Vec<String>,
    pub if_not_exists: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DerivedGetData {
    pub alias: String,
    pub predicate: Option<Expr>,
    pub target_list: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FunctionScanData {
    pub func_expr: Expr,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SeqScanData {
    pub target_list: Vec<Expr>,
    pub alias: String,
    pub predicate: Option<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StorageData {
    pub dataset: String,
    pub is_video: bool,
    pub batch_mem_size: i64,
    pub predicate: Option<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct HashJoinBuildData {
    pub join_type: JoinType,
    pub keys: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct HashJoinProbeData {
    pub join_type: JoinType,
    pub keys: Vec<Expr>,
    pub predicate: Option<Expr>,
    pub project: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LateralJoinData {
    pub predicate: Option<Expr>,
    pub project: Vec<Expr>,
}

/// The attribute payload paired with an `OperatorKind` (spec §3). One
/// variant per distinct payload shape; logical/physical pairs that carry
/// the same fields (e.g. `LogicalFilter`/`PredicatePlan`) share a variant.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum OperatorData {
    Get(GetData),
    Filter(FilterData),
    Join(JoinData),
    Project(ProjectData),
    Sample(SampleData),
    Union(UnionData),
    OrderBy(OrderByData),
    Limit(LimitData),
    Insert(InsertData),
    Create(CreateData),
    LoadData(LoadDataData),
    Upload(UploadData),
    CreateUdf(CreateUdfData),
    DropUdf(DropUdfData),
    Drop(DropData),
    Rename(RenameData),
    Show(ShowData),
    CreateMaterializedView(CreateMaterializedViewData),
    DerivedGet(DerivedGetData),
    FunctionScan(FunctionScanData),
    SeqScan(SeqScanData),
    Storage(StorageData),
    HashJoinBuild(HashJoinBuildData),
    HashJoinProbe(HashJoinProbeData),
    LateralJoin(LateralJoinData),
    Dummy(GroupId),
}

impl NodeAttributes for OperatorData {
    fn own_aliases(&self) -> Vec<String> {
        match self {
            OperatorData::Get(g) => vec![g.alias.clone()],
            OperatorData::DerivedGet(d) => vec![d.alias.clone()],
            _ => Vec::new(),
        }
    }

    fn dummy(group_id: GroupId) -> Self {
        OperatorData::Dummy(group_id)
    }

    fn as_dummy_group(&self) -> Option<GroupId> {
        match self {
            OperatorData::Dummy(id) => Some(*id),
            _ => None,
        }
    }
}

pub type PlanOperator = Operator<OperatorKind, OperatorData>;
