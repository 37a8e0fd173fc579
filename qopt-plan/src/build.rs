//! Smart constructors pairing an `OperatorKind` with its `OperatorData`
//! payload. Rules and tests build operator trees through these rather
//! than constructing `Operator` directly, so a kind/payload mismatch
//! cannot slip in undetected.

use crate::expr::Expr;
use crate::operator::*;
use qopt_core::node::Operator;

pub fn logical_get(
    dataset: impl Into<String>,
    is_video: bool,
    alias: impl Into<String>,
    predicate: Option<Expr>,
    target_list: Vec<Expr>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalGet,
        OperatorData::Get(GetData {
            dataset: dataset.into(),
            is_video,
            alias: alias.into(),
            predicate,
            target_list,
        }),
    )
}

pub fn logical_filter(predicate: Expr, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalFilter,
        OperatorData::Filter(FilterData { predicate }),
        vec![child],
    )
}

pub fn logical_join(
    join_type: JoinType,
    predicate: Option<Expr>,
    project: Vec<Expr>,
    lhs: PlanOperator,
    rhs: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalJoin(join_type),
        OperatorData::Join(JoinData {
            join_type,
            predicate,
            project,
        }),
        vec![lhs, rhs],
    )
}

pub fn logical_project(target_list: Vec<Expr>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalProject,
        OperatorData::Project(ProjectData { target_list }),
        vec![child],
    )
}

pub fn logical_sample(sample_freq: i64, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalSample,
        OperatorData::Sample(SampleData { sample_freq }),
        vec![child],
    )
}

pub fn logical_union(all: bool, lhs: PlanOperator, rhs: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalUnion,
        OperatorData::Union(UnionData { all }),
        vec![lhs, rhs],
    )
}

pub fn logical_order_by(orderby_list: Vec<(Expr, bool)>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalOrderBy,
        OperatorData::OrderBy(OrderByData { orderby_list }),
        vec![child],
    )
}

pub fn logical_limit(limit_count: i64, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalLimit,
        OperatorData::Limit(LimitData { limit_count }),
        vec![child],
    )
}

pub fn logical_insert(
    table: impl Into<String>,
    column_list: Vec<String>,
    value_list: Vec<Expr>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalInsert,
        OperatorData::Insert(InsertData {
            table: table.into(),
            column_list,
            value_list,
        }),
    )
}

pub fn logical_create(
    table: impl Into<String>,
    column_list: Vec<String>,
    if_not_exists: bool,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalCreate,
        OperatorData::Create(CreateData {
            table: table.into(),
            column_list,
            if_not_exists,
        }),
    )
}

pub fn logical_load_data(
    table: impl Into<String>,
    path: impl Into<String>,
    column_list: Vec<String>,
    file_options: Vec<String>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalLoadData,
        OperatorData::LoadData(LoadDataData {
            table: table.into(),
            path: path.into(),
            column_list,
            file_options,
            batch_mem_size: None,
        }),
    )
}

pub fn logical_upload(path: impl Into<String>, video_blob: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalUpload,
        OperatorData::Upload(UploadData {
            path: path.into(),
            video_blob: video_blob.into(),
        }),
    )
}

pub fn logical_create_udf(
    name: impl Into<String>,
    if_not_exists: bool,
    inputs: Vec<String>,
    outputs: Vec<String>,
    impl_path: impl Into<String>,
    udf_type: impl Into<String>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalCreateUdf,
        OperatorData::CreateUdf(CreateUdfData {
            name: name.into(),
            if_not_exists,
            inputs,
            outputs,
            impl_path: impl_path.into(),
            udf_type: udf_type.into(),
        }),
    )
}

pub fn logical_drop_udf(name: impl Into<String>, if_exists: bool) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalDropUdf,
        OperatorData::DropUdf(DropUdfData {
            name: name.into(),
            if_exists,
        }),
    )
}

pub fn logical_drop(table_refs: Vec<String>, if_exists: bool) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalDrop,
        OperatorData::Drop(DropData {
            table_refs,
            if_exists,
        }),
    )
}

pub fn logical_rename(old_table: impl Into<String>, new_name: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalRename,
        OperatorData::Rename(RenameData {
            old_table: old_table.into(),
            new_name: new_name.into(),
        }),
    )
}

pub fn logical_show(show_type: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalShow,
        OperatorData::Show(ShowData {
            show_type: show_type.into(),
        }),
    )
}

pub fn logical_create_materialized_view(
    view: impl Into<String>,
    col_list: Vec<String>,
    if_not_exists: bool,
    child: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalCreateMaterializedView,
        OperatorData::CreateMaterializedView(CreateMaterializedViewData {
            view: view.into(),
            col_list,
            if_not_exists,
        }),
        vec![child],
    )
}

pub fn logical_query_derived_get(
    alias: impl Into<String>,
    predicate: Option<Expr>,
    target_list: Vec<Expr>,
    child: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::LogicalQueryDerivedGet,
        OperatorData::DerivedGet(DerivedGetData {
            alias: alias.into(),
            predicate,
            target_list,
        }),
        vec![child],
    )
}

pub fn logical_function_scan(func_expr: Expr) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LogicalFunctionScan,
        OperatorData::FunctionScan(FunctionScanData { func_expr }),
    )
}

pub fn seq_scan(target_list: Vec<Expr>, alias: impl Into<String>, predicate: Option<Expr>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::SeqScan,
        OperatorData::SeqScan(SeqScanData {
            target_list,
            alias: alias.into(),
            predicate,
        }),
        vec![child],
    )
}

pub fn storage_plan(
    dataset: impl Into<String>,
    is_video: bool,
    batch_mem_size: i64,
    predicate: Option<Expr>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::StoragePlan,
        OperatorData::Storage(StorageData {
            dataset: dataset.into(),
            is_video,
            batch_mem_size,
            predicate,
        }),
    )
}

pub fn predicate_plan(predicate: Expr, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::PredicatePlan,
        OperatorData::Filter(FilterData { predicate }),
        vec![child],
    )
}

pub fn project_plan(target_list: Vec<Expr>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::ProjectPlan,
        OperatorData::Project(ProjectData { target_list }),
        vec![child],
    )
}

pub fn uniform_sample_plan(sample_freq: i64, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::UniformSamplePlan,
        OperatorData::Sample(SampleData { sample_freq }),
        vec![child],
    )
}

pub fn union_plan(all: bool, lhs: PlanOperator, rhs: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::UnionPlan,
        OperatorData::Union(UnionData { all }),
        vec![lhs, rhs],
    )
}

pub fn order_by_plan(orderby_list: Vec<(Expr, bool)>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::OrderByPlan,
        OperatorData::OrderBy(OrderByData { orderby_list }),
        vec![child],
    )
}

pub fn limit_plan(limit_count: i64, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::LimitPlan,
        OperatorData::Limit(LimitData { limit_count }),
        vec![child],
    )
}

pub fn insert_plan(table: impl Into<String>, column_list: Vec<String>, value_list: Vec<Expr>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::InsertPlan,
        OperatorData::Insert(InsertData {
            table: table.into(),
            column_list,
            value_list,
        }),
    )
}

pub fn create_plan(table: impl Into<String>, column_list: Vec<String>, if_not_exists: bool) -> PlanOperator {
    Operator::leaf(
        OperatorKind::CreatePlan,
        OperatorData::Create(CreateData {
            table: table.into(),
            column_list,
            if_not_exists,
        }),
    )
}

pub fn load_data_plan(
    table: impl Into<String>,
    path: impl Into<String>,
    batch_mem_size: i64,
    column_list: Vec<String>,
    file_options: Vec<String>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::LoadDataPlan,
        OperatorData::LoadData(LoadDataData {
            table: table.into(),
            path: path.into(),
            column_list,
            file_options,
            batch_mem_size: Some(batch_mem_size),
        }),
    )
}

pub fn upload_plan(path: impl Into<String>, video_blob: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::UploadPlan,
        OperatorData::Upload(UploadData {
            path: path.into(),
            video_blob: video_blob.into(),
        }),
    )
}

pub fn create_udf_plan(
    name: impl Into<String>,
    if_not_exists: bool,
    inputs: Vec<String>,
    outputs: Vec<String>,
    impl_path: impl Into<String>,
    udf_type: impl Into<String>,
) -> PlanOperator {
    Operator::leaf(
        OperatorKind::CreateUdfPlan,
        OperatorData::CreateUdf(CreateUdfData {
            name: name.into(),
            if_not_exists,
            inputs,
            outputs,
            impl_path: impl_path.into(),
            udf_type: udf_type.into(),
        }),
    )
}

pub fn drop_plan(table_refs: Vec<String>, if_exists: bool) -> PlanOperator {
    Operator::leaf(
        OperatorKind::DropPlan,
        OperatorData::Drop(DropData {
            table_refs,
            if_exists,
        }),
    )
}

pub fn drop_udf_plan(name: impl Into<String>, if_exists: bool) -> PlanOperator {
    Operator::leaf(
        OperatorKind::DropUdfPlan,
        OperatorData::DropUdf(DropUdfData {
            name: name.into(),
            if_exists,
        }),
    )
}

pub fn rename_plan(old_table: impl Into<String>, new_name: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::RenamePlan,
        OperatorData::Rename(RenameData {
            old_table: old_table.into(),
            new_name: new_name.into(),
        }),
    )
}

pub fn show_info_plan(show_type: impl Into<String>) -> PlanOperator {
    Operator::leaf(
        OperatorKind::ShowInfoPlan,
        OperatorData::Show(ShowData {
            show_type: show_type.into(),
        }),
    )
}

pub fn create_materialized_view_plan(
    view: impl Into<String>,
    col_list: Vec<String>,
    if_not_exists: bool,
    child: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::CreateMaterializedViewPlan,
        OperatorData::CreateMaterializedView(CreateMaterializedViewData {
            view: view.into(),
            col_list,
            if_not_exists,
        }),
        vec![child],
    )
}

pub fn function_scan_plan(func_expr: Expr) -> PlanOperator {
    Operator::leaf(
        OperatorKind::FunctionScanPlan,
        OperatorData::FunctionScan(FunctionScanData { func_expr }),
    )
}

pub fn hash_join_build(join_type: JoinType, keys: Vec<Expr>, child: PlanOperator) -> PlanOperator {
    Operator::new(
        OperatorKind::HashJoinBuild,
        OperatorData::HashJoinBuild(HashJoinBuildData { join_type, keys }),
        vec![child],
    )
}

pub fn hash_join_probe(
    join_type: JoinType,
    keys: Vec<Expr>,
    predicate: Option<Expr>,
    project: Vec<Expr>,
    build: PlanOperator,
    probe: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::HashJoinProbe,
        OperatorData::HashJoinProbe(HashJoinProbeData {
            join_type,
            keys,
            predicate,
            project,
        }),
        vec![build, probe],
    )
}

pub fn lateral_join_plan(
    predicate: Option<Expr>,
    project: Vec<Expr>,
    lhs: PlanOperator,
    rhs: PlanOperator,
) -> PlanOperator {
    Operator::new(
        OperatorKind::LateralJoinPlan,
        OperatorData::LateralJoin(LateralJoinData { predicate, project }),
        vec![lhs, rhs],
    )
}
