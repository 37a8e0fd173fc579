//! `EXPLAIN`-style rendering of a plan tree (SPEC_FULL §3, "EXPLAIN
//! rendering"): ambient debugging tooling, not a scoped feature, grounded
//! in the `pretty_xmlish`-based `explain`/`explain_to_string` pair the
//! wider plan-node hierarchy this optimizer is extracted from uses for
//! its own operators.

use pretty_xmlish::{Pretty, PrettyConfig};

use crate::expr::Expr;
use crate::operator::{OperatorData, OperatorKind, PlanOperator};

fn text(s: impl Into<String>) -> Pretty<'static> {
    Pretty::display(&s.into())
}

fn expr_pretty(expr: &Expr) -> Pretty<'static> {
    text(expr.to_string())
}

fn opt_expr_pretty(expr: &Option<Expr>) -> Pretty<'static> {
    match expr {
        Some(expr) => expr_pretty(expr),
        None => text("None"),
    }
}

fn expr_list_pretty(exprs: &[Expr]) -> Pretty<'static> {
    Pretty::Array(exprs.iter().map(expr_pretty).collect())
}

fn orderby_list_pretty(orderby_list: &[(Expr, bool)]) -> Pretty<'static> {
    Pretty::Array(
        orderby_list
            .iter()
            .map(|(expr, asc)| text(format!("{expr} {}", if *asc { "asc" } else { "desc" })))
            .collect(),
    )
}

fn string_list_pretty(strings: &[String]) -> Pretty<'static> {
    Pretty::Array(strings.iter().map(|s| text(s.clone())).collect())
}

/// The `(name, value)` pairs rendered alongside an operator's kind,
/// mirroring each operator's own attribute fields. Empty for operators
/// with no attributes worth showing beyond their kind and children.
fn fields(data: &OperatorData) -> Vec<(&'static str, Pretty<'static>)> {
    match data {
        OperatorData::Get(get) => vec![
            ("dataset", text(get.dataset.clone())),
            ("alias", text(get.alias.clone())),
            ("is_video", text(get.is_video.to_string())),
            ("predicate", opt_expr_pretty(&get.predicate)),
            ("target_list", expr_list_pretty(&get.target_list)),
        ],
        OperatorData::Filter(filter) => vec![("predicate", expr_pretty(&filter.predicate))],
        OperatorData::Join(join) => vec![
            ("predicate", opt_expr_pretty(&join.predicate)),
            ("project", expr_list_pretty(&join.project)),
        ],
        OperatorData::Project(project) => vec![("target_list", expr_list_pretty(&project.target_list))],
        OperatorData::Sample(sample) => vec![("sample_freq", text(sample.sample_freq.to_string()))],
        OperatorData::Union(union) => vec![("all", text(union.all.to_string()))],
        OperatorData::OrderBy(order_by) => vec![("orderby_list", orderby_list_pretty(&order_by.orderby_list))],
        OperatorData::Limit(limit) => vec![("limit", text(limit.limit_count.to_string()))],
        OperatorData::Insert(insert) => vec![
            ("table", text(insert.table.clone())),
            ("columns", string_list_pretty(&insert.column_list)),
            ("values", expr_list_pretty(&insert.value_list)),
        ],
        OperatorData::Create(create) => vec![
            ("table", text(create.table.clone())),
            ("columns", string_list_pretty(&create.column_list)),
            ("if_not_exists", text(create.if_not_exists.to_string())),
        ],
        OperatorData::LoadData(load) => vec![
            ("table", text(load.table.clone())),
            ("path", text(load.path.clone())),
            ("columns", string_list_pretty(&load.column_list)),
            (
                "batch_mem_size",
                text(
                    load.batch_mem_size
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "unresolved".to_string()),
                ),
            ),
        ],
        OperatorData::Upload(upload) => vec![
            ("path", text(upload.path.clone())),
            ("video_blob", text(upload.video_blob.clone())),
        ],
        OperatorData::CreateUdf(udf) => vec![
            ("name", text(udf.name.clone())),
            ("impl_path", text(udf.impl_path.clone())),
            ("udf_type", text(udf.udf_type.clone())),
        ],
        OperatorData::DropUdf(udf) => vec![("name", text(udf.name.clone()))],
        OperatorData::Drop(drop) => vec![("tables", string_list_pretty(&drop.table_refs))],
        OperatorData::Rename(rename) => vec![
            ("old_table", text(rename.old_table.clone())),
            ("new_name", text(rename.new_name.clone())),
        ],
        OperatorData::Show(show) => vec![("show_type", text(show.show_type.clone()))],
        OperatorData::CreateMaterializedView(view) => vec![
            ("view", text(view.view.clone())),
            ("columns", string_list_pretty(&view.col_list)),
        ],
        OperatorData::DerivedGet(get) => vec![
            ("alias", text(get.alias.clone())),
            ("predicate", opt_expr_pretty(&get.predicate)),
            ("target_list", expr_list_pretty(&get.target_list)),
        ],
        OperatorData::FunctionScan(scan) => vec![("func", expr_pretty(&scan.func_expr))],
        OperatorData::SeqScan(scan) => vec![
            ("alias", text(scan.alias.clone())),
            ("predicate", opt_expr_pretty(&scan.predicate)),
            ("target_list", expr_list_pretty(&scan.target_list)),
        ],
        OperatorData::Storage(storage) => vec![
            ("dataset", text(storage.dataset.clone())),
            ("is_video", text(storage.is_video.to_string())),
            ("batch_mem_size", text(storage.batch_mem_size.to_string())),
            ("predicate", opt_expr_pretty(&storage.predicate)),
        ],
        OperatorData::HashJoinBuild(build) => vec![("keys", expr_list_pretty(&build.keys))],
        OperatorData::HashJoinProbe(probe) => vec![
            ("keys", expr_list_pretty(&probe.keys)),
            ("predicate", opt_expr_pretty(&probe.predicate)),
            ("project", expr_list_pretty(&probe.project)),
        ],
        OperatorData::LateralJoin(join) => vec![
            ("predicate", opt_expr_pretty(&join.predicate)),
            ("project", expr_list_pretty(&join.project)),
        ],
        OperatorData::Dummy(group_id) => vec![("group", text(group_id.to_string()))],
    }
}

/// Extension trait rendering a plan operator tree for `EXPLAIN`. An
/// inherent impl isn't available since `PlanOperator` is a type alias for
/// `qopt_core::node::Operator`, defined outside this crate.
pub trait Explain {
    /// Render this operator tree into a `Pretty` document. Used directly
    /// by callers composing a larger explain tree (e.g. a parent query
    /// plan embedding this as a subquery); most callers want
    /// [`Explain::explain_to_string`] instead.
    fn explain(&self) -> Pretty<'static>;

    /// Render this operator tree into an indented, multi-line string
    /// suitable for `EXPLAIN` output or test assertions.
    fn explain_to_string(&self) -> String {
        let mut config = PrettyConfig {
            need_boundaries: false,
            reduced_spaces: false,
            width: 300,
            ..Default::default()
        };
        let mut out = String::new();
        config.unicode(&mut out, &self.explain());
        out
    }
}

impl Explain for PlanOperator {
    fn explain(&self) -> Pretty<'static> {
        if self.kind == OperatorKind::Dummy {
            return text(format!("{self}"));
        }
        let children = self.children.iter().map(Explain::explain).collect();
        Pretty::simple_record(self.kind.to_string(), fields(&self.attributes), children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;
    use crate::expr::{CompareOp, Value};

    #[test]
    fn explain_renders_kind_and_nested_children() {
        let predicate = Expr::compare(CompareOp::Lt, Expr::tuple_value("v", "id"), Expr::constant(Value::int(10)));
        let plan = build::logical_filter(predicate, build::logical_get("videos", true, "v", None, vec![]));

        let rendered = plan.explain_to_string();
        assert!(rendered.contains("LogicalFilter"));
        assert!(rendered.contains("LogicalGet"));
        assert!(rendered.contains("videos"));
    }

    #[test]
    fn explain_renders_dummy_children_opaquely() {
        let dummy = PlanOperator::dummy(qopt_core::memo::GroupId(3));
        let rendered = dummy.explain_to_string();
        assert!(rendered.contains("g3"));
    }
}
