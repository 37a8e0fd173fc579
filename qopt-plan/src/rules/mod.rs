//! The concrete rule library (spec §4.3): promises, and the rewrite,
//! transformation, implementation, and non-wired rule modules.

pub mod implement;
pub mod rewrite;
pub mod transform;
pub mod unimplemented;

/// Promise values, highest wins ties within a phase. Implementation
/// rules sit below `qopt_core::rule::IMPLEMENTATION_DELIMITER`;
/// transformation and rewrite rules sit above it. The relative order
/// within each phase mirrors the source's `Promise` enum.
pub mod promise {
    use qopt_core::rule::IMPLEMENTATION_DELIMITER;

    pub const LOGICAL_UNION_TO_PHYSICAL: i32 = 1;
    pub const LOGICAL_MATERIALIZED_VIEW_TO_PHYSICAL: i32 = 2;
    pub const LOGICAL_ORDERBY_TO_PHYSICAL: i32 = 3;
    pub const LOGICAL_LIMIT_TO_PHYSICAL: i32 = 4;
    pub const LOGICAL_INSERT_TO_PHYSICAL: i32 = 5;
    pub const LOGICAL_RENAME_TO_PHYSICAL: i32 = 6;
    pub const LOGICAL_DROP_TO_PHYSICAL: i32 = 7;
    pub const LOGICAL_LOAD_TO_PHYSICAL: i32 = 8;
    pub const LOGICAL_UPLOAD_TO_PHYSICAL: i32 = 9;
    pub const LOGICAL_CREATE_TO_PHYSICAL: i32 = 10;
    pub const LOGICAL_CREATE_UDF_TO_PHYSICAL: i32 = 11;
    pub const LOGICAL_SAMPLE_TO_UNIFORMSAMPLE: i32 = 12;
    pub const LOGICAL_GET_TO_SEQSCAN: i32 = 13;
    pub const LOGICAL_DERIVED_GET_TO_PHYSICAL: i32 = 14;
    pub const LOGICAL_LATERAL_JOIN_TO_PHYSICAL: i32 = 15;
    pub const LOGICAL_JOIN_TO_PHYSICAL_HASH_JOIN: i32 = 16;
    pub const LOGICAL_FUNCTION_SCAN_TO_PHYSICAL: i32 = 17;
    pub const LOGICAL_FILTER_TO_PHYSICAL: i32 = 18;
    pub const LOGICAL_PROJECT_TO_PHYSICAL: i32 = 19;
    pub const LOGICAL_SHOW_TO_PHYSICAL: i32 = 20;
    pub const LOGICAL_DROP_UDF_TO_PHYSICAL: i32 = 21;

    pub const LOGICAL_INNER_JOIN_COMMUTATIVITY: i32 = IMPLEMENTATION_DELIMITER + 1;

    pub const EMBED_FILTER_INTO_GET: i32 = IMPLEMENTATION_DELIMITER + 2;
    pub const EMBED_PROJECT_INTO_GET: i32 = IMPLEMENTATION_DELIMITER + 3;
    pub const EMBED_FILTER_INTO_DERIVED_GET: i32 = IMPLEMENTATION_DELIMITER + 4;
    pub const EMBED_PROJECT_INTO_DERIVED_GET: i32 = IMPLEMENTATION_DELIMITER + 5;
    pub const PUSHDOWN_FILTER_THROUGH_SAMPLE: i32 = IMPLEMENTATION_DELIMITER + 6;
    pub const PUSHDOWN_PROJECT_THROUGH_SAMPLE: i32 = IMPLEMENTATION_DELIMITER + 7;
}
