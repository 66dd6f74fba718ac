/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///        .csv
///         │
///         ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce → Table
///   └──────────┘
///         │
///         ▼
///   ┌──────────┐
///   │   Table   │  Vec<Record>, column index
///   └──────────┘
///         │
///         ▼
///   ┌──────────┐
///   │  filter   │  department/gender/experience predicates → new Table
///   └──────────┘
/// ```
pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
