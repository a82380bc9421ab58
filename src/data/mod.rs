/// Data layer: core types, loading, and label normalization.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → rows
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  label text → percentile rank, or drop the row
///   └────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ReferenceTable  │  sorted Vec<BracketRow>, immutable
///   └────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
