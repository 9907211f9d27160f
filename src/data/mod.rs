/// Data layer: the ETL pipeline from raw CSV bytes to derived tables.
///
/// Architecture:
/// ```text
///   .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + type inference → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  numeric / categorical column roles
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  dates    │  coerce date column, drop misses, range filter,
///   └──────────┘  derive "Month" bucket
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌───────────┐ ┌───────────┐  ┌──────────┐
///   │ aggregate  │ │ correlate  │  │  export   │
///   └───────────┘ └───────────┘  └──────────┘
///    summaries,     Pearson        filtered
///    trend, top-10  matrix         table → .csv
/// ```
///
/// Every user action re-runs the whole pipeline over the in-memory table;
/// nothing is cached or persisted across runs.

pub mod aggregate;
pub mod classify;
pub mod correlate;
pub mod dates;
pub mod export;
pub mod loader;
pub mod model;
