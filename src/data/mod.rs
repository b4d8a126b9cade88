/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<DailyRecord>, sorted by date
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date window → &[DailyRecord]
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  KPIs, pivots, monthly resample
///   └───────────┘
/// ```
///
/// `store` wraps `loader` with the process-wide memoized dataset.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
