/// Synthetic 24-hour load curve generation.
pub mod curve;
/// Demand-response event records.
pub mod dr_event;
pub mod kpi;
pub mod profile;
