/// Statistics behind the charts: robust bounds and outlier replacement,
/// distribution summaries, and correlation.
pub mod correlation;
pub mod outlier;
pub mod summary;
