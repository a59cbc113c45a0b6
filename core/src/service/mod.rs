pub mod kpi;
pub mod stracture;

pub use kpi::{annual, monthly, AnnualSummary, Delta, MonthlyKpis};
pub use stracture::{Segment, StractureChart, DISPLAY_THRESHOLD_PCT};
