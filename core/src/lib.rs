pub mod aggregate;
pub mod demo;
pub mod import;
pub mod model;
pub mod repository;
pub mod service;

pub use import::{parse_csv, CellWarning, ParseOutcome, WarningKind};
pub use model::{BranchId, DentalDataMap, MonthlyRecord, PersonnelSeries, Selection, BRANCH_IDS};
pub use repository::{DataMapRepository, FileDataMapRepository, StoredDataMap};
pub use service::kpi::{annual, monthly, AnnualSummary, Delta, MonthlyKpis};
pub use service::stracture::{Segment, StractureChart, DISPLAY_THRESHOLD_PCT};
