pub mod branch;
pub mod data_map;
pub mod record;

pub use branch::{BranchId, Selection, BRANCH_IDS};
pub use data_map::{DentalDataMap, PersonnelSeries};
pub use record::MonthlyRecord;
