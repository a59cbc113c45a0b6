use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DentalDataMap;

/// The persisted snapshot of the last successful import. Replaced
/// wholesale on every import; nothing ever patches it in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredDataMap {
    pub imported_at: DateTime<Utc>,
    pub data: DentalDataMap,
}

pub trait DataMapRepository {
    fn load(&self) -> Result<Option<StoredDataMap>>;
    fn save(&self, data: &DentalDataMap) -> Result<StoredDataMap>;
    fn clear(&self) -> Result<()>;
}
