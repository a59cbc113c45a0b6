use serde::{Deserialize, Serialize};

use crate::model::branch::{BranchId, Selection};
use crate::model::record::MonthlyRecord;

/// A staff member with their own monthly series, owned by one branch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonnelSeries {
    pub id: String,
    pub name: String,
    pub branch_id: BranchId,
    pub monthly: Vec<MonthlyRecord>,
}

/// The root aggregate the dashboard renders from: per-branch series, the
/// derived "all" series, and the personnel collection. Built once per
/// import (or per demo generation) and replaced wholesale; nothing
/// mutates it field-by-field afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DentalDataMap {
    pub all: Vec<MonthlyRecord>,
    pub urayasu: Vec<MonthlyRecord>,
    pub marunouchi: Vec<MonthlyRecord>,
    pub kunisaki: Vec<MonthlyRecord>,
    pub personnel: Vec<PersonnelSeries>,
}

impl DentalDataMap {
    pub fn branch(&self, id: BranchId) -> &[MonthlyRecord] {
        match id {
            BranchId::Urayasu => &self.urayasu,
            BranchId::Marunouchi => &self.marunouchi,
            BranchId::Kunisaki => &self.kunisaki,
        }
    }

    pub fn series(&self, selection: Selection) -> &[MonthlyRecord] {
        match selection {
            Selection::All => &self.all,
            Selection::Branch(id) => self.branch(id),
        }
    }

    pub fn staff(&self, staff_id: &str) -> Option<&PersonnelSeries> {
        self.personnel.iter().find(|p| p.id == staff_id)
    }

    /// Staff available under the current selection. `All` lists everyone.
    pub fn staff_for(&self, selection: Selection) -> Vec<&PersonnelSeries> {
        self.personnel
            .iter()
            .filter(|p| match selection {
                Selection::All => true,
                Selection::Branch(id) => p.branch_id == id,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
            && self.urayasu.is_empty()
            && self.marunouchi.is_empty()
            && self.kunisaki.is_empty()
            && self.personnel.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_filter_by_branch() {
        let staff = |id: &str, branch| PersonnelSeries {
            id: id.to_string(),
            name: id.to_string(),
            branch_id: branch,
            monthly: Vec::new(),
        };
        let map = DentalDataMap {
            personnel: vec![
                staff("dr_tanaka", BranchId::Urayasu),
                staff("dr_suzuki", BranchId::Marunouchi),
            ],
            ..DentalDataMap::default()
        };
        assert_eq!(map.staff_for(Selection::All).len(), 2);
        let urayasu = map.staff_for(Selection::Branch(BranchId::Urayasu));
        assert_eq!(urayasu.len(), 1);
        assert_eq!(urayasu[0].id, "dr_tanaka");
        assert!(map.staff("dr_suzuki").is_some());
        assert!(map.staff("dr_nobody").is_none());
    }

    #[test]
    fn empty_map_reports_empty() {
        assert!(DentalDataMap::default().is_empty());
    }
}
