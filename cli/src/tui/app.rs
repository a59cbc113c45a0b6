use dentadash_core::{DentalDataMap, MonthlyRecord, PersonnelSeries, Selection, BRANCH_IDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Revenue,
    Stracture,
}

/// Terminal dashboard state: which slice of the data map is on screen.
/// The data map itself is never mutated; navigation only moves indices.
pub struct DashboardApp {
    pub map: DentalDataMap,
    pub demo: bool,
    pub view: ChartView,
    pub month_idx: usize,
    selection_idx: usize, // 0 = all, 1..=3 = branches
    staff_idx: usize,     // 0 = everyone, 1.. = staff under the selection
}

impl DashboardApp {
    pub fn new(map: DentalDataMap, demo: bool) -> Self {
        let month_idx = map.all.len().saturating_sub(1);
        Self {
            map,
            demo,
            view: ChartView::Revenue,
            month_idx,
            selection_idx: 0,
            staff_idx: 0,
        }
    }

    pub fn selection(&self) -> Selection {
        if self.selection_idx == 0 {
            Selection::All
        } else {
            Selection::Branch(BRANCH_IDS[self.selection_idx - 1])
        }
    }

    pub fn staff(&self) -> Option<&PersonnelSeries> {
        if self.staff_idx == 0 {
            return None;
        }
        self.map
            .staff_for(self.selection())
            .into_iter()
            .nth(self.staff_idx - 1)
    }

    /// The series everything on screen renders from: one staff member's
    /// own numbers, or the selected branch / whole-group series.
    pub fn active_series(&self) -> &[MonthlyRecord] {
        match self.staff() {
            Some(p) => &p.monthly,
            None => self.map.series(self.selection()),
        }
    }

    pub fn target_label(&self) -> String {
        match self.staff() {
            Some(p) => p.name.clone(),
            None => self.selection().label().to_string(),
        }
    }

    pub fn current_month(&self) -> Option<&MonthlyRecord> {
        self.active_series().get(self.month_idx)
    }

    pub fn next_branch(&mut self) {
        self.selection_idx = (self.selection_idx + 1) % (BRANCH_IDS.len() + 1);
        self.staff_idx = 0;
        self.reset_month();
    }

    pub fn next_staff(&mut self) {
        let count = self.map.staff_for(self.selection()).len();
        if count == 0 {
            return;
        }
        self.staff_idx = (self.staff_idx + 1) % (count + 1);
        self.reset_month();
    }

    pub fn next_month(&mut self) {
        let len = self.active_series().len();
        if len > 0 && self.month_idx < len - 1 {
            self.month_idx += 1;
        }
    }

    pub fn previous_month(&mut self) {
        if self.month_idx > 0 {
            self.month_idx -= 1;
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            ChartView::Revenue => ChartView::Stracture,
            ChartView::Stracture => ChartView::Revenue,
        };
    }

    fn reset_month(&mut self) {
        self.month_idx = self.active_series().len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentadash_core::{demo, BranchId};

    #[test]
    fn starts_on_latest_month_of_all() {
        let app = DashboardApp::new(demo::generate_data_map(), true);
        assert_eq!(app.selection(), Selection::All);
        assert_eq!(app.month_idx, 11);
        assert_eq!(app.current_month().unwrap().month, "2024-12");
    }

    #[test]
    fn branch_cycle_wraps_and_resets_staff() {
        let mut app = DashboardApp::new(demo::generate_data_map(), true);
        app.next_branch();
        assert_eq!(app.selection(), Selection::Branch(BranchId::Urayasu));
        app.next_staff();
        assert!(app.staff().is_some());
        app.next_branch();
        assert!(app.staff().is_none(), "branch switch resets staff");
        app.next_branch();
        app.next_branch();
        assert_eq!(app.selection(), Selection::All);
    }

    #[test]
    fn month_navigation_stays_in_bounds() {
        let mut app = DashboardApp::new(demo::generate_data_map(), true);
        app.next_month();
        assert_eq!(app.month_idx, 11);
        for _ in 0..20 {
            app.previous_month();
        }
        assert_eq!(app.month_idx, 0);
    }

    #[test]
    fn empty_map_has_no_current_month() {
        let app = DashboardApp::new(DentalDataMap::default(), false);
        assert!(app.current_month().is_none());
        assert!(app.active_series().is_empty());
    }
}
