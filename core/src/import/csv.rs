use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, warn};

use crate::aggregate;
use crate::model::{BranchId, DentalDataMap, MonthlyRecord, PersonnelSeries, BRANCH_IDS};

/// Result of one CSV import. The parser is a total function: it never
/// returns `Err` for data-shaped problems, it tags them instead, so the
/// caller can decide what to render. In particular it never substitutes
/// demo data on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// At least one row was classified. `warnings` is the per-cell
    /// validation report: the import succeeded, but these cells degraded
    /// to zero or these rows were dropped.
    Parsed {
        data: DentalDataMap,
        warnings: Vec<CellWarning>,
    },
    /// A header was present but no row classified as branch or personnel
    /// data. Distinct from `Failed` so "your file really was empty" can be
    /// told apart from "we could not read your file".
    Empty,
    /// Structurally unusable input (no header row at all).
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Non-empty cell that would not parse as a number; coerced to 0.
    BadNumber,
    /// `branchId` outside the fixed allow-list; the whole row was dropped.
    UnknownBranch,
    /// Fewer fields than the header; the whole row was dropped.
    ShortRow,
}

/// One entry of the validation report: where it happened (1-based line,
/// header name) and the raw cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWarning {
    pub line: usize,
    pub column: String,
    pub raw: String,
    pub kind: WarningKind,
}

impl fmt::Display for CellWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::BadNumber => write!(
                f,
                "line {}: {} = \"{}\" is not a number, treated as 0",
                self.line, self.column, self.raw
            ),
            WarningKind::UnknownBranch => write!(
                f,
                "line {}: unknown branchId \"{}\", row dropped",
                self.line, self.raw
            ),
            WarningKind::ShortRow => write!(
                f,
                "line {}: fewer fields than the header, row dropped",
                self.line
            ),
        }
    }
}

/// Per-month accumulator: the merged record plus the number of rows that
/// contributed, so rate-like operational metrics can be averaged at the
/// end instead of staying provisional sums.
type MonthBuckets = BTreeMap<String, (MonthlyRecord, u32)>;

/// Parses raw CSV text (header row + comma-separated data rows) into a
/// `DentalDataMap`.
///
/// Rows with non-empty `staffId` and `staffName` are personnel rows; they
/// are appended to that staff member's series and also folded into the
/// owning branch's monthly bucket. All other rows are branch rows keyed by
/// `branchId`. Numeric cells are coerced permissively: anything that does
/// not parse becomes 0 and lands in the warning report rather than
/// aborting the import.
pub fn parse_csv(input: &str) -> ParseOutcome {
    if input.trim().is_empty() {
        return ParseOutcome::Failed {
            reason: "CSV input is empty".to_string(),
        };
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = match reader.headers() {
        Ok(h) if !h.is_empty() => h.clone(),
        Ok(_) => {
            return ParseOutcome::Failed {
                reason: "CSV header row is empty".to_string(),
            }
        }
        Err(e) => {
            return ParseOutcome::Failed {
                reason: format!("could not read CSV header: {e}"),
            }
        }
    };

    // First occurrence wins when a header name repeats.
    let mut columns: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        columns.entry(name).or_insert(idx);
    }

    let mut warnings: Vec<CellWarning> = Vec::new();
    let mut branch_buckets: HashMap<BranchId, MonthBuckets> = HashMap::new();
    for id in BRANCH_IDS {
        branch_buckets.insert(id, MonthBuckets::new());
    }
    // Personnel keep their first-seen order; the index map avoids a linear
    // scan per row.
    let mut personnel: Vec<PersonnelSeries> = Vec::new();
    let mut personnel_index: HashMap<String, usize> = HashMap::new();
    let mut classified_rows = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        // 1-based, counting the header as line 1.
        let line = row_idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("line {line}: unreadable row skipped: {e}");
                continue;
            }
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if record.len() < headers.len() {
            warnings.push(CellWarning {
                line,
                column: String::new(),
                raw: String::new(),
                kind: WarningKind::ShortRow,
            });
            continue;
        }

        let field = |name: &str| -> &str {
            columns
                .get(name)
                .and_then(|&idx| record.get(idx))
                .unwrap_or("")
        };

        let branch_raw = field("branchId");
        let staff_id = field("staffId");
        let staff_name = field("staffName");
        let is_staff_row = !staff_id.is_empty() && !staff_name.is_empty();

        let Some(branch) = BranchId::parse(branch_raw) else {
            warnings.push(CellWarning {
                line,
                column: "branchId".to_string(),
                raw: branch_raw.to_string(),
                kind: WarningKind::UnknownBranch,
            });
            continue;
        };

        let monthly = read_monthly(line, &record, &columns, &mut warnings);

        if is_staff_row {
            let idx = match personnel_index.get(staff_id) {
                Some(&i) => i,
                None => {
                    personnel.push(PersonnelSeries {
                        id: staff_id.to_string(),
                        name: staff_name.to_string(),
                        branch_id: branch,
                        monthly: Vec::new(),
                    });
                    personnel_index.insert(staff_id.to_string(), personnel.len() - 1);
                    personnel.len() - 1
                }
            };
            personnel[idx].monthly.push(monthly.clone());
        }

        // Both staff-derived and branch-only rows go through the same
        // find-or-merge path, so duplicate months never produce duplicate
        // entries.
        let buckets = branch_buckets.get_mut(&branch).unwrap();
        let entry = buckets
            .entry(monthly.month.clone())
            .or_insert_with(|| (MonthlyRecord::for_month(&monthly.month), 0));
        entry.0.absorb(&monthly);
        entry.1 += 1;

        classified_rows += 1;
    }

    if classified_rows == 0 {
        return ParseOutcome::Empty;
    }

    let finalize = |buckets: &MonthBuckets| -> Vec<MonthlyRecord> {
        buckets
            .values()
            .map(|(record, count)| {
                let mut record = record.clone();
                if *count > 0 {
                    record.unit_utilization_rate /= *count as f64;
                    record.cancellation_rate /= *count as f64;
                }
                record.recompute_rates();
                record
            })
            .collect()
    };

    let urayasu = finalize(&branch_buckets[&BranchId::Urayasu]);
    let marunouchi = finalize(&branch_buckets[&BranchId::Marunouchi]);
    let kunisaki = finalize(&branch_buckets[&BranchId::Kunisaki]);
    let all = aggregate::roll_up(&[&urayasu, &marunouchi, &kunisaki]);

    for series in personnel.iter_mut() {
        series.monthly.sort_by(|a, b| a.month.cmp(&b.month));
    }

    debug!(
        "parsed {} rows: all={} urayasu={} marunouchi={} kunisaki={} personnel={} warnings={}",
        classified_rows,
        all.len(),
        urayasu.len(),
        marunouchi.len(),
        kunisaki.len(),
        personnel.len(),
        warnings.len()
    );

    ParseOutcome::Parsed {
        data: DentalDataMap {
            all,
            urayasu,
            marunouchi,
            kunisaki,
            personnel,
        },
        warnings,
    }
}

fn read_monthly(
    line: usize,
    record: &csv::StringRecord,
    columns: &HashMap<&str, usize>,
    warnings: &mut Vec<CellWarning>,
) -> MonthlyRecord {
    let raw = |name: &str| -> &str {
        columns
            .get(name)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
    };

    let mut money = |name: &str| -> f64 {
        let cell = raw(name);
        if cell.is_empty() {
            return 0.0;
        }
        match cell.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                warnings.push(CellWarning {
                    line,
                    column: name.to_string(),
                    raw: cell.to_string(),
                    kind: WarningKind::BadNumber,
                });
                0.0
            }
        }
    };

    let mut rec = MonthlyRecord::for_month(raw("month"));
    rec.total_revenue = money("totalRevenue");
    rec.insurance_revenue = money("insuranceRevenue");
    rec.self_pay_revenue = money("selfPayRevenue");
    rec.other_revenue = money("otherRevenue");
    rec.target_revenue = money("targetRevenue");
    rec.cost_materials = money("costMaterials");
    rec.cost_materials_self_pay = money("costMaterialsSelfPay");
    rec.cost_lab_insurance = money("costLabInsurance");
    rec.cost_lab_self_pay = money("costLabSelfPay");
    rec.total_cost = money("totalCost");
    rec.gross_profit = money("grossProfit");
    rec.expense_personnel = money("expensePersonnel");
    rec.expense_specialist = money("expenseSpecialist");
    rec.expense_training = money("expenseTraining");
    rec.expense_ads = money("expenseAds");
    rec.expense_commission = money("expenseCommission");
    rec.expense_depreciation = money("expenseDepreciation");
    rec.expense_other_sga = money("expenseOtherSGA");
    rec.total_sga = money("totalSGA");
    rec.operating_profit = money("operatingProfit");
    rec.profit_margin = money("profitMargin");
    rec.self_pay_rate = money("selfPayRate");
    // Derived rates left blank in the file are filled in from the absolute
    // amounts of the same row.
    if raw("profitMargin").is_empty() && rec.total_revenue > 0.0 {
        rec.profit_margin = rec.operating_profit / rec.total_revenue * 100.0;
    }
    if raw("selfPayRate").is_empty() && rec.total_revenue > 0.0 {
        rec.self_pay_rate = rec.self_pay_revenue / rec.total_revenue * 100.0;
    }
    rec.unit_utilization_rate = money("unitUtilizationRate");
    rec.cancellation_rate = money("cancellationRate");

    // Counts are non-negative integers; fractional cells truncate and
    // negative ones clamp to zero through the same permissive path.
    rec.new_patients = money("newPatients").max(0.0) as u32;
    rec.total_patients = money("totalPatients").max(0.0) as u32;
    rec.hp_visits = money("hpVisits").max(0.0) as u32;
    rec.reserve_visits = money("reserveVisits").max(0.0) as u32;
    rec.google_visits = money("googleVisits").max(0.0) as u32;

    rec
}
