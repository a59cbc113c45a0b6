use dentadash_core::{AnnualSummary, Delta, MonthlyKpis, MonthlyRecord, PersonnelSeries};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

use crate::format;

// Helper struct for Table Row
#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "指標")]
    metric: String,
    #[tabled(rename = "値")]
    value: String,
    #[tabled(rename = "前月比")]
    change: String,
    #[tabled(rename = "備考")]
    note: String,
}

fn delta_cell(delta: &Delta) -> String {
    let arrow = if delta.positive { "▲" } else { "▼" };
    format!("{} {}", arrow, delta.text)
}

/// The four KPI cards for one month, as a table.
pub fn render_monthly(label: &str, kpis: &MonthlyKpis) {
    println!("\n\x1b[1m{} {} 経営レポート\x1b[0m", kpis.month, label);

    let rows = vec![
        KpiRow {
            metric: "売上高合計".to_string(),
            value: format!("{} 円", format::yen(kpis.revenue)),
            change: delta_cell(&kpis.revenue_delta),
            note: format!("目標達成率 {:.1}%", kpis.target_progress),
        },
        KpiRow {
            metric: "医業利益".to_string(),
            value: format!("{} 円", format::yen(kpis.operating_profit)),
            change: delta_cell(&kpis.profit_delta),
            note: format!("利益率 {}", format::percent(kpis.profit_margin)),
        },
        KpiRow {
            metric: "新患数".to_string(),
            value: format!("{} 名", kpis.new_patients),
            change: delta_cell(&kpis.patients_delta),
            note: String::new(),
        },
        KpiRow {
            metric: "自費率".to_string(),
            value: format::percent(kpis.self_pay_rate),
            change: delta_cell(&kpis.self_pay_delta),
            note: "前月差はpt".to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn render_annual(label: &str, summary: &AnnualSummary) {
    println!(
        "\n\x1b[1m{} 年間サマリー\x1b[0m ({}ヶ月分)",
        label, summary.months
    );

    let rows = vec![
        KpiRow {
            metric: "売上高合計".to_string(),
            value: format!("{} 円", format::yen(summary.revenue)),
            change: String::new(),
            note: format!("目標達成率 {:.1}%", summary.target_progress),
        },
        KpiRow {
            metric: "医業利益".to_string(),
            value: format!("{} 円", format::yen(summary.operating_profit)),
            change: String::new(),
            note: format!("利益率 {}", format::percent(summary.profit_margin)),
        },
        KpiRow {
            metric: "新患数".to_string(),
            value: format!("{} 名", summary.new_patients),
            change: String::new(),
            note: "年間累計".to_string(),
        },
        KpiRow {
            metric: "自費率".to_string(),
            value: format::percent(summary.self_pay_rate),
            change: String::new(),
            note: "年間 (絶対額から算出)".to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "月")]
    month: String,
    #[tabled(rename = "売上高")]
    revenue: String,
    #[tabled(rename = "保険")]
    insurance: String,
    #[tabled(rename = "自費")]
    self_pay: String,
    #[tabled(rename = "営業利益")]
    profit: String,
    #[tabled(rename = "利益率")]
    margin: String,
    #[tabled(rename = "新患")]
    patients: String,
}

/// Month-by-month table of the active series.
pub fn render_trend(label: &str, series: &[MonthlyRecord]) {
    if series.is_empty() {
        println!("データがありません");
        return;
    }
    println!("\n\x1b[1m{} 月次推移\x1b[0m", label);

    let rows: Vec<TrendRow> = series
        .iter()
        .map(|r| TrendRow {
            month: r.month.clone(),
            revenue: format::yen(r.total_revenue),
            insurance: format::yen(r.insurance_revenue),
            self_pay: format::yen(r.self_pay_revenue),
            profit: format::yen(r.operating_profit),
            margin: format::percent(r.profit_margin),
            patients: r.new_patients.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "氏名")]
    name: String,
    #[tabled(rename = "所属")]
    branch: String,
    #[tabled(rename = "最新月")]
    month: String,
    #[tabled(rename = "売上高")]
    revenue: String,
    #[tabled(rename = "自費率")]
    self_pay_rate: String,
}

pub fn render_staff_list(staff: &[&PersonnelSeries]) {
    if staff.is_empty() {
        println!("スタッフデータがありません");
        return;
    }

    let rows: Vec<StaffRow> = staff
        .iter()
        .map(|p| {
            let latest = p.monthly.last();
            StaffRow {
                id: p.id.clone(),
                name: p.name.clone(),
                branch: p.branch_id.label().to_string(),
                month: latest.map(|r| r.month.clone()).unwrap_or_else(|| "-".to_string()),
                revenue: latest
                    .map(|r| format::yen(r.total_revenue))
                    .unwrap_or_else(|| "-".to_string()),
                self_pay_rate: latest
                    .map(|r| format::percent(r.self_pay_rate))
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}
