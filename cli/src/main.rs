mod format;
mod kpi;
mod stracture;
mod tui;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dentadash_core::{
    demo, DataMapRepository, DentalDataMap, FileDataMapRepository, MonthlyRecord, ParseOutcome,
    Selection, StractureChart,
};

#[derive(Parser)]
#[command(name = "dentadash")]
#[command(about = "歯科医院グループ経営ダッシュボード", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Import monthly CSV exports (the last file given becomes the dataset)
    Import {
        files: Vec<PathBuf>,
    },
    /// Show the KPI cards for a month (or the annual summary)
    Kpi(ViewArgs),
    /// Show the cost-structure waterfall (stracture chart)
    Stracture(ViewArgs),
    /// Show the month-by-month trend table
    Trend(ViewArgs),
    /// List staff members and their latest numbers
    Staff(ViewArgs),
    /// Open the terminal dashboard
    Tui {
        /// Use generated demo data instead of imported data
        #[arg(long)]
        demo: bool,
    },
    /// Delete the imported dataset
    Clear,
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Branch to show: all, urayasu, marunouchi, kunisaki
    #[arg(long, default_value = "all")]
    branch: String,
    /// Show one staff member's own numbers instead of a branch
    #[arg(long)]
    staff: Option<String>,
    /// Month to show (YYYY-MM); defaults to the latest
    #[arg(long)]
    month: Option<String>,
    /// Roll the whole series up into a yearly view
    #[arg(long)]
    annual: bool,
    /// Use generated demo data instead of imported data
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let repo = FileDataMapRepository::new(None)?;

    match cli.command {
        Some(Commands::Import { files }) => run_import(&repo, &files),
        Some(Commands::Kpi(args)) => run_kpi(&repo, &args),
        Some(Commands::Stracture(args)) => run_stracture(&repo, &args),
        Some(Commands::Trend(args)) => run_trend(&repo, &args),
        Some(Commands::Staff(args)) => run_staff(&repo, &args),
        Some(Commands::Tui { demo }) => {
            let map = resolve_map(&repo, demo)?;
            tui::run(map, demo)
        }
        Some(Commands::Clear) => {
            repo.clear()?;
            println!("取り込み済みデータを削除しました");
            Ok(())
        }
        None => {
            let demo = repo.load()?.is_none();
            let map = resolve_map(&repo, demo)?;
            tui::run(map, demo)
        }
    }
}

fn run_import(repo: &FileDataMapRepository, files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        bail!("取り込むCSVファイルを指定してください");
    }

    // Read everything up front so a missing second file never leaves a
    // half-applied import behind.
    let mut contents = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("読み込みに失敗しました: {}", path.display()))?;
        contents.push(text);
    }

    // Each export is a full snapshot, so later files supersede earlier ones.
    let last = contents.last().expect("files is non-empty");
    match dentadash_core::parse_csv(last) {
        ParseOutcome::Parsed { data, warnings } => {
            let stored = repo.save(&data)?;
            println!(
                "取り込み完了: 全体 {}ヶ月 / スタッフ {}名 ({})",
                data.all.len(),
                data.personnel.len(),
                stored.imported_at.format("%Y-%m-%d %H:%M UTC")
            );
            if !warnings.is_empty() {
                println!("警告 {}件:", warnings.len());
                for warning in warnings.iter().take(10) {
                    println!("  {}", warning);
                }
                if warnings.len() > 10 {
                    println!("  ... 他{}件", warnings.len() - 10);
                }
            }
            Ok(())
        }
        ParseOutcome::Empty => {
            println!("認識できる行がありませんでした。既存データは変更していません");
            Ok(())
        }
        ParseOutcome::Failed { reason } => bail!("取り込みに失敗しました: {}", reason),
    }
}

/// Loads the dataset the view commands operate on. Demo data is only ever
/// used when explicitly requested, and always announces itself.
fn resolve_map(repo: &FileDataMapRepository, demo: bool) -> Result<DentalDataMap> {
    if demo {
        println!("※ デモデータを表示しています (import したデータではありません)");
        return Ok(demo::generate_data_map());
    }
    match repo.load()? {
        Some(stored) => Ok(stored.data),
        None => bail!("データがありません。`dentadash import <csv>` か --demo を使ってください"),
    }
}

struct ResolvedView<'a> {
    label: String,
    series: &'a [MonthlyRecord],
}

/// Picks the series the --branch / --staff flags point at.
fn resolve_series<'a>(map: &'a DentalDataMap, args: &ViewArgs) -> Result<ResolvedView<'a>> {
    if let Some(staff_id) = &args.staff {
        let staff = map
            .staff(staff_id)
            .with_context(|| format!("スタッフが見つかりません: {}", staff_id))?;
        return Ok(ResolvedView {
            label: staff.name.clone(),
            series: &staff.monthly,
        });
    }
    let selection = Selection::parse(&args.branch)
        .with_context(|| format!("不明な院IDです: {}", args.branch))?;
    Ok(ResolvedView {
        label: selection.label().to_string(),
        series: map.series(selection),
    })
}

/// Index of the requested month within the series, defaulting to the
/// latest month.
fn resolve_month_idx(series: &[MonthlyRecord], month: &Option<String>) -> Result<usize> {
    match month {
        Some(m) => series
            .iter()
            .position(|r| &r.month == m)
            .with_context(|| format!("{} のデータがありません", m)),
        None => Ok(series.len().saturating_sub(1)),
    }
}

fn run_kpi(repo: &FileDataMapRepository, args: &ViewArgs) -> Result<()> {
    let map = resolve_map(repo, args.demo)?;
    let view = resolve_series(&map, args)?;

    if args.annual {
        match dentadash_core::annual(view.series) {
            Some(summary) => kpi::render_annual(&view.label, &summary),
            None => println!("データがありません"),
        }
        return Ok(());
    }

    let idx = resolve_month_idx(view.series, &args.month)?;
    match dentadash_core::monthly(view.series, idx) {
        Some(kpis) => kpi::render_monthly(&view.label, &kpis),
        None => println!("データがありません"),
    }
    Ok(())
}

fn run_stracture(repo: &FileDataMapRepository, args: &ViewArgs) -> Result<()> {
    let map = resolve_map(repo, args.demo)?;
    let view = resolve_series(&map, args)?;

    if args.annual {
        match StractureChart::from_annual(view.series) {
            Some(chart) => stracture::render(&format!("{} 年間", view.label), &chart),
            None => println!("データがありません"),
        }
        return Ok(());
    }

    let idx = resolve_month_idx(view.series, &args.month)?;
    match view.series.get(idx) {
        Some(record) => {
            let chart = StractureChart::from_record(record);
            stracture::render(&format!("{} {}", view.label, record.month), &chart);
        }
        None => println!("データがありません"),
    }
    Ok(())
}

fn run_trend(repo: &FileDataMapRepository, args: &ViewArgs) -> Result<()> {
    let map = resolve_map(repo, args.demo)?;
    let view = resolve_series(&map, args)?;
    kpi::render_trend(&view.label, view.series);
    Ok(())
}

fn run_staff(repo: &FileDataMapRepository, args: &ViewArgs) -> Result<()> {
    let map = resolve_map(repo, args.demo)?;
    let selection = Selection::parse(&args.branch)
        .with_context(|| format!("不明な院IDです: {}", args.branch))?;
    kpi::render_staff_list(&map.staff_for(selection));
    Ok(())
}
