// ==========================================
// Repair Queens - 命令行入口
// ==========================================
// 命令:
//   triage <配件文件> [urgency] [category] [sort]
//   export <fixture 目录> <csv|json|pdf> <资源类型>...
//   calendar <YYYY> <MM>
// ==========================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use repair_queens::app::{get_default_db_path, AppState};
use repair_queens::client::FixtureTransport;
use repair_queens::engine::triage::{FilterCriteria, LowStockBoard};
use repair_queens::export::TracingProgressObserver;
use repair_queens::importer::PartImporter;
use repair_queens::{build_month_grid, logging, ExportFormat, ExportRequest, Part, ResourceType};
use serde_json::Value;

const USAGE: &str = "用法:
  repair-queens triage <parts.json|parts.csv|parts.xlsx> [urgency] [category] [sort]
  repair-queens export <fixture_dir> <csv|json|pdf> <appointments|parts|suppliers|orders>...
  repair-queens calendar <YYYY> <MM>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    tracing::info!("{} v{}", repair_queens::APP_NAME, repair_queens::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "triage" => run_triage(rest),
        "export" => run_export(rest).await,
        "calendar" => run_calendar(rest),
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}

// ==========================================
// triage
// ==========================================

fn load_parts(path: &Path) -> Result<Vec<Part>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ext == "json" {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取 {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)?;
        let items = value.get("parts").cloned().unwrap_or(value);
        return Ok(serde_json::from_value(items)?);
    }

    let report = PartImporter::new().import_file(path)?;
    for rejection in &report.rejected {
        eprintln!("跳过第 {} 行: {}", rejection.row, rejection.reason);
    }
    Ok(report.parts)
}

fn run_triage(args: &[String]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("缺少配件文件\n{}", USAGE))?;
    let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
    let criteria = FilterCriteria::from_raw(arg(1), arg(2), arg(3));

    let board = LowStockBoard::new(load_parts(Path::new(path))?);
    let engine = board.engine();

    println!("{:<10} {:<28} {:<16} {:>6} {:>6} {:>10} {:>6}", "紧急度", "名称", "分类", "库存", "阈值", "单价", "建议");
    for part in board.view(&criteria) {
        println!(
            "{:<10} {:<28} {:<16} {:>6} {:>6} {:>10.2} {:>6}",
            engine
                .assess(part)
                .map(|tier| tier.to_string())
                .unwrap_or_else(|| "-".to_string()),
            part.name,
            part.category,
            part.stock_quantity,
            part.minimum_stock_level,
            part.price,
            engine.suggest_restock_quantity(part),
        );
    }

    let summary = board.summary();
    println!();
    println!("缺货: {}", summary.critical_count);
    println!("低库存: {}", summary.low_stock_count);
    println!("缺货损失估值: {:.2} RON", summary.lost_value);
    Ok(())
}

// ==========================================
// export
// ==========================================

async fn run_export(args: &[String]) -> Result<()> {
    let [fixture_dir, format, types @ ..] = args else {
        bail!("参数不足\n{}", USAGE);
    };

    let format: ExportFormat = format.parse().map_err(|e: String| anyhow!(e))?;
    let resource_types = types
        .iter()
        .map(|t| t.parse::<ResourceType>().map_err(|e: String| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    let state = AppState::new(
        get_default_db_path(),
        Arc::new(FixtureTransport::new(fixture_dir)),
    )?;

    let request = ExportRequest::new(resource_types, format);
    let outcome = state
        .export_api
        .export(&request, &TracingProgressObserver)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    let dir = state.app_config.export_output_dir.display().to_string();
    for file in &outcome.files {
        println!("{}/{}", dir, file);
    }
    println!("共 {} 条记录", outcome.bundle.total_records());
    Ok(())
}

// ==========================================
// calendar
// ==========================================

fn run_calendar(args: &[String]) -> Result<()> {
    let [year, month, ..] = args else {
        bail!("参数不足\n{}", USAGE);
    };
    let year: i32 = year.parse().context("年份格式错误")?;
    let month: u32 = month.parse().context("月份格式错误")?;

    let today = chrono::Local::now().date_naive();
    let grid = build_month_grid(year, month, today).ok_or_else(|| anyhow!("非法月份: {}", month))?;

    println!("{:04}-{:02}", grid.year, grid.month);
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");
    for week in &grid.weeks {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(day) => {
                    let mark = if day.is_today {
                        '*'
                    } else if day.selectable {
                        ' '
                    } else {
                        'x'
                    };
                    format!("{:>3}{}", chrono::Datelike::day(&day.date), mark)
                }
            })
            .collect();
        println!("{}", line.join(""));
    }
    Ok(())
}
