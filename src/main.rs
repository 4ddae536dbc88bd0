// ==========================================
// 酸奶产线排产系统 - 命令行入口
// ==========================================
// 用法: yoghurt-sequencer <INPUT.csv> [--config cfg.json] [--output out.csv] [--runs]
//       [--only-washdown] [--only-changeover] [--machine M1 ...] [--search TEXT]
// 输出: CSV 写到文件或 stdout; 日志写到 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use yoghurt_sequencer::config::ConfigManager;
use yoghurt_sequencer::engine::SequencingEngine;
use yoghurt_sequencer::domain::MachineLine;
use yoghurt_sequencer::exporter::{CsvReportWriter, RowFilter};
use yoghurt_sequencer::importer::CsvJobReader;
use yoghurt_sequencer::logging;

/// Yoghurt line sequencing: machine assignment, ordering and changeover planning.
#[derive(Parser, Debug)]
#[command(name = "yoghurt-sequencer", version)]
struct Args {
    /// Input CSV with canonical column names (product_name required).
    input: PathBuf,

    /// JSON config file. Defaults are used when omitted.
    #[arg(short, long, env = "YOGHURT_SEQUENCER_CONFIG")]
    config: Option<PathBuf>,

    /// Output CSV path. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write compressed runs instead of one row per job.
    #[arg(long)]
    runs: bool,

    /// Process machine partitions on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_log: bool,

    /// Only write rows that require a washdown.
    #[arg(long)]
    only_washdown: bool,

    /// Only write rows that require a changeover.
    #[arg(long)]
    only_changeover: bool,

    /// Only write rows for these machines (repeatable: --machine M1 --machine M3).
    #[arg(long = "machine", value_name = "MACHINE", value_parser = parse_machine)]
    machines: Vec<MachineLine>,

    /// Only write rows whose product name contains this text (case-insensitive).
    #[arg(long)]
    search: Option<String>,
}

impl Args {
    fn row_filter(&self) -> RowFilter {
        RowFilter {
            only_washdown: self.only_washdown,
            only_changeover: self.only_changeover,
            machines: self.machines.clone(),
            search: self.search.clone(),
        }
    }
}

fn parse_machine(raw: &str) -> Result<MachineLine, String> {
    MachineLine::parse(raw).ok_or_else(|| format!("未知产线: {} (可选 M1, M2, M3, BUCKET_LINE, UNKNOWN)", raw))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.json_log);

    info!("==================================================");
    info!("{} v{}", yoghurt_sequencer::APP_NAME, yoghurt_sequencer::VERSION);
    info!("==================================================");

    // 加载配置
    let manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => ConfigManager::with_defaults(),
    };
    let mut config = (*manager.config()).clone();
    if args.sequential {
        config.parallel = false;
    }
    let config = Arc::new(config);

    // 导入
    let reader = CsvJobReader::new(&config.compression);
    let jobs = reader
        .read_path(&args.input)
        .with_context(|| format!("导入失败: {}", args.input.display()))?;

    // 排产
    let engine = SequencingEngine::new(Arc::clone(&config)).context("引擎初始化失败")?;
    let result = engine.run(jobs).context("排产失败")?;

    for summary in result.summaries() {
        info!(
            machine = %summary.machine,
            jobs = summary.job_count,
            runs = summary.run_count,
            changeovers = summary.changeover_count,
            washdowns = summary.washdown_count,
            downtime_minutes = summary.total_downtime_minutes,
            max_risk = summary.max_risk_score,
            "产线汇总"
        );
    }

    // 导出
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("无法创建输出文件: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let filter = args.row_filter();
    if !filter.is_empty() {
        info!(?filter, "输出行筛选");
    }
    let mut writer = CsvReportWriter::new(sink, &config).with_filter(filter);
    let rows = if args.runs {
        writer.write_runs(&result)?
    } else {
        writer.write_jobs(&result)?
    };

    info!(rows, runs = args.runs, "输出完成");
    Ok(())
}
