// ==========================================
// 导入/导出 端到端测试
// ==========================================
// 测试目标: CSV 导入 → 排产 → CSV 导出,导出文件可再次导入
// ==========================================

use std::fs;
use std::io::Write;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};
use yoghurt_sequencer::config::{ConfigManager, SequencerConfig};
use yoghurt_sequencer::domain::types::MachineLine;
use yoghurt_sequencer::engine::SequencingEngine;
use yoghurt_sequencer::domain::QaDisposition;
use yoghurt_sequencer::exporter::{CsvReportWriter, OutputRow, RowFilter};
use yoghurt_sequencer::importer::{CsvJobReader, ImportError};

const INPUT_CSV: &str = "\
product_name,flavour_name,ph,machine,packed_trays,packed_kg
Greek Natural 150g,,4.4,,20,3
Vanilla 150g,,4.2,,10,1.5
Honey Almond Granola 150g,,4.3,,6,
Natural 5kg,,4.5,,,250
C.Vanilla 450g,,4.0,,12,5.4
Vanilla 150g,,4.2,,5,0.75
,,,,,
Mystery Pot,,nan,UNKNOWN,,
";

fn write_input() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(INPUT_CSV.as_bytes()).unwrap();
    file
}

#[test]
fn test_import_sequence_export() {
    let manager = ConfigManager::with_defaults();
    let config = manager.config();
    let input = write_input();

    // 导入
    let reader = CsvJobReader::new(&config.compression);
    let jobs = reader.read_path(input.path()).unwrap();
    assert_eq!(jobs.len(), 7);
    assert_eq!(jobs[0].pack_size_g, Some(150.0));
    assert!(jobs[0].is_plain);
    assert!(jobs[2].has_nut_risk);
    assert_eq!(jobs[6].machine, Some(MachineLine::Unknown));

    // 排产
    let engine = SequencingEngine::from_manager(&manager).unwrap();
    let result = engine.run(jobs).unwrap();
    assert_eq!(result.plan(MachineLine::M3).unwrap().jobs.len(), 1);
    assert_eq!(result.plan(MachineLine::BucketLine).unwrap().jobs.len(), 1);

    // 导出
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("sequence.csv");
    let file = fs::File::create(&out_path).unwrap();
    let mut writer = CsvReportWriter::new(file, &config);
    let rows = writer.write_jobs(&result).unwrap();
    assert_eq!(rows, 7);
    drop(writer);

    // 导出文件可再次导入,机组保持
    let reimported = reader.read_path(&out_path).unwrap();
    assert_eq!(reimported.len(), 7);
    let exported_machines: Vec<MachineLine> =
        reimported.iter().map(|j| j.machine_line()).collect();
    let planned_machines: Vec<MachineLine> = result.jobs().map(|j| j.machine()).collect();
    assert_eq!(exported_machines, planned_machines);

    let trays: f64 = reimported.iter().map(|j| j.quantity("packed_trays")).sum();
    assert_eq!(trays, 53.0);

    println!("✓ 导入 → 排产 → 导出 → 再导入 一致");
}

#[test]
fn test_runs_export() {
    let config = Arc::new(SequencerConfig::default());
    let input = write_input();

    let jobs = CsvJobReader::new(&config.compression)
        .read_path(input.path())
        .unwrap();
    let engine = SequencingEngine::new(Arc::clone(&config)).unwrap();
    let result = engine.run(jobs).unwrap();

    let mut writer = CsvReportWriter::new(Vec::new(), &config);
    let rows = writer.write_runs(&result).unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    // 两行 Vanilla 150g 合并
    assert_eq!(rows, 6);
    assert!(text.lines().any(|l| l.contains(",Vanilla 150g,") && l.ends_with(",15,2.25")));

    println!("✓ 批次导出");
}

#[test]
fn test_config_file_drives_import_fields() {
    let dir = TempDir::new().unwrap();
    let cfg_path = dir.path().join("config.json");
    fs::write(&cfg_path, r#"{ "compression": { "quantity_fields": ["packed_kg"] } }"#).unwrap();

    let manager = ConfigManager::from_file(&cfg_path).unwrap();
    let input = write_input();
    let jobs = CsvJobReader::new(&manager.config().compression)
        .read_path(input.path())
        .unwrap();

    assert!(jobs.iter().all(|j| !j.quantities.contains_key("packed_trays")));
    assert_eq!(jobs[3].quantity("packed_kg"), 250.0);

    println!("✓ 配置决定导入的数量列");
}

#[test]
fn test_invalid_row_aborts_import() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"product_name,ph\nVanilla 150g,4.2\nMango 175g,sour\n")
        .unwrap();

    let reader = CsvJobReader::new(&SequencerConfig::default().compression);
    match reader.read_path(file.path()) {
        Err(ImportError::InvalidValue { row, field, .. }) => {
            assert_eq!(row, 2);
            assert_eq!(field, "ph");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_flavoured_greek_pots_need_washdown() {
    let config = Arc::new(SequencerConfig::default());
    let csv = "product_name,ph\nGreek Vanilla 150g,4.3\nGreek Strawberry 150g,4.3\n";

    let jobs = CsvJobReader::new(&config.compression)
        .read_from(csv.as_bytes())
        .unwrap();
    assert_eq!(jobs[0].flavour_label, "vanilla");
    assert_eq!(jobs[1].flavour_label, "strawberry");
    assert!(jobs.iter().all(|j| !j.is_plain));

    let engine = SequencingEngine::new(Arc::clone(&config)).unwrap();
    let result = engine.run(jobs).unwrap();
    let plan = result.plan(MachineLine::M1).unwrap();
    assert_eq!(plan.jobs.len(), 2);

    let second = &plan.jobs[1];
    assert!(second.changeover_required);
    assert!(second.washdown_required);
    assert!(second.washdown_reason.contains("flavour change"));

    println!("✓ 风味希腊酸奶之间需清洗");
}

#[test]
fn test_filtered_export() {
    let config = Arc::new(SequencerConfig::default());
    let input = write_input();
    let jobs = CsvJobReader::new(&config.compression)
        .read_path(input.path())
        .unwrap();
    let engine = SequencingEngine::new(Arc::clone(&config)).unwrap();
    let result = engine.run(jobs).unwrap();

    // 全量行作为对照
    let all: Vec<OutputRow> = result
        .jobs()
        .map(|j| OutputRow::from_sequenced(j, &config.risk))
        .collect();
    let expected_washdowns = all.iter().filter(|r| r.washdown_required).count();
    let expected_m1 = all.iter().filter(|r| r.machine == MachineLine::M1).count();
    assert!(expected_washdowns > 0);
    assert!(all
        .iter()
        .all(|r| r.qa_action == config.risk.disposition(r.risk_score)));
    assert!(all.iter().any(|r| r.qa_action != QaDisposition::StopLine));

    let export = |filter: RowFilter| -> (usize, String) {
        let mut writer = CsvReportWriter::new(Vec::new(), &config).with_filter(filter);
        let rows = writer.write_jobs(&result).unwrap();
        (rows, String::from_utf8(writer.into_inner().unwrap()).unwrap())
    };

    // 仅清洗
    let (rows, text) = export(RowFilter {
        only_washdown: true,
        ..Default::default()
    });
    assert_eq!(rows, expected_washdowns);
    let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
    let washdown_col = header.iter().position(|c| *c == "washdown_required").unwrap();
    assert!(header.contains(&"qa_action"));
    for line in text.lines().skip(1) {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[washdown_col], "true");
    }

    // 仅 M1
    let (rows, text) = export(RowFilter {
        machines: vec![MachineLine::M1],
        ..Default::default()
    });
    assert_eq!(rows, expected_m1);
    assert!(text.lines().skip(1).all(|l| l.starts_with("M1,")));

    // 品名搜索
    let (rows, _) = export(RowFilter {
        search: Some("VANILLA".to_string()),
        ..Default::default()
    });
    assert_eq!(rows, 3);

    println!("✓ 筛选导出");
}
