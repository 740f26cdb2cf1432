// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 加载（Fresh/Cached）→ 视图 → 导出 完整流程
// ==========================================

mod helpers;

use activity_dashboard::api::{ApiError, DashboardApi, ViewOutcome};
use activity_dashboard::config::{ConfigManager, DashboardConfig};
use activity_dashboard::domain::{FilterCriteria, TaskStatus};
use activity_dashboard::importer::{ImportError, LoadMode};
use activity_dashboard::logging;
use chrono::NaiveDate;
use helpers::{sample_rows, write_csv, RowBuilder};
use std::path::Path;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn config_in(dir: &Path) -> DashboardConfig {
    DashboardConfig {
        cache_file_path: dir.join("cache").join("datafile.xlsx"),
        ..DashboardConfig::default()
    }
}

#[test]
fn test_fresh_load_writes_cache_and_cached_load_reads_it() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "liste.csv", &sample_rows());

    let mut fresh = DashboardApi::new(config_in(dir.path()));
    let report = fresh.load_from_file(&csv).unwrap().clone();
    assert_eq!(report.input_rows, 7);
    assert_eq!(report.output_rows, 7);
    assert!(fresh.cache().exists());
    assert!(fresh.cache_last_modified().is_some());

    let mut cached = DashboardApi::new(config_in(dir.path()));
    cached.load_dataset(LoadMode::Cached, None).unwrap();
    assert_eq!(cached.load_mode(), Some(LoadMode::Cached));
    assert_eq!(cached.tasks().unwrap(), fresh.tasks().unwrap());
}

#[test]
fn test_cached_load_without_cache_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));

    let err = api.load_dataset(LoadMode::Cached, None).unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::FileNotFound(_))));
    assert!(err.is_load_failure());
}

#[test]
fn test_failed_reload_keeps_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));
    api.load_from_rows(&sample_rows()).unwrap();

    let missing = dir.path().join("absent.csv");
    assert!(api.load_from_file(&missing).is_err());
    assert_eq!(api.tasks().unwrap().len(), 7);
}

#[test]
fn test_view_for_sample_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));
    api.load_from_rows(&sample_rows()).unwrap();

    let outcome = api.build_view(&FilterCriteria::all(), today()).unwrap();
    let view = outcome.view().expect("应有数据");

    assert_eq!(view.kpi.total, 4);
    assert_eq!(view.kpi.completed, 1);
    assert_eq!(view.kpi.in_progress, 2);
    assert_eq!(view.kpi.overdue, 2);
    assert_eq!(view.kpi.pending, 1);

    let by_status = view.by_status.as_ref().expect("存在已定义任务");
    let total: usize = by_status.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 4);

    // Formation 完成率为 0，不进入完成率序列
    let labels: Vec<&str> = view
        .completion_by_activity
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Vaccination", "Campagne"]);
    assert_eq!(view.overdue_bars.len(), 2);
}

#[test]
fn test_unknown_domain_gives_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));
    api.load_from_rows(&sample_rows()).unwrap();

    let filter = FilterCriteria::all().with_domains(["Agriculture"]);
    let outcome = api.build_view(&filter, today()).unwrap();
    assert_eq!(outcome, ViewOutcome::NoData);
}

#[test]
fn test_filter_options_sorted_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));
    api.load_from_rows(&sample_rows()).unwrap();

    let options = api.filter_options().unwrap();
    assert_eq!(options.responsibles, vec!["Alice", "Bob", "Chloé"]);
    assert_eq!(options.domains, vec!["Education", "Health"]);
    assert_eq!(
        options.statuses,
        vec![TaskStatus::Completed, TaskStatus::InProgress, TaskStatus::Pending]
    );
}

#[test]
fn test_export_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut api = DashboardApi::new(config_in(dir.path()));
    api.load_from_rows(&sample_rows()).unwrap();

    let outcome = api.build_view(&FilterCriteria::all(), today()).unwrap();
    let view = outcome.view().unwrap();

    let xlsx = api.export_excel(&view.activities, out.path()).unwrap();
    let pdf = api.export_pdf(&view.activities, out.path()).unwrap();

    assert_eq!(
        xlsx.mime,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(pdf.mime, "application/pdf");
    assert!(xlsx.path.is_file());
    assert!(std::fs::read(&pdf.path).unwrap().starts_with(b"%PDF"));
    assert_ne!(xlsx.path, pdf.path);

    let err = api.export_excel(&[], out.path()).unwrap_err();
    assert!(matches!(err, ApiError::Export(_)));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 2);
}

#[test]
fn test_configured_synonyms_drive_normalization() {
    let manager = ConfigManager::in_memory().unwrap();
    let mut config = manager.load_dashboard_config().unwrap();
    config
        .status_synonyms
        .insert("Fait".to_string(), TaskStatus::Completed);
    manager.save_dashboard_config(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let reloaded = DashboardConfig {
        cache_file_path: dir.path().join("datafile.xlsx"),
        ..manager.load_dashboard_config().unwrap()
    };
    let mut api = DashboardApi::new(reloaded);
    api.load_from_rows(&[RowBuilder::new("Alice", "Health", "Vaccination")
        .task("T1")
        .status("fait")
        .build()])
        .unwrap();

    assert_eq!(api.tasks().unwrap()[0].status, TaskStatus::Completed);
    assert_eq!(api.normalize_report().unwrap().statuses_folded, 1);
}
