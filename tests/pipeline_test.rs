// ==========================================
// 流水线集成测试
// ==========================================
// 测试目标: 规范化 → 聚合 → 逾期判定 的端到端性质
// ==========================================

mod helpers;

use activity_dashboard::domain::{ActivityRecord, FilterCriteria, RawTaskRecord, TaskStatus};
use activity_dashboard::engine::{ActivityAggregator, AggregateOutcome, OverdueClassifier};
use activity_dashboard::importer::TaskNormalizer;
use activity_dashboard::logging;
use chrono::{Duration, NaiveDate};
use helpers::{sample_rows, RowBuilder};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn aggregate_all(rows: &[activity_dashboard::importer::RawRow]) -> Vec<ActivityRecord> {
    let tasks = TaskNormalizer::default().normalize_rows(rows).tasks;
    ActivityAggregator::new()
        .aggregate(&tasks, &FilterCriteria::all())
        .into_activities()
        .expect("样例数据应产生活动")
}

fn find<'a>(records: &'a [ActivityRecord], activity: &str) -> &'a ActivityRecord {
    records
        .iter()
        .find(|r| r.activity == activity)
        .unwrap_or_else(|| panic!("活动 {activity} 不存在"))
}

#[test]
fn test_statuses_are_canonical_after_normalization() {
    logging::init_test();
    let rows = vec![
        RowBuilder::new("A", "D", "X").task("1").status("encours").build(),
        RowBuilder::new("A", "D", "X").task("2").status("???").rate("30").build(),
        RowBuilder::new("A", "D", "X").task("3").status("En attente").build(),
        RowBuilder::new("A", "D", "X").task("4").status("None").rate("100").build(),
    ];
    let tasks = TaskNormalizer::default().normalize_rows(&rows).tasks;

    assert_eq!(tasks.len(), 4);
    for task in &tasks {
        assert!(["Completed", "In Progress", "Pending"].contains(&task.status.as_str()));
    }
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[1].status, TaskStatus::InProgress);
    assert_eq!(tasks[2].status, TaskStatus::Pending);
    assert_eq!(tasks[3].status, TaskStatus::Completed);
}

#[test]
fn test_activity_counts_and_rate_invariants() {
    let records = aggregate_all(&sample_rows());

    assert_eq!(records.len(), 4);
    for record in &records {
        assert!(record.counts_consistent(), "计数不守恒: {record:?}");
        assert!((0.0..=100.0).contains(&record.completion_rate));
    }
}

#[test]
fn test_normalizer_idempotent_on_sample() {
    let normalizer = TaskNormalizer::default();
    let once = normalizer.normalize_rows(&sample_rows());
    let again: Vec<RawTaskRecord> = once.tasks.iter().map(RawTaskRecord::from).collect();
    let twice = normalizer.normalize(again);

    assert_eq!(twice.tasks, once.tasks);
    assert_eq!(twice.report.dropped_missing_keys, 0);
    assert_eq!(twice.report.duplicates_removed, 0);
}

#[test]
fn test_duplicate_rows_first_seen_wins() {
    let rows = vec![
        RowBuilder::new("Alice", "Health", "Vaccination")
            .task("T1")
            .status("Completed")
            .build(),
        RowBuilder::new("Alice", "Health", "Vaccination")
            .task("T1")
            .status("Pending")
            .build(),
    ];
    let outcome = TaskNormalizer::default().normalize_rows(&rows);

    assert_eq!(outcome.tasks.len(), 1);
    assert_eq!(outcome.tasks[0].status, TaskStatus::Completed);
    assert_eq!(outcome.tasks[0].row_number, 1);
}

#[test]
fn test_status_inferred_from_rate() {
    let rows = vec![
        RowBuilder::new("A", "D", "X").task("0").status("").rate("0").build(),
        RowBuilder::new("A", "D", "X").task("45").status("").rate("45").build(),
        RowBuilder::new("A", "D", "X").task("100").status("").rate("100").build(),
    ];
    let tasks = TaskNormalizer::default().normalize_rows(&rows).tasks;

    let statuses: Vec<&str> = tasks.iter().map(|t| t.status.as_str()).collect();
    assert_eq!(statuses, vec!["Pending", "In Progress", "Completed"]);
}

#[test]
fn test_aggregation_example() {
    let rows = vec![
        RowBuilder::new("Alice", "Health", "Vaccination").task("T1").status("Completed").build(),
        RowBuilder::new("Alice", "Health", "Vaccination").task("T2").status("Completed").build(),
        RowBuilder::new("Alice", "Health", "Vaccination").task("T3").status("Pending").build(),
    ];
    let records = aggregate_all(&rows);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.total_tasks, 3);
    assert_eq!(record.completed_tasks, 2);
    assert_eq!(record.pending_tasks, 1);
    assert_eq!(record.completion_rate, 66.7);
    assert_eq!(record.status.as_str(), "In Progress");
}

#[test]
fn test_sample_rollups() {
    let records = aggregate_all(&sample_rows());

    let vaccination = find(&records, "Vaccination");
    assert_eq!(vaccination.completed_tasks, 2);
    assert_eq!(vaccination.latest_deadline, Some(date(2025, 5, 1)));

    let campagne = find(&records, "Campagne");
    assert_eq!(campagne.status, TaskStatus::Completed);
    assert_eq!(campagne.completion_rate, 100.0);

    // 进行中 + 待开始 → 进行中
    let formation = find(&records, "Formation");
    assert_eq!(formation.status, TaskStatus::InProgress);
    assert_eq!(formation.completion_rate, 0.0);

    let inventaire = find(&records, "Inventaire");
    assert_eq!(inventaire.status, TaskStatus::Pending);
    assert_eq!(inventaire.latest_deadline, None);
}

#[test]
fn test_overdue_example() {
    let today = date(2025, 6, 1);
    let yesterday = today - Duration::days(1);
    let classifier = OverdueClassifier::new(today);

    let mut record = ActivityRecord {
        responsible: "Alice".to_string(),
        domain: "Health".to_string(),
        activity: "Vaccination".to_string(),
        total_tasks: 5,
        completed_tasks: 4,
        in_progress_tasks: 1,
        pending_tasks: 0,
        completion_rate: 80.0,
        latest_deadline: Some(yesterday),
        status: TaskStatus::InProgress,
    };
    assert!(classifier.is_overdue(&record));

    record.completion_rate = 100.0;
    assert!(!classifier.is_overdue(&record));

    record.latest_deadline = Some(date(2000, 1, 1));
    assert!(!classifier.is_overdue(&record));
}

#[test]
fn test_sample_overdue_report() {
    let records = aggregate_all(&sample_rows());
    let report = OverdueClassifier::new(date(2025, 6, 1)).overdue_report(&records);

    let names: Vec<&str> = report.activities.iter().map(|r| r.activity.as_str()).collect();
    assert_eq!(names, vec!["Vaccination", "Formation"]);
    assert!(!report.all_zero_progress);
}

#[test]
fn test_filter_without_match_is_no_data() {
    let tasks = TaskNormalizer::default().normalize_rows(&sample_rows()).tasks;
    let filter = FilterCriteria::all().with_domains(["Agriculture"]);
    let outcome = ActivityAggregator::new().aggregate(&tasks, &filter);

    assert_eq!(outcome, AggregateOutcome::NoData);
}

#[test]
fn test_filters_combine() {
    let tasks = TaskNormalizer::default().normalize_rows(&sample_rows()).tasks;
    let filter = FilterCriteria::all()
        .with_domains(["Education"])
        .with_responsibles(["Bob"]);
    let records = ActivityAggregator::new()
        .aggregate(&tasks, &filter)
        .into_activities()
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].activity, "Formation");
    assert_eq!(records[0].total_tasks, 2);
}
