// ==========================================
// 测试数据构建器 - 原始行
// ==========================================

use activity_dashboard::importer::field_mapper::columns::RAW_COLUMNS;
use activity_dashboard::importer::RawRow;
use std::path::{Path, PathBuf};

// ==========================================
// RawRow 构建器
// ==========================================

pub struct RowBuilder {
    row: RawRow,
}

impl RowBuilder {
    pub fn new(responsible: &str, domain: &str, activity: &str) -> Self {
        let mut row = RawRow::new();
        row.insert("Responsible".to_string(), responsible.to_string());
        row.insert("Domain".to_string(), domain.to_string());
        row.insert("Activity".to_string(), activity.to_string());
        Self { row }
    }

    pub fn task(self, task: &str) -> Self {
        self.set("Task", task)
    }

    pub fn deadline(self, deadline: &str) -> Self {
        self.set("Deadline", deadline)
    }

    pub fn rate(self, rate: &str) -> Self {
        self.set("CompletionRate", rate)
    }

    pub fn status(self, status: &str) -> Self {
        self.set("Status", status)
    }

    pub fn note(self, note: &str) -> Self {
        self.set("ProgressNote", note)
    }

    pub fn set(mut self, column: &str, value: &str) -> Self {
        self.row.insert(column.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> RawRow {
        self.row
    }
}

/// 标准样例数据集
///
/// - Alice/Health/Vaccination: 3 个任务（2 完成 + 1 待开始），截止 2025-05-01
/// - Alice/Health/Campagne: 1 个任务完成
/// - Bob/Education/Formation: 2 个任务（进行中 + 待开始），截止 2025-04-15
/// - Chloé/Education/Inventaire: 无任务名、无截止日期
pub fn sample_rows() -> Vec<RawRow> {
    vec![
        RowBuilder::new("Alice", "Health", "Vaccination")
            .task("T1")
            .rate("100")
            .status("Completed")
            .deadline("2025-04-01")
            .build(),
        RowBuilder::new("Alice", "Health", "Vaccination")
            .task("T2")
            .rate("100")
            .status("Terminée")
            .deadline("2025-05-01")
            .build(),
        RowBuilder::new("Alice", "Health", "Vaccination")
            .task("T3")
            .rate("0")
            .status("Pending")
            .build(),
        RowBuilder::new("Alice", "Health", "Campagne")
            .task("C1")
            .rate("100")
            .status("")
            .deadline("2025-03-01")
            .build(),
        RowBuilder::new("Bob", "Education", "Formation")
            .task("F1")
            .rate("45")
            .status("In progress (executing)")
            .deadline("2025-04-15")
            .build(),
        RowBuilder::new("Bob", "Education", "Formation")
            .task("F2")
            .rate("")
            .status("nan")
            .build(),
        RowBuilder::new("Chloé", "Education", "Inventaire").build(),
    ]
}

/// 按原始列顺序写出 CSV
pub fn write_csv(dir: &Path, name: &str, rows: &[RawRow]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(RAW_COLUMNS).unwrap();
    for row in rows {
        let record: Vec<&str> = RAW_COLUMNS
            .iter()
            .map(|col| row.get(*col).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record).unwrap();
    }
    writer.flush().unwrap();
    path
}
