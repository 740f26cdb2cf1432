// ==========================================
// 活动跟踪看板 - 命令行入口
// ==========================================
// 用法: activity-dashboard [数据文件] [导出目录]
// - 给出数据文件: Fresh 模式加载并更新缓存
// - 未给出: Cached 模式读取缓存
// 输出: KPI 汇总 + Excel / PDF 报表
// ==========================================

use activity_dashboard::config::{default_config_db_path, ConfigManager, DashboardConfig};
use activity_dashboard::i18n::{set_locale, t, t_with_args};
use activity_dashboard::importer::{DatasetSource, FileDatasetSource, LoadMode};
use activity_dashboard::{logging, DashboardApi, FilterCriteria, ViewOutcome};
use chrono::Local;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 版本 {}", activity_dashboard::APP_NAME, activity_dashboard::VERSION);
    tracing::info!("==================================================");

    let config = load_config();
    set_locale(&config.locale);

    let mut args = std::env::args().skip(1);
    let data_file = args.next().map(PathBuf::from);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let mut api = DashboardApi::new(config);
    let report = match &data_file {
        Some(path) => {
            if !path.is_file() {
                let shown = path.display().to_string();
                let message = t_with_args("import.file_not_found", &[("path", shown.as_str())]);
                return Err(message.into());
            }
            let source = FileDatasetSource::new(path);
            api.load_dataset(LoadMode::Fresh, Some(&source as &dyn DatasetSource))?
                .clone()
        }
        None => {
            if let Some(modified) = api.cache_last_modified() {
                let date = modified.format("%d/%m/%Y %H:%M").to_string();
                println!("{}", t_with_args("import.cache_loaded", &[("date", date.as_str())]));
            }
            api.load_dataset(LoadMode::Cached, None)?.clone()
        }
    };
    tracing::info!(
        rows = report.output_rows,
        dropped = report.dropped_missing_keys,
        "数据集加载完成"
    );

    let today = Local::now().date_naive();
    let view = match api.build_view(&FilterCriteria::all(), today)? {
        ViewOutcome::Ready(view) => view,
        ViewOutcome::NoData => {
            println!("{}", t("common.no_data"));
            return Ok(());
        }
    };

    for (key, value) in view.kpi.entries() {
        println!("{:<28} {}", t(key), value);
    }

    let xlsx = api.export_excel(&view.activities, &out_dir)?;
    let pdf = api.export_pdf(&view.activities, &out_dir)?;
    println!("{}", xlsx.path.display());
    println!("{}", pdf.path.display());

    Ok(())
}

/// 读取配置库；不可用时使用默认配置
fn load_config() -> DashboardConfig {
    let db_path = default_config_db_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %e, "无法创建配置目录，使用默认配置");
            return DashboardConfig::default();
        }
    }

    let loaded = ConfigManager::new(&db_path.to_string_lossy())
        .and_then(|manager| manager.load_dashboard_config());

    match loaded {
        Ok(config) => {
            tracing::info!(path = %db_path.display(), "配置已加载");
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "配置加载失败，使用默认配置");
            DashboardConfig::default()
        }
    }
}
