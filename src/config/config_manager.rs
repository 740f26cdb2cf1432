// ==========================================
// 活动跟踪看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 约定: 缺失键使用默认值；格式错误的值记录告警后回退默认值
// ==========================================

use crate::config::dashboard_config::DashboardConfig;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{ensure_config_schema, open_in_memory_connection, open_sqlite_connection};
use crate::domain::TaskStatus;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（确保 config_kv 表存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 使用内存数据库（测试/一次性会话）
    pub fn in_memory() -> ConfigResult<Self> {
        let conn = open_in_memory_connection()?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = Self::lock(&conn)?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(conn: &Arc<Mutex<Connection>>) -> ConfigResult<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|e| ConfigError::LockPoisoned(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = Self::lock(&self.conn)?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                message: "配置键不能为空".to_string(),
            });
        }

        let conn = Self::lock(&self.conn)?;
        let now = chrono::Local::now().naive_local().to_string();
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, now],
        )?;

        tracing::debug!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = Self::lock(&self.conn)?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 类型化读取 =====

    /// 读取可解析的配置值，格式错误时回退默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    /// 读取状态同义词表
    ///
    /// 配置格式为 JSON: {"encours": "IN_PROGRESS", "Terminée": "COMPLETED"}
    /// 配置存在时与默认表合并（配置项优先）
    pub fn get_status_synonyms(
        &self,
        defaults: &BTreeMap<String, TaskStatus>,
    ) -> ConfigResult<BTreeMap<String, TaskStatus>> {
        let mut synonyms = defaults.clone();
        let Some(raw) = self.get_config_value(config_keys::STATUS_SYNONYMS)? else {
            return Ok(synonyms);
        };

        match serde_json::from_str::<BTreeMap<String, TaskStatus>>(&raw) {
            Ok(configured) => synonyms.extend(configured),
            Err(e) => {
                tracing::warn!(
                    config_key = config_keys::STATUS_SYNONYMS,
                    error = %e,
                    "状态同义词配置格式错误，使用默认表"
                );
            }
        }
        Ok(synonyms)
    }

    /// 加载完整的看板配置（缺失键使用默认值）
    pub fn load_dashboard_config(&self) -> ConfigResult<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let cache_file_path = self
            .get_config_value(config_keys::CACHE_FILE_PATH)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| defaults.cache_file_path.clone());

        let config = DashboardConfig {
            status_synonyms: self.get_status_synonyms(&defaults.status_synonyms)?,
            label_max_len: self.get_parsed_or(config_keys::LABEL_MAX_LEN, defaults.label_max_len)?,
            cache_file_path,
            export_sheet_name: self
                .get_config_or_default(config_keys::EXPORT_SHEET_NAME, &defaults.export_sheet_name)?,
            report_title: self.get_config_or_default(config_keys::REPORT_TITLE, &defaults.report_title)?,
            pdf_min_col_width_mm: self
                .get_parsed_or(config_keys::PDF_MIN_COL_WIDTH_MM, defaults.pdf_min_col_width_mm)?,
            pdf_max_col_width_mm: self
                .get_parsed_or(config_keys::PDF_MAX_COL_WIDTH_MM, defaults.pdf_max_col_width_mm)?,
            pdf_body_font_size: self
                .get_parsed_or(config_keys::PDF_BODY_FONT_SIZE, defaults.pdf_body_font_size)?,
            pdf_title_font_size: self
                .get_parsed_or(config_keys::PDF_TITLE_FONT_SIZE, defaults.pdf_title_font_size)?,
            locale: self.get_config_or_default(config_keys::LOCALE, &defaults.locale)?,
        };

        if config.pdf_min_col_width_mm > config.pdf_max_col_width_mm {
            return Err(ConfigError::InvalidValue {
                key: config_keys::PDF_MIN_COL_WIDTH_MM.to_string(),
                value: config.pdf_min_col_width_mm.to_string(),
                message: format!("列宽下限大于上限 {}", config.pdf_max_col_width_mm),
            });
        }

        Ok(config)
    }

    /// 保存完整的看板配置
    pub fn save_dashboard_config(&self, config: &DashboardConfig) -> ConfigResult<()> {
        self.set_config_value(
            config_keys::STATUS_SYNONYMS,
            &serde_json::to_string(&config.status_synonyms)?,
        )?;
        self.set_config_value(config_keys::LABEL_MAX_LEN, &config.label_max_len.to_string())?;
        self.set_config_value(
            config_keys::CACHE_FILE_PATH,
            &config.cache_file_path.to_string_lossy(),
        )?;
        self.set_config_value(config_keys::EXPORT_SHEET_NAME, &config.export_sheet_name)?;
        self.set_config_value(config_keys::REPORT_TITLE, &config.report_title)?;
        self.set_config_value(
            config_keys::PDF_MIN_COL_WIDTH_MM,
            &config.pdf_min_col_width_mm.to_string(),
        )?;
        self.set_config_value(
            config_keys::PDF_MAX_COL_WIDTH_MM,
            &config.pdf_max_col_width_mm.to_string(),
        )?;
        self.set_config_value(
            config_keys::PDF_BODY_FONT_SIZE,
            &config.pdf_body_font_size.to_string(),
        )?;
        self.set_config_value(
            config_keys::PDF_TITLE_FONT_SIZE,
            &config.pdf_title_font_size.to_string(),
        )?;
        self.set_config_value(config_keys::LOCALE, &config.locale)?;
        Ok(())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 规范化
    pub const STATUS_SYNONYMS: &str = "status_synonyms"; // 状态同义词表 (JSON)

    // 数据源
    pub const CACHE_FILE_PATH: &str = "cache_file_path";

    // 图表
    pub const LABEL_MAX_LEN: &str = "label_max_len";

    // 导出
    pub const EXPORT_SHEET_NAME: &str = "export_sheet_name";
    pub const REPORT_TITLE: &str = "report_title";
    pub const PDF_MIN_COL_WIDTH_MM: &str = "pdf_min_col_width_mm";
    pub const PDF_MAX_COL_WIDTH_MM: &str = "pdf_max_col_width_mm";
    pub const PDF_BODY_FONT_SIZE: &str = "pdf_body_font_size";
    pub const PDF_TITLE_FONT_SIZE: &str = "pdf_title_font_size";

    // 界面
    pub const LOCALE: &str = "locale";
}
