// ==========================================
// 集成测试辅助模块
// ==========================================
// 各测试文件只用到其中一部分
#![allow(dead_code)]

pub mod row_builder;

pub use row_builder::{sample_rows, write_csv, RowBuilder};
