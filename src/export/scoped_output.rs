// ==========================================
// 活动跟踪看板 - 作用域输出文件
// ==========================================
// 在目标目录创建临时文件，写入完成后原子替换目标文件
// 任一步骤失败时临时文件随句柄释放被删除
// ==========================================

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 原子写出字节到目标路径
///
/// 目标目录必须已存在
pub fn persist_atomically(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
