// crates/rosi_physics/src/transpiration_log.rs

//! 蒸腾记录
//!
//! 每个时间步追加一行 `time, value[, value...]`，文件只追加不回写。

use rosi_foundation::{RosiError, RosiResult};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 追加式 CSV 蒸腾记录
pub struct TranspirationLog {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl TranspirationLog {
    /// 创建新文件，已有文件被截断
    pub fn create(path: impl AsRef<Path>) -> RosiResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                RosiError::io_with_source(format!("无法创建目录 {}", dir.display()), e)
            })?;
        }
        let file = File::create(&path)
            .map_err(|e| RosiError::io_with_source(format!("无法创建 {}", path.display()), e))?;
        debug!("蒸腾记录: {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// 打开已有文件继续追加，不存在时创建
    pub fn append_to(path: impl AsRef<Path>) -> RosiResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RosiError::io_with_source(format!("无法打开 {}", path.display()), e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// 追加一行
    pub fn append(&mut self, time: f64, values: &[f64]) -> RosiResult<()> {
        write!(self.writer, "{time}")?;
        for v in values {
            write!(self.writer, ", {v}")?;
        }
        writeln!(self.writer)?;
        self.lines += 1;
        Ok(())
    }

    /// 写出缓冲
    pub fn flush(&mut self) -> RosiResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// 本次写入的行数
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TranspirationLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
