//! 序列文件与颜色文件写出。两者按位置一一对应，顺序即 `records` 顺序。

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::fasta::FastaWriter;
use crate::model::ColoredRecord;

pub fn write_sequences<W: Write>(w: W, records: &[ColoredRecord]) -> std::io::Result<()> {
    let mut fw = FastaWriter::new(w);
    for r in records {
        fw.write_record(&r.label, &r.sequence)?;
    }
    fw.into_inner().flush()
}

/// 每行一个整数，无表头
pub fn write_colors<W: Write>(mut w: W, records: &[ColoredRecord]) -> std::io::Result<()> {
    for r in records {
        writeln!(w, "{}", r.color)?;
    }
    w.flush()
}

/// 写出 `<prefix>.fa` 与 `<prefix>.colors`，返回二者路径
pub fn write_outputs(prefix: &Path, records: &[ColoredRecord]) -> Result<(PathBuf, PathBuf)> {
    let (seq_path, color_path) = output_paths(prefix);
    if let Some(parent) = seq_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let fh = std::fs::File::create(&seq_path).map_err(|e| Error::io(&seq_path, e))?;
    write_sequences(BufWriter::new(fh), records).map_err(|e| Error::io(&seq_path, e))?;

    let fh = std::fs::File::create(&color_path).map_err(|e| Error::io(&color_path, e))?;
    write_colors(BufWriter::new(fh), records).map_err(|e| Error::io(&color_path, e))?;

    Ok((seq_path, color_path))
}

/// `<prefix>.fa` 与 `<prefix>.colors`（直接追加后缀，不替换已有扩展名）
pub fn output_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |ext: &str| {
        let mut s = prefix.as_os_str().to_owned();
        s.push(".");
        s.push(ext);
        PathBuf::from(s)
    };
    (with_suffix("fa"), with_suffix("colors"))
}
