use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// 一次组装的统计摘要，以 JSON 写出
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub reference: String,
    pub query: String,
    pub query_reads: usize,
    pub mem_reads: usize,
    pub mem_records: usize,
    pub sfs_reads: usize,
    pub raw_fragments: usize,
    pub super_sfs_records: usize,
    pub clamped_mems: usize,
    pub total_records: usize,
    pub generated_at: String,
}

impl RunReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let fh = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
        let mut w = std::io::BufWriter::new(fh);
        serde_json::to_writer_pretty(&mut w, self).map_err(|e| Error::io(path, e.into()))?;
        w.write_all(b"\n").and_then(|()| w.flush()).map_err(|e| Error::io(path, e))
    }
}
