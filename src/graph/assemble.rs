use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::extract::merge_sorted;
use crate::io::fasta::FastaRecord;
use crate::io::sfs::SfsRecords;
use crate::model::{ColoredRecord, Mem, RawSfsFragment, ReadMap, FIRST_READ_COLOR, MEM_COLOR, SFS_COLOR};

use super::AssembleOpt;

pub const MEM_LABEL_PREFIX: &str = "MEM From:\t";
pub const SFS_LABEL_PREFIX: &str = "SSS From:\t";

/// 组装所需的全部输入
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub reference: &'a [u8],
    pub queries: &'a [FastaRecord],
    pub sfs: &'a SfsRecords,
    pub mems: &'a ReadMap<Vec<Mem>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub query_records: usize,
    pub mem_records: usize,
    pub sfs_records: usize,
    pub clamped_mems: usize,
}

/// 有序记录列表；序列与颜色按下标一一对应
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub records: Vec<ColoredRecord>,
    pub stats: AssemblyStats,
}

impl Assembly {
    pub fn colors(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|r| r.color)
    }
}

/// 一条 read 的 MEM 对应的参考子串。越过参考末端的区间被截断。
fn mem_records(reference: &[u8], name: &str, mems: &[Mem]) -> (Vec<ColoredRecord>, usize) {
    let mut clamped = 0usize;
    let records = mems
        .iter()
        .map(|m| {
            let end = m.reference_end.min(reference.len());
            let start = m.reference_start.min(end);
            if end < m.reference_end {
                clamped += 1;
            }
            ColoredRecord {
                label: format!("{}{}", MEM_LABEL_PREFIX, name),
                sequence: reference[start..end].to_vec(),
                color: MEM_COLOR,
            }
        })
        .collect();
    (records, clamped)
}

fn sfs_records(name: &str, fragments: &[RawSfsFragment]) -> Vec<ColoredRecord> {
    merge_sorted(fragments)
        .into_iter()
        .map(|s| ColoredRecord {
            label: format!("{}{}", SFS_LABEL_PREFIX, name),
            sequence: s.text,
            color: SFS_COLOR,
        })
        .collect()
}

type PerRead = (Vec<Vec<ColoredRecord>>, usize, Vec<Vec<ColoredRecord>>);

fn derive_sequential(input: &AssemblyInput<'_>) -> PerRead {
    let mut clamped = 0usize;
    let mem_blocks = input
        .mems
        .iter()
        .map(|(name, list)| {
            let (recs, c) = mem_records(input.reference, name, list);
            clamped += c;
            recs
        })
        .collect();
    let sfs_blocks = input.sfs.fragments.iter().map(|(name, frags)| sfs_records(name, frags)).collect();
    (mem_blocks, clamped, sfs_blocks)
}

// 按 read 并行；collect 保持输入顺序
fn derive_parallel(input: &AssemblyInput<'_>) -> PerRead {
    let (mem_blocks, counts): (Vec<_>, Vec<_>) = input
        .mems
        .entries()
        .par_iter()
        .map(|(name, list)| mem_records(input.reference, name, list))
        .unzip();
    let sfs_blocks = input
        .sfs
        .fragments
        .entries()
        .par_iter()
        .map(|(name, frags)| sfs_records(name, frags))
        .collect();
    (mem_blocks, counts.into_iter().sum(), sfs_blocks)
}

/// 输出顺序：所有 query read（颜色从 2 起），然后所有 MEM（颜色 0），最后所有 super-SFS（颜色 1）
pub fn assemble(input: &AssemblyInput<'_>, opt: &AssembleOpt) -> Result<Assembly> {
    let (mem_blocks, clamped, sfs_blocks) = if opt.threads == 1 {
        derive_sequential(input)
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opt.threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        pool.install(|| derive_parallel(input))
    };

    if clamped > 0 {
        warn!(
            "{} MEMs extend past the reference end ({} bp) and were clamped",
            clamped,
            input.reference.len()
        );
    }

    let mut records: Vec<ColoredRecord> = input
        .queries
        .iter()
        .zip(FIRST_READ_COLOR..)
        .map(|(q, color)| ColoredRecord { label: q.header(), sequence: q.seq.clone(), color })
        .collect();
    let query_records = records.len();

    let mem_records: usize = mem_blocks.iter().map(Vec::len).sum();
    records.extend(mem_blocks.into_iter().flatten());
    let sfs_records: usize = sfs_blocks.iter().map(Vec::len).sum();
    records.extend(sfs_blocks.into_iter().flatten());

    debug!(
        "assembled {} records: {} queries, {} MEM, {} SFS",
        records.len(),
        query_records,
        mem_records,
        sfs_records
    );

    Ok(Assembly {
        records,
        stats: AssemblyStats { query_records, mem_records, sfs_records, clamped_mems: clamped },
    })
}
