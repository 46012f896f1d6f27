use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::io::ms::{parse_ms_text, MsRecord};
use crate::model::{Mem, ReadMap};

/// 从一条 read 的 lengths/pointers 数组导出 MEM。
///
/// 总是输出位置 0 的 MEM；之后对 `i ∈ [1, n-2)`，若 `lengths[i] < lengths[i+1]`
/// （matching statistics 曲线上升）则输出位置 `i+1` 的 MEM。
/// 末尾两个位置是哨兵槽位，不作为触发点。
pub fn mems_from_arrays(lengths: &[usize], pointers: &[usize]) -> Vec<Mem> {
    let n = lengths.len().min(pointers.len());
    if n == 0 {
        return Vec::new();
    }

    let mut mems = vec![Mem::new(pointers[0], lengths[0], 0)];
    for i in 1..n.saturating_sub(2) {
        if lengths[i] < lengths[i + 1] {
            mems.push(Mem::new(pointers[i + 1], lengths[i + 1], i + 1));
        }
    }
    mems
}

/// 对已解析的两组记录逐条导出 MEM，记录数或每条整数个数不一致即报错
pub fn extract_records(lengths: &[MsRecord], pointers: &[MsRecord]) -> Result<ReadMap<Vec<Mem>>> {
    if lengths.len() != pointers.len() {
        return Err(Error::ShapeMismatch(format!(
            "{} records in lengths, {} in pointers",
            lengths.len(),
            pointers.len()
        )));
    }

    let mut out = ReadMap::new();
    for (k, (l, p)) in lengths.iter().zip(pointers).enumerate() {
        if l.values.len() != p.values.len() {
            return Err(Error::ShapeMismatch(format!(
                "record {} ('{}'): {} lengths vs {} pointers",
                k,
                l.name,
                l.values.len(),
                p.values.len()
            )));
        }
        if l.name != p.name {
            warn!("record {}: lengths name '{}' differs from pointers name '{}'", k, l.name, p.name);
        }
        out.insert(l.name.clone(), mems_from_arrays(&l.values, &p.values));
    }

    debug!(
        "extracted {} MEMs over {} reads",
        out.values().map(Vec::len).sum::<usize>(),
        out.len()
    );
    Ok(out)
}

/// `extract(lengths_text, pointers_text)`
pub fn extract(lengths_text: &str, pointers_text: &str) -> Result<ReadMap<Vec<Mem>>> {
    let lengths = parse_ms_text(lengths_text, "lengths")?;
    let pointers = parse_ms_text(pointers_text, "pointers")?;
    extract_records(&lengths, &pointers)
}
