use crate::model::{RawSfsFragment, SuperSfs};

/// 将一条 read 的 SFS 片段（按 read_position 升序）合并为 super-SFS。
///
/// 从左到右单次扫描，累加器为 owned 值：
/// - 片段起点落在累加器覆盖区间内：追加 `f.text` 中越过累加器右端的部分，不校验重叠字节是否一致；
///   被完全包含的片段不改变累加器；
/// - 否则输出累加器，并以该片段重新开始。
///
/// 与上游输出保持一致：扫描只覆盖下标 `1..L-1`，最后一个片段不参与重叠判断，
/// 在累加器输出之后单独输出。
pub fn merge(fragments: &[RawSfsFragment]) -> Vec<SuperSfs> {
    let Some((first, rest)) = fragments.split_first() else {
        return Vec::new();
    };

    let seed = SuperSfs { text: first.text.clone(), read_position: first.read_position };
    let (scanned, last) = match rest.split_last() {
        Some((last, middle)) => (middle, Some(last)),
        None => (rest, None),
    };

    let (mut out, acc) = scanned.iter().fold((Vec::new(), seed), |(mut out, mut acc), f| {
        if f.read_position < acc.read_end() {
            let covered = ((acc.read_end() - f.read_position) as usize).min(f.text.len());
            acc.text.extend_from_slice(&f.text[covered..]);
        } else {
            out.push(acc);
            acc = SuperSfs { text: f.text.clone(), read_position: f.read_position };
        }
        (out, acc)
    });
    out.push(acc);

    if let Some(last) = last {
        out.push(SuperSfs { text: last.text.clone(), read_position: last.read_position });
    }
    out
}

/// 先按 read_position 稳定排序再合并
pub fn merge_sorted(fragments: &[RawSfsFragment]) -> Vec<SuperSfs> {
    if fragments.windows(2).all(|w| w[0].read_position <= w[1].read_position) {
        return merge(fragments);
    }
    let mut sorted = fragments.to_vec();
    sorted.sort_by_key(|f| f.read_position);
    merge(&sorted)
}
