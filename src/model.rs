//! 各阶段共享的数据结构。

use std::collections::HashMap;

/// 解码得到的单个 SFS 片段（长度 < 3 的片段在解码时已丢弃）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSfsFragment {
    pub text: Vec<u8>,
    pub read_position: u64,
    pub reference_position: u64,
}

/// 每条 read 头部记录的最长 MEM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadMemSummary {
    pub position: u64,
    pub index: u64,
    pub length: u64,
}

/// 合并后的覆盖串（super-SFS），拥有自己的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperSfs {
    pub text: Vec<u8>,
    pub read_position: u64,
}

impl SuperSfs {
    /// 覆盖区间的右端（不含）
    #[inline]
    pub fn read_end(&self) -> u64 {
        self.read_position + self.text.len() as u64
    }
}

/// 从 lengths/pointers 数组导出的 MEM，参考区间 [reference_start, reference_end)。
/// 右端在 usize 上饱和，组装时再截断到参考长度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mem {
    pub reference_start: usize,
    pub reference_end: usize,
    pub length: usize,
    pub array_index: usize,
}

impl Mem {
    pub fn new(pointer: usize, length: usize, array_index: usize) -> Self {
        Self {
            reference_start: pointer,
            reference_end: pointer.saturating_add(length),
            length,
            array_index,
        }
    }
}

/// 按首次插入顺序迭代的 read 名称映射。
///
/// 重复名称会替换旧值，但保留旧位置。
#[derive(Debug, Clone)]
pub struct ReadMap<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for ReadMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> ReadMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入；若名称已存在则返回被替换的旧值
    pub fn insert(&mut self, name: String, value: T) -> Option<T> {
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// 底层有序条目，供按 read 并行处理使用
    pub fn entries(&self) -> &[(String, T)] {
        &self.entries
    }
}

impl<T> FromIterator<(String, T)> for ReadMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = ReadMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// 颜色：0 = MEM，1 = SFS，≥2 = 每条 query read 一个
pub type Color = u32;

pub const MEM_COLOR: Color = 0;
pub const SFS_COLOR: Color = 1;
pub const FIRST_READ_COLOR: Color = 2;

/// 交给下游建图工具的最终记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredRecord {
    pub label: String,
    pub sequence: Vec<u8>,
    pub color: Color,
}
