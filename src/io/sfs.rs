//! SFS 二进制流的解码与编码。
//!
//! 流格式（所有整数为 8 字节小端无符号，字符串为长度前缀 ASCII，无终止符）：
//!
//! ```text
//! repeat until name_length == 0:
//!   name_length, name,
//!   max_mem_position, max_mem_index, max_mem_length,
//!   fragment_count,
//!   repeat fragment_count: text_length, text, read_position, reference_position
//! ```

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{RawSfsFragment, ReadMap, ReadMemSummary};

/// 短于该长度的片段被解析但丢弃
pub const MIN_FRAGMENT_LEN: usize = 3;

/// 解码结果：每条 read 的片段列表与最长 MEM 摘要，两者按流顺序迭代
#[derive(Debug, Clone, Default)]
pub struct SfsRecords {
    pub fragments: ReadMap<Vec<RawSfsFragment>>,
    pub summaries: ReadMap<ReadMemSummary>,
}

impl SfsRecords {
    pub fn fragment_count(&self) -> usize {
        self.fragments.values().map(Vec::len).sum()
    }
}

/// 带边界检查的游标
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: u64, field: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() as u64 {
            return Err(Error::Decode {
                field,
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let n = n as usize;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u64(&mut self, field: &'static str) -> Result<u64> {
        let b = self.take(8, field)?;
        let mut le = [0u8; 8];
        le.copy_from_slice(b);
        Ok(u64::from_le_bytes(le))
    }

    fn ascii(&mut self, len: u64, field: &'static str) -> Result<&'a [u8]> {
        let offset = self.pos;
        let b = self.take(len, field)?;
        if !b.is_ascii() {
            return Err(Error::Encoding { field, offset });
        }
        Ok(b)
    }
}

enum State {
    ReadHeader,
    FragmentLoop {
        name: String,
        summary: ReadMemSummary,
        left: u64,
        kept: Vec<RawSfsFragment>,
    },
    Sentinel,
}

/// 解码整个 SFS 字节流。缺少零长度哨兵（流中途结束）即为 `Decode` 错误。
pub fn decode(bytes: &[u8]) -> Result<SfsRecords> {
    let mut cur = Cursor::new(bytes);
    let mut out = SfsRecords::default();
    let mut dropped = 0usize;
    let mut state = State::ReadHeader;

    loop {
        state = match state {
            State::ReadHeader => {
                let name_len = cur.u64("name_length")?;
                if name_len == 0 {
                    State::Sentinel
                } else {
                    let name = cur.ascii(name_len, "name")?;
                    // ASCII 已校验，必为合法 UTF-8
                    let name = String::from_utf8_lossy(name).into_owned();
                    let summary = ReadMemSummary {
                        position: cur.u64("max_mem_position")?,
                        index: cur.u64("max_mem_index")?,
                        length: cur.u64("max_mem_length")?,
                    };
                    let left = cur.u64("fragment_count")?;
                    State::FragmentLoop { name, summary, left, kept: Vec::new() }
                }
            }
            State::FragmentLoop { name, summary, left: 0, kept } => {
                out.summaries.insert(name.clone(), summary);
                out.fragments.insert(name, kept);
                State::ReadHeader
            }
            State::FragmentLoop { name, summary, left, mut kept } => {
                let text_len = cur.u64("text_length")?;
                let text = cur.ascii(text_len, "text")?;
                let read_position = cur.u64("read_position")?;
                let reference_position = cur.u64("reference_position")?;
                if text.len() >= MIN_FRAGMENT_LEN {
                    kept.push(RawSfsFragment {
                        text: text.to_vec(),
                        read_position,
                        reference_position,
                    });
                } else {
                    dropped += 1;
                }
                State::FragmentLoop { name, summary, left: left - 1, kept }
            }
            State::Sentinel => break,
        };
    }

    if cur.remaining() > 0 {
        debug!("ignoring {} trailing bytes after SFS sentinel", cur.remaining());
    }
    debug!(
        "decoded {} reads, {} fragments kept, {} short fragments dropped",
        out.fragments.len(),
        out.fragment_count(),
        dropped
    );
    Ok(out)
}

/// 读取整个文件并解码
pub fn decode_file(path: &Path) -> Result<SfsRecords> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    decode(&bytes)
}

/// 待编码的一条 read（编码时不做长度过滤）
#[derive(Debug, Clone)]
pub struct SfsRead {
    pub name: String,
    pub summary: ReadMemSummary,
    pub fragments: Vec<RawSfsFragment>,
}

fn put_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// 按同一格式编码，末尾写入零长度哨兵
pub fn encode(reads: &[SfsRead]) -> Vec<u8> {
    let mut buf = Vec::new();
    for r in reads {
        put_u64(&mut buf, r.name.len() as u64);
        buf.extend_from_slice(r.name.as_bytes());
        put_u64(&mut buf, r.summary.position);
        put_u64(&mut buf, r.summary.index);
        put_u64(&mut buf, r.summary.length);
        put_u64(&mut buf, r.fragments.len() as u64);
        for f in &r.fragments {
            put_u64(&mut buf, f.text.len() as u64);
            buf.extend_from_slice(&f.text);
            put_u64(&mut buf, f.read_position);
            put_u64(&mut buf, f.reference_position);
        }
    }
    put_u64(&mut buf, 0);
    buf
}

pub fn write_sfs<W: Write>(w: &mut W, reads: &[SfsRead]) -> std::io::Result<()> {
    w.write_all(&encode(reads))
}
