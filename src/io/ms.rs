//! matching statistics 文本数组（`.lengths` / `.pointers`）解析。
//!
//! 每条 read 占两行：名称行（可带前导 `>`）与空白分隔的十进制整数行。

use std::path::Path;

use crate::error::{Error, Result};

/// 单条 read 的一行整数数组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsRecord {
    pub name: String,
    pub values: Vec<usize>,
}

/// 解析成对的 (name, integers) 行。`source_name` 仅用于错误信息。
///
/// 名称行之后的空行是该 read 的空整数行（零个条目），只有最后一对之后多出的空行被忽略。
pub fn parse_ms_text(text: &str, source_name: &str) -> Result<Vec<MsRecord>> {
    let mut lines: Vec<&str> = text.lines().collect();
    drop_trailing_blank_lines(&mut lines);
    if lines.len() % 2 != 0 {
        return Err(Error::ShapeMismatch(format!(
            "{}: {} lines, expected name/values pairs",
            source_name,
            lines.len()
        )));
    }

    let mut out = Vec::with_capacity(lines.len() / 2);
    for (k, pair) in lines.chunks(2).enumerate() {
        let header = pair[0].trim();
        let name = header.strip_prefix('>').unwrap_or(header).to_string();
        let line_no = 2 * k + 2;
        let values = pair[1]
            .split_whitespace()
            .map(|tok| {
                tok.parse::<usize>().map_err(|_| Error::InvalidInteger {
                    source_name: source_name.to_string(),
                    line: line_no,
                    token: tok.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        out.push(MsRecord { name, values });
    }
    Ok(out)
}

fn drop_trailing_blank_lines(lines: &mut Vec<&str>) {
    let blank = |l: &str| l.trim().is_empty();
    while lines.last().is_some_and(|l| blank(*l)) {
        if lines.len() % 2 == 1 {
            // 落在名称槽位
            lines.pop();
        } else if blank(lines[lines.len() - 2]) {
            lines.truncate(lines.len() - 2);
        } else {
            // 前一行是名称，这一行是它的空整数行
            break;
        }
    }
}

pub fn read_ms_file(path: &Path) -> Result<Vec<MsRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_ms_text(&text, &path.display().to_string())
}
