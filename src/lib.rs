//! # sfs-graph
//!
//! 将比对副产物转换为着色 de Bruijn 图的输入：
//!
//! - **SFS 解码**：解析按 read 分组的 sample-specific substring 二进制流
//! - **MEM 导出**：由 matching statistics 的 lengths/pointers 数组导出最大精确匹配
//! - **SFS 合并**：将重叠片段拼接为 super-SFS
//! - **着色组装**：按固定顺序输出 query read、MEM 与 super-SFS 及其颜色
//!
//! ## 快速示例
//!
//! ```rust
//! use sfs_graph::extract::{mems_from_arrays, merge};
//! use sfs_graph::model::RawSfsFragment;
//!
//! let mems = mems_from_arrays(&[5, 5, 3, 7, 2], &[0, 0, 10, 10, 20]);
//! assert_eq!(mems.len(), 2);
//!
//! let frags = vec![
//!     RawSfsFragment { text: b"ABCDE".to_vec(), read_position: 0, reference_position: 0 },
//!     RawSfsFragment { text: b"CDEFG".to_vec(), read_position: 2, reference_position: 0 },
//!     RawSfsFragment { text: b"XYZ".to_vec(), read_position: 10, reference_position: 0 },
//! ];
//! let merged = merge(&frags);
//! assert_eq!(merged[0].text, b"ABCDEFG");
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — SFS 二进制流、lengths/pointers 文本、FASTA、颜色文件
//! - [`extract`] — MEM 导出与 SFS 合并
//! - [`graph`] — 着色序列组装
//! - [`external`] — 外部工具调用（超时与进程组终止）
//! - [`pipeline`] — 文件级流程
//! - [`util`] — 文件系统工具函数

pub mod error;
pub mod external;
pub mod extract;
pub mod graph;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod util;

pub use error::{Error, Result};
