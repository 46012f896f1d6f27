//! 由比对副产物导出 MEM 与 super-SFS。

pub mod mems;
pub mod merge;

pub use mems::{extract, extract_records, mems_from_arrays};
pub use merge::{merge, merge_sorted};
