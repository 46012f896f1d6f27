//! 着色序列组装：query read、MEM 与 super-SFS 按固定顺序输出。

pub mod assemble;

pub use assemble::{assemble, Assembly, AssemblyInput, AssemblyStats};

/// 组装参数
#[derive(Clone, Copy, Debug)]
pub struct AssembleOpt {
    /// 1 = 顺序执行；0 = rayon 默认线程数
    pub threads: usize,
}

impl Default for AssembleOpt {
    fn default() -> Self {
        Self { threads: 1 }
    }
}
