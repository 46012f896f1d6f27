//! 外部工具（比对器、建图工具）的调用与超时控制。

pub mod process;
pub mod tools;

pub use process::run_command;
pub use tools::{render_template, AlignerOutputs};
