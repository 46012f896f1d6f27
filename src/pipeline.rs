//! 从输入文件到序列/颜色文件的完整流程，以及带外部工具调用的端到端运行。

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::external::{render_template, run_command, AlignerOutputs};
use crate::extract::extract_records;
use crate::graph::{assemble, AssembleOpt, Assembly, AssemblyInput};
use crate::io::{colors, fasta, ms, sfs};
use crate::report::RunReport;
use crate::util::fs::{move_dir_content, remove_dir, remove_file};

/// 已有比对输出时的组装参数
#[derive(Debug, Clone)]
pub struct BuildOpt {
    pub reference: PathBuf,
    pub query: PathBuf,
    pub lengths: PathBuf,
    pub pointers: PathBuf,
    pub sfs: PathBuf,
    /// 输出前缀：写出 `<output>.fa` 与 `<output>.colors`
    pub output: PathBuf,
    pub assemble: AssembleOpt,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub sequences: PathBuf,
    pub colors: PathBuf,
    pub report: RunReport,
}

/// 参考 FASTA 只取第一条记录
fn load_reference(path: &Path) -> Result<Vec<u8>> {
    let mut records = fasta::read_fasta_file(path)?;
    if records.is_empty() {
        return Err(Error::EmptyReference(path.to_path_buf()));
    }
    if records.len() > 1 {
        warn!(
            "reference '{}' has {} records; using the first ('{}')",
            path.display(),
            records.len(),
            records[0].id
        );
    }
    Ok(records.swap_remove(0).seq)
}

fn make_report(opt: &BuildOpt, sfs: &sfs::SfsRecords, mem_reads: usize, asm: &Assembly) -> RunReport {
    RunReport {
        reference: opt.reference.display().to_string(),
        query: opt.query.display().to_string(),
        query_reads: asm.stats.query_records,
        mem_reads,
        mem_records: asm.stats.mem_records,
        sfs_reads: sfs.fragments.len(),
        raw_fragments: sfs.fragment_count(),
        super_sfs_records: asm.stats.sfs_records,
        clamped_mems: asm.stats.clamped_mems,
        total_records: asm.records.len(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

pub fn build(opt: &BuildOpt) -> Result<BuildOutcome> {
    let reference = load_reference(&opt.reference)?;
    let queries = fasta::read_fasta_file(&opt.query)?;
    info!("reference: {} ({} bp), queries: {}", opt.reference.display(), reference.len(), queries.len());

    let records = sfs::decode_file(&opt.sfs)?;
    info!("SFS: {} reads, {} fragments", records.fragments.len(), records.fragment_count());

    let lengths = ms::read_ms_file(&opt.lengths)?;
    let pointers = ms::read_ms_file(&opt.pointers)?;
    let mems = extract_records(&lengths, &pointers)?;
    info!("MEMs: {} reads", mems.len());

    let input = AssemblyInput { reference: &reference, queries: &queries, sfs: &records, mems: &mems };
    let asm = assemble(&input, &opt.assemble)?;

    let (sequences, color_path) = colors::write_outputs(&opt.output, &asm.records)?;
    info!(
        "wrote {} records to {} and {}",
        asm.records.len(),
        sequences.display(),
        color_path.display()
    );

    let report = make_report(opt, &records, mems.len(), &asm);
    Ok(BuildOutcome { sequences, colors: color_path, report })
}

/// 外部工具的命令模板与超时
#[derive(Debug, Clone)]
pub struct ToolsOpt {
    /// 占位符：`{reference}` `{query}` `{outdir}` `{prefix}`
    pub aligner_cmd: String,
    /// 占位符：`{sequences}` `{colors}` `{output}`
    pub graph_cmd: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineOpt {
    pub reference: PathBuf,
    pub query: PathBuf,
    pub workdir: PathBuf,
    pub output_dir: PathBuf,
    pub tools: ToolsOpt,
    pub keep_temp: bool,
    pub assemble: AssembleOpt,
}

const SCRATCH_DIR: &str = "sfs-graph.tmp";

/// 比对 → 组装 → 建图；产物从临时目录移动到输出目录
pub fn run(opt: &PipelineOpt) -> Result<BuildOutcome> {
    let scratch = opt.workdir.join(SCRATCH_DIR);
    std::fs::create_dir_all(&scratch).map_err(|e| Error::io(&scratch, e))?;
    let outputs = AlignerOutputs::new(&scratch, &opt.query, &opt.reference);

    let aligner = render_template(
        &opt.tools.aligner_cmd,
        &[
            ("reference", opt.reference.as_path()),
            ("query", opt.query.as_path()),
            ("outdir", scratch.as_path()),
            ("prefix", outputs.prefix.as_path()),
        ],
    );
    run_command(&aligner, opt.tools.timeout)?;

    let build_opt = BuildOpt {
        reference: opt.reference.clone(),
        query: opt.query.clone(),
        lengths: outputs.lengths.clone(),
        pointers: outputs.pointers.clone(),
        sfs: outputs.sfs.clone(),
        output: outputs.prefix.clone(),
        assemble: opt.assemble,
    };
    let outcome = build(&build_opt)?;

    if let Some(template) = &opt.tools.graph_cmd {
        let graph = render_template(
            template,
            &[
                ("sequences", outcome.sequences.as_path()),
                ("colors", outcome.colors.as_path()),
                ("output", outputs.prefix.as_path()),
            ],
        );
        run_command(&graph, opt.tools.timeout)?;
    }

    if !opt.keep_temp {
        for f in outputs.files() {
            if f.exists() {
                remove_file(f)?;
            }
        }
    }

    let moved = move_dir_content(&scratch, &opt.output_dir)?;
    remove_dir(&scratch)?;
    info!("moved {} files to {}", moved, opt.output_dir.display());

    let relocate = |p: &Path| match p.file_name() {
        Some(name) => opt.output_dir.join(name),
        None => p.to_path_buf(),
    };
    Ok(BuildOutcome {
        sequences: relocate(&outcome.sequences),
        colors: relocate(&outcome.colors),
        report: outcome.report,
    })
}
