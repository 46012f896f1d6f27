use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sfs_graph::extract::{extract_records, merge_sorted};
use sfs_graph::graph::AssembleOpt;
use sfs_graph::io::{ms, sfs};
use sfs_graph::pipeline::{self, BuildOpt, PipelineOpt, ToolsOpt};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "sfs-graph",
    author,
    version,
    about = "Build colored sequence records from SFS and matching-statistics MEMs",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Reference FASTA (first record is used)
    #[arg(short, long)]
    reference: PathBuf,
    /// Query reads FASTA
    #[arg(short = 'Q', long)]
    query: PathBuf,
    /// Worker threads for per-read derivation (1 = sequential, 0 = all cores)
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
    /// Write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble sequence/color files from existing aligner outputs
    Build {
        #[command(flatten)]
        common: CommonArgs,
        /// Matching statistics lengths file
        #[arg(long)]
        lengths: PathBuf,
        /// Matching statistics pointers file
        #[arg(long)]
        pointers: PathBuf,
        /// Binary SFS file
        #[arg(long)]
        sfs: PathBuf,
        /// Output prefix (<prefix>.fa and <prefix>.colors)
        #[arg(short, long, default_value = "colored")]
        output: PathBuf,
    },
    /// Run the aligner, assemble, then run the graph builder
    Run {
        #[command(flatten)]
        common: CommonArgs,
        /// Working directory for intermediate files
        #[arg(short, long, default_value = ".")]
        workdir: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
        /// Aligner command template ({reference} {query} {outdir} {prefix})
        #[arg(long = "aligner-cmd")]
        aligner_cmd: String,
        /// Graph builder command template ({sequences} {colors} {output})
        #[arg(long = "graph-cmd")]
        graph_cmd: Option<String>,
        /// Timeout per external command, in seconds
        #[arg(long, default_value_t = 3600)]
        timeout: u64,
        /// Keep aligner intermediate files
        #[arg(long = "keep-temp")]
        keep_temp: bool,
    },
    /// Summarize a binary SFS file per read
    Inspect {
        /// Binary SFS file
        sfs: PathBuf,
    },
    /// Print MEMs derived from lengths/pointers files as TSV
    Mems {
        #[arg(long)]
        lengths: PathBuf,
        #[arg(long)]
        pointers: PathBuf,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("sfs_graph=debug,info")
        } else if quiet {
            EnvFilter::new("sfs_graph=warn")
        } else {
            EnvFilter::new("sfs_graph=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build { common, lengths, pointers, sfs, output } => {
            let opt = BuildOpt {
                reference: common.reference,
                query: common.query,
                lengths,
                pointers,
                sfs,
                output,
                assemble: AssembleOpt { threads: common.threads },
            };
            let outcome = pipeline::build(&opt).context("build failed")?;
            write_report(common.report, &outcome.report)
        }
        Commands::Run { common, workdir, output, aligner_cmd, graph_cmd, timeout, keep_temp } => {
            let opt = PipelineOpt {
                reference: common.reference,
                query: common.query,
                workdir,
                output_dir: output,
                tools: ToolsOpt { aligner_cmd, graph_cmd, timeout: Duration::from_secs(timeout) },
                keep_temp,
                assemble: AssembleOpt { threads: common.threads },
            };
            let outcome = pipeline::run(&opt).context("pipeline failed")?;
            println!("sequences: {}", outcome.sequences.display());
            println!("colors: {}", outcome.colors.display());
            write_report(common.report, &outcome.report)
        }
        Commands::Inspect { sfs } => run_inspect(&sfs),
        Commands::Mems { lengths, pointers } => run_mems(&lengths, &pointers),
    }
}

fn write_report(path: Option<PathBuf>, report: &sfs_graph::report::RunReport) -> Result<()> {
    if let Some(p) = path {
        report
            .write_json(&p)
            .with_context(|| format!("cannot write report '{}'", p.display()))?;
    }
    Ok(())
}

fn run_inspect(path: &std::path::Path) -> Result<()> {
    let records = sfs::decode_file(path).with_context(|| format!("cannot decode '{}'", path.display()))?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    writeln!(out, "read\tmax_mem_pos\tmax_mem_idx\tmax_mem_len\tfragments\tsuper_sfs")?;
    for (name, frags) in records.fragments.iter() {
        let s = records.summaries.get(name).copied().unwrap_or_default();
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            name,
            s.position,
            s.index,
            s.length,
            frags.len(),
            merge_sorted(frags).len()
        )?;
    }
    out.flush()?;
    Ok(())
}

fn run_mems(lengths: &std::path::Path, pointers: &std::path::Path) -> Result<()> {
    let l = ms::read_ms_file(lengths)?;
    let p = ms::read_ms_file(pointers)?;
    let mems = extract_records(&l, &p)?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    for (name, list) in mems.iter() {
        for m in list {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                name, m.reference_start, m.reference_end, m.length, m.array_index
            )?;
        }
    }
    out.flush()?;
    Ok(())
}
