use std::path::Path;

use sfs_graph::graph::AssembleOpt;
use sfs_graph::io::sfs::{encode, SfsRead};
use sfs_graph::model::{RawSfsFragment, ReadMemSummary};
use sfs_graph::pipeline::{build, BuildOpt};
use tempfile::TempDir;

const REFERENCE: &str = ">chr1 test\nACGTACGTTTGACCAGGT\n>chr2\nGGGG\n";
const QUERY: &str = ">q1\nACGTAGG\n>q2\nTTGACCA\n";
const LENGTHS: &str = ">q1\n4 4 2 3 1 1 0\n>q2\n7 6 5 4 3 2 1\n";
const POINTERS: &str = ">q1\n0 1 6 8 9 9 0\n>q2\n8 9 10 11 12 13 14\n";

fn frag(text: &str, rp: u64) -> RawSfsFragment {
    RawSfsFragment { text: text.as_bytes().to_vec(), read_position: rp, reference_position: 0 }
}

fn sfs_bytes() -> Vec<u8> {
    encode(&[
        SfsRead {
            name: "q1".to_string(),
            summary: ReadMemSummary { position: 0, index: 0, length: 4 },
            fragments: vec![frag("ACGTA", 0), frag("GT", 2), frag("GTAGG", 2), frag("AGG", 4)],
        },
        SfsRead {
            name: "q2".to_string(),
            summary: ReadMemSummary { position: 0, index: 0, length: 7 },
            fragments: vec![],
        },
    ])
}

fn write_inputs(dir: &Path) -> BuildOpt {
    std::fs::write(dir.join("ref.fa"), REFERENCE).unwrap();
    std::fs::write(dir.join("reads.fa"), QUERY).unwrap();
    std::fs::write(dir.join("reads_ref.lengths"), LENGTHS).unwrap();
    std::fs::write(dir.join("reads_ref.pointers"), POINTERS).unwrap();
    std::fs::write(dir.join("reads_ref_0.ss.tmp.out"), sfs_bytes()).unwrap();
    BuildOpt {
        reference: dir.join("ref.fa"),
        query: dir.join("reads.fa"),
        lengths: dir.join("reads_ref.lengths"),
        pointers: dir.join("reads_ref.pointers"),
        sfs: dir.join("reads_ref_0.ss.tmp.out"),
        output: dir.join("out/colored"),
        assemble: AssembleOpt { threads: 1 },
    }
}

#[test]
fn build_writes_parallel_sequence_and_color_files() {
    let tmp = TempDir::new().unwrap();
    let mut opt = write_inputs(tmp.path());
    std::fs::create_dir_all(tmp.path().join("out")).unwrap();
    opt.output = tmp.path().join("out/colored");

    let outcome = build(&opt).unwrap();
    let fa = std::fs::read_to_string(&outcome.sequences).unwrap();
    let colors = std::fs::read_to_string(&outcome.colors).unwrap();

    // q1: 首个 MEM 以及 lengths[2]=2 < lengths[3]=3 处的上升点；q2 只有首个 MEM
    // q1 的 SFS: GT 被丢弃；ACGTA + GTAGG 拼接为 ACGTAGG，AGG 为最后一个片段单独输出
    let expected_fa = "\
>q1
ACGTAGG
>q2
TTGACCA
>MEM From:\tq1
ACGT
>MEM From:\tq1
TTG
>MEM From:\tq2
TTGACCA
>SSS From:\tq1
ACGTAGG
>SSS From:\tq1
AGG
";
    assert_eq!(fa, expected_fa);
    assert_eq!(colors, "2\n3\n0\n0\n0\n1\n1\n");
    assert_eq!(fa.lines().filter(|l| l.starts_with('>')).count(), colors.lines().count());

    assert_eq!(outcome.report.query_reads, 2);
    assert_eq!(outcome.report.mem_records, 3);
    assert_eq!(outcome.report.raw_fragments, 3);
    assert_eq!(outcome.report.super_sfs_records, 2);
    assert_eq!(outcome.report.total_records, 7);
}

#[test]
fn repeated_builds_are_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let mut opt = write_inputs(tmp.path());

    opt.output = tmp.path().join("first");
    let a = build(&opt).unwrap();
    opt.output = tmp.path().join("second");
    opt.assemble = AssembleOpt { threads: 3 };
    let b = build(&opt).unwrap();

    assert_eq!(std::fs::read(&a.sequences).unwrap(), std::fs::read(&b.sequences).unwrap());
    assert_eq!(std::fs::read(&a.colors).unwrap(), std::fs::read(&b.colors).unwrap());
}

#[test]
fn truncated_sfs_file_fails_the_build() {
    let tmp = TempDir::new().unwrap();
    let mut opt = write_inputs(tmp.path());
    let mut bytes = sfs_bytes();
    bytes.truncate(bytes.len() - 8);
    std::fs::write(&opt.sfs, bytes).unwrap();
    opt.output = tmp.path().join("x");

    let err = build(&opt).unwrap_err();
    assert!(matches!(err, sfs_graph::Error::Decode { .. }), "{:?}", err);
    assert!(!tmp.path().join("x.fa").exists());
}

#[test]
fn missing_input_names_the_file() {
    let tmp = TempDir::new().unwrap();
    let mut opt = write_inputs(tmp.path());
    opt.pointers = tmp.path().join("absent.pointers");
    let err = build(&opt).unwrap_err();
    assert!(err.to_string().contains("absent.pointers"), "{}", err);
}

#[cfg(unix)]
#[test]
fn run_invokes_aligner_and_moves_outputs() {
    use sfs_graph::pipeline::{run, PipelineOpt, ToolsOpt};
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    let tmp = TempDir::new().unwrap();
    let inputs = tmp.path().join("inputs");
    std::fs::create_dir_all(&inputs).unwrap();
    let fixture = write_inputs(&inputs);

    // 模拟比对器：把预先生成的输出复制到 {prefix} 对应位置
    let script = tmp.path().join("fake-aligner.sh");
    let body = format!(
        "#!/bin/sh\ncp {l} \"$1.lengths\"\ncp {p} \"$1.pointers\"\ncp {s} \"$1_0.ss.tmp.out\"\n",
        l = fixture.lengths.display(),
        p = fixture.pointers.display(),
        s = fixture.sfs.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let opt = PipelineOpt {
        reference: fixture.reference.clone(),
        query: fixture.query.clone(),
        workdir: tmp.path().join("work"),
        output_dir: tmp.path().join("final"),
        tools: ToolsOpt {
            aligner_cmd: format!("{} {{prefix}}", script.display()),
            graph_cmd: Some("true {sequences} {colors} {output}".to_string()),
            timeout: Duration::from_secs(30),
        },
        keep_temp: false,
        assemble: AssembleOpt { threads: 1 },
    };

    let outcome = run(&opt).unwrap();
    assert_eq!(outcome.sequences, tmp.path().join("final/reads_ref.fa"));
    assert_eq!(outcome.colors, tmp.path().join("final/reads_ref.colors"));
    assert!(outcome.sequences.exists());
    assert!(outcome.colors.exists());
    assert!(!tmp.path().join("final/reads_ref.lengths").exists());
    assert!(!tmp.path().join("work/sfs-graph.tmp").exists());
}

#[cfg(unix)]
#[test]
fn run_reports_aligner_timeout() {
    use sfs_graph::pipeline::{run, PipelineOpt, ToolsOpt};
    use std::time::Duration;

    let tmp = TempDir::new().unwrap();
    let fixture = write_inputs(tmp.path());
    let opt = PipelineOpt {
        reference: fixture.reference,
        query: fixture.query,
        workdir: tmp.path().join("work"),
        output_dir: tmp.path().join("final"),
        tools: ToolsOpt {
            aligner_cmd: "sleep 30".to_string(),
            graph_cmd: None,
            timeout: Duration::from_millis(200),
        },
        keep_temp: false,
        assemble: AssembleOpt::default(),
    };
    let err = run(&opt).unwrap_err();
    assert!(matches!(err, sfs_graph::Error::ExternalProcess { .. }), "{:?}", err);
}
