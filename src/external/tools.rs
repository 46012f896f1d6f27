use std::path::{Path, PathBuf};

/// 比对工具的输出文件，命名约定为 `<pattern>_<reference>` 加固定后缀
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerOutputs {
    pub prefix: PathBuf,
    pub lengths: PathBuf,
    pub pointers: PathBuf,
    pub sfs: PathBuf,
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl AlignerOutputs {
    /// `dir/<pattern>_<reference>.{lengths,pointers}` 与 `dir/<pattern>_<reference>_0.ss.tmp.out`
    pub fn new(dir: &Path, query: &Path, reference: &Path) -> Self {
        let base = format!("{}_{}", stem(query), stem(reference));
        Self {
            prefix: dir.join(&base),
            lengths: dir.join(format!("{}.lengths", base)),
            pointers: dir.join(format!("{}.pointers", base)),
            sfs: dir.join(format!("{}_0.ss.tmp.out", base)),
        }
    }

    pub fn files(&self) -> [&Path; 3] {
        [&self.lengths, &self.pointers, &self.sfs]
    }
}

/// 将命令模板中每个空白分隔的 token 里的 `{key}` 替换为对应值
pub fn render_template(template: &str, vars: &[(&str, &Path)]) -> String {
    template
        .split_whitespace()
        .map(|tok| {
            vars.iter().fold(tok.to_string(), |acc, (key, val)| {
                acc.replace(&format!("{{{}}}", key), &val.to_string_lossy())
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_naming_convention() {
        let out = AlignerOutputs::new(Path::new("/tmp/work"), Path::new("data/reads.fa"), Path::new("ref/chr20.fasta"));
        assert_eq!(out.lengths, PathBuf::from("/tmp/work/reads_chr20.lengths"));
        assert_eq!(out.pointers, PathBuf::from("/tmp/work/reads_chr20.pointers"));
        assert_eq!(out.sfs, PathBuf::from("/tmp/work/reads_chr20_0.ss.tmp.out"));
        assert_eq!(out.prefix, PathBuf::from("/tmp/work/reads_chr20"));
    }

    #[test]
    fn template_substitution() {
        let cmd = render_template(
            "aligner ms  -i {reference} -p {query} -o {prefix}.out",
            &[
                ("reference", Path::new("r.fa")),
                ("query", Path::new("q.fa")),
                ("prefix", Path::new("/w/q_r")),
            ],
        );
        assert_eq!(cmd, "aligner ms -i r.fa -p q.fa -o /w/q_r.out");
    }

    #[test]
    fn unknown_placeholder_is_left_alone() {
        let cmd = render_template("tool {nope}", &[("reference", Path::new("r.fa"))]);
        assert_eq!(cmd, "tool {nope}");
    }
}
