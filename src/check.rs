//! Run programs and compare what they print against known-good output.
//!
//! A program's output is kept even when it fails part way through, so the
//! caller can still look at (or save) what was printed before the fault.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Error;
use crate::machine::Machine;

/// Failures outside the machine itself: reading sources, writing outputs.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} and {} would both be reported as {name}", first.display(), second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Outcome of checking one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Ran to completion and printed exactly the expected bytes.
    Valid,
    /// Ran to completion but printed something else.
    Invalid,
    /// The machine stopped with an error.
    Failed(Error),
    /// The program never ran; holds why its source could not be read.
    Unreadable(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// True if the machine ran, so there is output (maybe partial) to save.
    pub fn ran(&self) -> bool {
        !matches!(self, Verdict::Unreadable(_))
    }
}

/// A checked program together with everything it printed.
#[derive(Debug, Clone)]
pub struct Checked {
    pub name: String,
    pub output: Vec<u8>,
    pub verdict: Verdict,
}

impl fmt::Display for Checked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            Verdict::Valid => write!(f, "{} valid", self.name),
            Verdict::Invalid => write!(f, "{} invalid", self.name),
            Verdict::Failed(err) => write!(f, "{} failed: {err}", self.name),
            Verdict::Unreadable(reason) => write!(f, "{} failed: {reason}", self.name),
        }
    }
}

/// Run `source` and judge its output against `expected`.
pub fn check_source(machine: &Machine, name: &str, source: &str, expected: &[u8]) -> Checked {
    let mut output = Vec::<u8>::new();
    let verdict = match machine.run(source, &mut output) {
        Ok(_) if output == expected => Verdict::Valid,
        Ok(_) => Verdict::Invalid,
        Err(err) => {
            log::warn!("{name}: {err}");
            Verdict::Failed(err)
        }
    };
    Checked {
        name: name.to_string(),
        output,
        verdict,
    }
}

/// Display name for a program file: its stem, like `hello` for `src/hello.bf`.
pub fn program_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Read and check one program file.
pub fn check_file(machine: &Machine, path: &Path, expected: &[u8]) -> Result<Checked, CheckError> {
    let source = fs::read_to_string(path).map_err(|source| CheckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(check_source(machine, &program_name(path), &source, expected))
}

/// Refuse a batch in which two files share a display name, since their
/// report lines and saved outputs would be indistinguishable.
pub fn ensure_unique_names(paths: &[PathBuf]) -> Result<(), CheckError> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for path in paths {
        let name = program_name(path);
        if let Some(first) = seen.get(&name) {
            return Err(CheckError::DuplicateName {
                name,
                first: first.to_path_buf(),
                second: path.clone(),
            });
        }
        seen.insert(name, path);
    }
    Ok(())
}

/// Check every file in parallel, one independent machine run per file.
///
/// Results come back in the same order as `paths`. A file that cannot be
/// read becomes an `Unreadable` entry instead of stopping the batch.
pub fn check_files(machine: &Machine, paths: &[PathBuf], expected: &[u8]) -> Vec<Checked> {
    paths
        .par_iter()
        .map(|path| match check_file(machine, path, expected) {
            Ok(checked) => checked,
            Err(err) => {
                let reason = match std::error::Error::source(&err) {
                    Some(cause) => format!("{err}: {cause}"),
                    None => err.to_string(),
                };
                log::warn!("{reason}");
                Checked {
                    name: program_name(path),
                    output: Vec::new(),
                    verdict: Verdict::Unreadable(reason),
                }
            }
        })
        .collect()
}

/// Save a program's output (partial or not) as `<dir>/<name>.txt`.
pub fn write_output(dir: &Path, checked: &Checked) -> Result<PathBuf, CheckError> {
    let path = dir.join(format!("{}.txt", checked.name));
    fs::write(&path, &checked.output).map_err(|source| CheckError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Tally of a batch of checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub valid: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_checked<'a>(checked: impl IntoIterator<Item = &'a Checked>) -> Self {
        let mut summary = Summary::default();
        for c in checked {
            summary.total += 1;
            if c.verdict.is_valid() {
                summary.valid += 1;
            }
        }
        summary
    }

    pub fn all_valid(&self) -> bool {
        self.valid == self.total
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} programs are valid", self.valid, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;

    const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bfcheck-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_valid_program() {
        let checked = check_source(&Machine::default(), "hello", HELLO, b"Hello World!\n");
        assert_eq!(checked.verdict, Verdict::Valid);
        assert_eq!(checked.to_string(), "hello valid");
    }

    #[test]
    fn test_invalid_program() {
        let checked = check_source(&Machine::default(), "hello", HELLO, b"Hello World!");
        assert_eq!(checked.verdict, Verdict::Invalid);
        assert_eq!(checked.output, b"Hello World!\n");
        assert_eq!(checked.to_string(), "hello invalid");
    }

    #[test]
    fn test_failed_program_keeps_partial_output() {
        let checked = check_source(&Machine::default(), "bad", "+.+.+]", b"");
        assert_eq!(
            checked.verdict,
            Verdict::Failed(Error::Syntax(SyntaxError { offset: 5, bracket: ']' }))
        );
        assert_eq!(checked.output, vec![1, 2]);
        assert_eq!(
            checked.to_string(),
            "bad failed: syntax error: unmatched ']' at offset 5"
        );
    }

    #[test]
    fn test_program_name_uses_stem() {
        assert_eq!(program_name(Path::new("src/hello.bf")), "hello");
        assert_eq!(program_name(Path::new("noext")), "noext");
    }

    #[test]
    fn test_summary() {
        let machine = Machine::default();
        let checked = vec![
            check_source(&machine, "a", "+.", &[1]),
            check_source(&machine, "b", "+.", &[2]),
            check_source(&machine, "c", "[", &[]),
        ];
        let summary = Summary::from_checked(&checked);
        assert_eq!(summary, Summary { valid: 1, total: 3 });
        assert!(!summary.all_valid());
        assert_eq!(summary.to_string(), "1/3 programs are valid");
    }

    #[test]
    fn test_check_files_preserves_order_and_keeps_going_past_missing() {
        let dir = scratch_dir("files");
        let a = dir.join("a.bf");
        let b = dir.join("b.bf");
        fs::write(&a, "+.").unwrap();
        fs::write(&b, "++.").unwrap();
        let missing = dir.join("missing.bf");

        let results = check_files(&Machine::default(), &[b.clone(), missing, a.clone()], &[1]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].verdict, Verdict::Invalid);
        assert_eq!(results[1].name, "missing");
        assert!(!results[1].verdict.ran());
        assert!(results[1].to_string().starts_with("missing failed: failed to read "));
        assert_eq!(results[2].name, "a");
        assert!(results[2].verdict.is_valid());
        assert_eq!(
            Summary::from_checked(&results),
            Summary { valid: 1, total: 3 }
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_error_names_cause_once() {
        let err = CheckError::Read {
            path: PathBuf::from("nope.bf"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read nope.bf");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let paths = vec![
            PathBuf::from("x/hello.bf"),
            PathBuf::from("other.bf"),
            PathBuf::from("y/hello.bf"),
        ];
        match ensure_unique_names(&paths) {
            Err(CheckError::DuplicateName { name, first, second }) => {
                assert_eq!(name, "hello");
                assert_eq!(first, PathBuf::from("x/hello.bf"));
                assert_eq!(second, PathBuf::from("y/hello.bf"));
            }
            other => panic!("expected duplicate name error, got {other:?}"),
        }
        assert!(ensure_unique_names(&paths[..2]).is_ok());
    }

    #[test]
    fn test_write_output() {
        let dir = scratch_dir("out");
        let checked = check_source(&Machine::default(), "bf", "+.+.]", b"");
        let path = write_output(&dir, &checked).unwrap();
        assert_eq!(path, dir.join("bf.txt"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
