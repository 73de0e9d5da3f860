//! Oracle backed by an external verification program
//!
//! The candidate is written to the program's stdin followed by a newline,
//! as `echo "<candidate>" | cryptsetup luksOpen --test-passphrase <header>`
//! would. The exit status decides the verdict.

use super::{InconclusiveReason, Oracle, Verdict};
use crate::error::SearchError;
use log::debug;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit status reported when the passphrase opens a key slot
pub const STATUS_MATCH: i32 = 0;
/// Exit status reported for a wrong passphrase
pub const STATUS_NO_MATCH: i32 = 2;

/// Runs one external process per candidate
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandOracle {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `cryptsetup luksOpen --test-passphrase <header>`
    pub fn cryptsetup(header: &Path) -> Self {
        Self::new("cryptsetup")
            .arg("luksOpen")
            .arg("--test-passphrase")
            .arg(header)
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, candidate: &str) -> std::io::Result<std::process::ExitStatus> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // The verifier may exit before reading its input; its status still counts
            if let Err(e) = writeln!(stdin, "{}", candidate) {
                debug!("writing candidate to {:?} failed: {}", self.program, e);
            }
        }

        child.wait()
    }
}

/// Map a verifier exit status to a verdict
pub fn verdict_from_status(code: Option<i32>) -> Verdict {
    match code {
        Some(STATUS_MATCH) => Verdict::Match,
        Some(STATUS_NO_MATCH) => Verdict::NoMatch,
        Some(other) => Verdict::Inconclusive(InconclusiveReason::ExitStatus(other)),
        None => Verdict::Inconclusive(InconclusiveReason::Signalled),
    }
}

impl Oracle for CommandOracle {
    fn verify(&self, candidate: &str) -> Verdict {
        match self.run(candidate) {
            Ok(status) => verdict_from_status(status.code()),
            Err(e) => Verdict::Inconclusive(InconclusiveReason::SpawnFailed(e.to_string())),
        }
    }

    fn describe(&self, candidate: &str) -> String {
        let mut command = format!("echo \"{}\" | {}", candidate, self.program.to_string_lossy());
        for arg in &self.args {
            command.push(' ');
            command.push_str(&arg.to_string_lossy());
        }
        command
    }
}

/// Check that the target the oracle verifies against is a readable file
pub fn check_target(path: &Path) -> Result<(), SearchError> {
    let unavailable = |source| SearchError::TargetUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let metadata = file.metadata().map_err(unavailable)?;
    if !metadata.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(())
}
