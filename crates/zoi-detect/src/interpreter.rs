//! Python interpreter discovery
//!
//! An explicit command (from `PYTHON_PATH` or config) is tried first, then each
//! default candidate. A candidate counts only if `<cmd> --version` reports a
//! `Python X.Y.Z` version string.
//!
//! The explicit value is first run verbatim as a program path, so paths with
//! spaces or backslashes work. Only if that fails is it split like a shell
//! command line (`py -3`).

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Commands probed when no explicit interpreter is configured
pub const DEFAULT_CANDIDATES: &[&str] = &["py", "python", "python3"];

/// Environment variable naming an explicit interpreter command
pub const PYTHON_PATH_ENV: &str = "PYTHON_PATH";

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A runnable interpreter command, split into program and leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub args: Vec<String>,
    pub version: String,
}

impl Interpreter {
    /// Fresh command for this interpreter with its leading arguments applied
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Human-readable command line
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Find a working interpreter, preferring `explicit` over `candidates`
pub async fn resolve_interpreter(
    explicit: Option<&str>,
    candidates: &[String],
) -> Option<Interpreter> {
    if let Some(cmd) = explicit.filter(|c| !c.trim().is_empty()) {
        let found = match probe_program(cmd.trim().to_string(), Vec::new()).await {
            Some(found) => Some(found),
            None => probe(cmd).await,
        };
        if let Some(found) = found {
            info!("Python version ({}): {}", found.display(), found.version);
            return Some(found);
        }
        warn!("Configured interpreter {:?} did not report a Python version, probing defaults", cmd);
    }

    for candidate in candidates {
        if let Some(found) = probe(candidate).await {
            info!("Python version ({}): {}", found.display(), found.version);
            return Some(found);
        }
        debug!("Interpreter candidate {:?} not usable", candidate);
    }

    warn!("Could not determine Python version");
    None
}

/// Split `command` like a shell would and probe the result
pub async fn probe(command: &str) -> Option<Interpreter> {
    let mut parts = shell_words::split(command).ok()?;
    if parts.is_empty() {
        return None;
    }
    let program = parts.remove(0);
    probe_program(program, parts).await
}

/// Run `<program> <args> --version` and parse the reported version
pub async fn probe_program(program: String, args: Vec<String>) -> Option<Interpreter> {
    if program.is_empty() {
        return None;
    }

    let mut cmd = Command::new(&program);
    cmd.args(&args)
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = timeout(PROBE_TIMEOUT, cmd.output()).await.ok()?.ok()?;

    // Older Python builds print the version on stderr
    let stdout = String::from_utf8_lossy(&output.stdout);
    let text = if stdout.trim().is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        stdout.into_owned()
    };

    let version = parse_python_version(&text)?;
    Some(Interpreter {
        program,
        args,
        version,
    })
}

/// Extract `X.Y.Z` from text containing `Python X.Y.Z`
pub fn parse_python_version(text: &str) -> Option<String> {
    let marker = "Python ";
    let start = text.find(marker)? + marker.len();
    let version: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let parts: Vec<&str> = version.split('.').take(3).collect();
    if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
        Some(parts.join("."))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_python_version() {
        assert_eq!(parse_python_version("Python 3.11.4\n"), Some("3.11.4".to_string()));
        assert_eq!(parse_python_version("Python 3.13.0rc1"), Some("3.13.0".to_string()));
        assert_eq!(parse_python_version("Python 3.12"), None);
        assert_eq!(parse_python_version("GNU bash, version 5.2.15"), None);
        assert_eq!(parse_python_version(""), None);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_an_interpreter() {
        assert!(probe("zoi-no-such-python-binary").await.is_none());
        assert!(probe("").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_with_nothing_usable() {
        let candidates = vec!["zoi-no-such-python-binary".to_string()];
        assert!(resolve_interpreter(Some("zoi-also-missing"), &candidates)
            .await
            .is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_explicit_path_with_space_is_used_verbatim() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let venv = dir.path().join("my venv");
        std::fs::create_dir(&venv).unwrap();
        let python = venv.join("python");
        std::fs::write(&python, "#!/bin/sh\necho 'Python 3.11.4'\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path = python.to_str().unwrap();
        assert!(probe(path).await.is_none());

        let candidates = vec!["zoi-no-such-python-binary".to_string()];
        let found = resolve_interpreter(Some(path), &candidates).await.unwrap();
        assert_eq!(found.program, path);
        assert!(found.args.is_empty());
        assert_eq!(found.version, "3.11.4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_explicit_command_line_is_split() {
        let candidates = vec!["zoi-no-such-python-binary".to_string()];
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fake_python.sh");
        std::fs::write(&script, "echo 'Python 3.12.1'\n").unwrap();

        let command = format!("sh {}", script.display());
        let found = resolve_interpreter(Some(&command), &candidates).await.unwrap();
        assert_eq!(found.program, "sh");
        assert_eq!(found.args, vec![script.display().to_string()]);
        assert_eq!(found.version, "3.12.1");
    }

    #[test]
    fn test_display_joins_arguments() {
        let interpreter = Interpreter {
            program: "py".to_string(),
            args: vec!["-3".to_string()],
            version: "3.11.4".to_string(),
        };
        assert_eq!(interpreter.display(), "py -3");
    }
}
