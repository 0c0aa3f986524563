//! Running Daikon over the generated files.

use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;

/// Environment variable naming the Daikon jar.
pub const DAIKON_JAR_ENV: &str = "DAIKON_JAR";
/// Environment variable naming the Daikon installation directory.
pub const DAIKON_DIR_ENV: &str = "DAIKONDIR";
/// Daikon's entry point class.
pub const DAIKON_MAIN_CLASS: &str = "daikon.Daikon";

/// Locates `daikon.jar`: the explicit path, then `$DAIKON_JAR`, then
/// `$DAIKONDIR/daikon.jar`.
///
/// `env` looks up an environment variable.
pub fn resolve_jar(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(jar) = env(DAIKON_JAR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(jar));
    }
    if let Some(dir) = env(DAIKON_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join("daikon.jar"));
    }
    bail!("no Daikon jar: pass --daikon-jar or set {DAIKON_JAR_ENV} or {DAIKON_DIR_ENV}")
}

/// One Daikon run over a declarations file and a trace file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaikonInvocation {
    pub java: PathBuf,
    pub jar: PathBuf,
    pub decls: PathBuf,
    pub dtrace: PathBuf,
}

impl DaikonInvocation {
    pub fn new(jar: impl Into<PathBuf>, decls: impl Into<PathBuf>, dtrace: impl Into<PathBuf>) -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: jar.into(),
            decls: decls.into(),
            dtrace: dtrace.into(),
        }
    }

    #[must_use]
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    /// Arguments passed to the JVM.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-cp".into(),
            self.jar.clone().into(),
            DAIKON_MAIN_CLASS.into(),
            "--nohierarchy".into(),
            self.decls.clone().into(),
            self.dtrace.clone().into(),
        ]
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.java);
        command.args(self.args());
        command
    }

    /// Runs Daikon, handing each line of its standard output to `on_line`.
    ///
    /// Standard error is inherited. A non-zero exit status is an error.
    pub fn run(&self, mut on_line: impl FnMut(&str)) -> Result<()> {
        let start = Instant::now();
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("launch {}", self.java.display()))?;

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line.context("read Daikon output")?;
                on_line(&line);
            }
        }

        let status = child.wait().context("wait for Daikon")?;
        if !status.success() {
            bail!("Daikon exited with {status}");
        }
        info!(
            decls = %self.decls.display(),
            dtrace = %self.dtrace.display(),
            duration_ms = start.elapsed().as_millis(),
            "daikon complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn args_follow_daikon_usage() {
        let invocation = DaikonInvocation::new("/opt/daikon.jar", "out/a.decls", "out/a.dtrace");
        let args: Vec<String> = invocation
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-cp",
                "/opt/daikon.jar",
                "daikon.Daikon",
                "--nohierarchy",
                "out/a.decls",
                "out/a.dtrace"
            ]
        );
        assert_eq!(invocation.command().get_program(), "java");
    }

    #[test]
    fn jar_resolution_order() {
        let explicit = resolve_jar(Some(Path::new("x.jar")), |_| Some("env.jar".into())).unwrap();
        assert_eq!(explicit, PathBuf::from("x.jar"));

        let from_jar = resolve_jar(None, |key| {
            (key == DAIKON_JAR_ENV).then(|| OsString::from("env.jar"))
        })
        .unwrap();
        assert_eq!(from_jar, PathBuf::from("env.jar"));

        let from_dir = resolve_jar(None, |key| {
            (key == DAIKON_DIR_ENV).then(|| OsString::from("/opt/daikon"))
        })
        .unwrap();
        assert_eq!(from_dir, PathBuf::from("/opt/daikon/daikon.jar"));

        assert!(resolve_jar(None, no_env).is_err());
    }

    #[test]
    fn missing_java_is_an_error() {
        let invocation = DaikonInvocation::new("d.jar", "a.decls", "a.dtrace")
            .with_java("/nonexistent/bin/java-for-invar-tests");
        let err = invocation.run(|_| {}).unwrap_err();
        assert!(err.to_string().contains("launch"));
    }
}
