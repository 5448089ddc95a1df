use crate::audit::report::{write_banner, AuditReport, CapturedOutput};
use crate::core::error::{AuditError, Result};
use crate::core::{decode_output, resolve_path, DecodePolicy, Invocation, ProcessLauncher};
use std::ffi::OsString;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

/// Everything needed to build the audit invocation. The binary fills these
/// from flags, `audit.toml` and the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSettings {
    pub interpreter: PathBuf,
    pub script: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub decode: DecodePolicy,
}

pub struct AuditRunner<L> {
    settings: AuditSettings,
    launcher: L,
}

impl<L: ProcessLauncher> AuditRunner<L> {
    pub fn new(settings: AuditSettings, launcher: L) -> Self {
        Self { settings, launcher }
    }

    /// Build the command line: interpreter, script, then script arguments.
    ///
    /// The script path is passed through as configured; the child runs in the
    /// working directory so relative paths resolve there.
    pub fn invocation(&self) -> Result<Invocation> {
        let resolved = resolve_path(&self.settings.working_dir, &self.settings.script);
        match resolved.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                return Err(AuditError::LaunchFailure(format!(
                    "Target script not found: {}",
                    resolved.display()
                )));
            }
            Err(e) => {
                return Err(AuditError::LaunchFailure(format!(
                    "Cannot access target script {}: {}",
                    resolved.display(),
                    e
                )));
            }
        }

        let mut args: Vec<OsString> = Vec::with_capacity(self.settings.args.len() + 1);
        args.push(self.settings.script.clone().into_os_string());
        args.extend(self.settings.args.iter().map(OsString::from));

        Ok(Invocation {
            program: self.settings.interpreter.clone(),
            args,
            current_dir: self.settings.working_dir.clone(),
        })
    }

    /// Launch the audit script, wait for it and decode both streams.
    pub async fn execute(&self) -> Result<CapturedOutput> {
        let invocation = self.invocation()?;
        tracing::debug!(
            "Running `{}` in {}",
            invocation,
            invocation.current_dir.display()
        );

        let raw = self.launcher.launch(&invocation).await?;
        tracing::debug!(
            "Audit exited with code {} ({} bytes stdout, {} bytes stderr, decode={})",
            raw.exit_code,
            raw.stdout.len(),
            raw.stderr.len(),
            self.settings.decode.to_str()
        );

        Ok(CapturedOutput {
            exit_code: raw.exit_code,
            stdout: decode_output(&raw.stdout, self.settings.decode),
            stderr: decode_output(&raw.stderr, self.settings.decode),
        })
    }

    /// Run the audit to completion and fold any launch failure into the report.
    pub async fn report(&self) -> AuditReport {
        match self.execute().await {
            Ok(output) => AuditReport::Completed(output),
            Err(e) => {
                tracing::debug!("Audit launch failed: {}", e);
                AuditReport::Failed(e.to_string())
            }
        }
    }
}

/// Print the banner, then resolve `settings`, run the audit and print its
/// report to `out`.
///
/// `settings` is not polled until the banner is written, so anything it does
/// (reading the working directory, loading config) happens after it. Never
/// fails: a settings or launch error becomes a `FAILED:` line and a non-zero
/// exit code from the script is reported as data.
pub async fn run_audit<W, L, F>(out: &mut W, launcher: L, settings: F) -> AuditReport
where
    W: Write,
    L: ProcessLauncher,
    F: Future<Output = Result<AuditSettings>>,
{
    if let Err(e) = write_banner(out) {
        tracing::warn!("Failed to write audit banner: {}", e);
    }

    let report = match settings.await {
        Ok(settings) => AuditRunner::new(settings, launcher).report().await,
        Err(e) => {
            tracing::debug!("Audit setup failed: {}", e);
            AuditReport::Failed(e.to_string())
        }
    };

    if let Err(e) = report.render(out) {
        tracing::warn!("Failed to write audit report: {}", e);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_AUDIT_SCRIPT, DEFAULT_AUDIT_TARGET};
    use crate::core::RawOutput;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::path::Path;

    enum FakeOutcome {
        Exited(RawOutput),
        SpawnError(String),
    }

    struct FakeLauncher {
        outcome: FakeOutcome,
        calls: RefCell<Vec<Invocation>>,
    }

    impl FakeLauncher {
        fn exited(exit_code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
            Self {
                outcome: FakeOutcome::Exited(RawOutput {
                    exit_code,
                    stdout: stdout.to_vec(),
                    stderr: stderr.to_vec(),
                }),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn spawn_error(message: &str) -> Self {
            Self {
                outcome: FakeOutcome::SpawnError(message.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessLauncher for &FakeLauncher {
        async fn launch(&self, invocation: &Invocation) -> Result<RawOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            match &self.outcome {
                FakeOutcome::Exited(raw) => Ok(raw.clone()),
                FakeOutcome::SpawnError(msg) => Err(AuditError::LaunchFailure(msg.clone())),
            }
        }
    }

    fn project_with_script(dir: &Path) {
        let script = dir.join(DEFAULT_AUDIT_SCRIPT);
        std::fs::create_dir_all(script.parent().unwrap()).unwrap();
        std::fs::write(&script, "print('audit')\n").unwrap();
    }

    fn settings(dir: &Path) -> AuditSettings {
        AuditSettings {
            interpreter: PathBuf::from("python3"),
            script: PathBuf::from(DEFAULT_AUDIT_SCRIPT),
            args: vec![DEFAULT_AUDIT_TARGET.to_string()],
            working_dir: dir.to_path_buf(),
            decode: DecodePolicy::Ignore,
        }
    }

    async fn run_to_string(
        launcher: &FakeLauncher,
        settings: Result<AuditSettings>,
    ) -> (String, AuditReport) {
        let mut buf = Vec::new();
        let report = run_audit(&mut buf, launcher, async { settings }).await;
        (String::from_utf8(buf).unwrap(), report)
    }

    #[tokio::test]
    async fn successful_run_prints_full_report() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"OK", b"");

        let (text, report) = run_to_string(&launcher, Ok(settings(dir.path()))).await;

        assert_eq!(
            text,
            "Starting Audit...\nSTDOUT:\nOK\nSTDERR:\n\nEXIT CODE: 0\n"
        );
        assert_eq!(report.exit_code(), Some(0));
    }

    #[tokio::test]
    async fn non_zero_exit_is_reported_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(2, b"", b"error: bad arg");

        let (text, report) = run_to_string(&launcher, Ok(settings(dir.path()))).await;

        assert!(text.starts_with("Starting Audit...\n"));
        assert!(
            text.ends_with("STDERR:\nerror: bad arg\nEXIT CODE: 2\n"),
            "unexpected output:\n{}",
            text
        );
        assert!(!text.contains("FAILED:"));
        assert_eq!(report.exit_code(), Some(2));
    }

    #[tokio::test]
    async fn invocation_uses_interpreter_script_and_target() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"", b"");
        let runner = AuditRunner::new(settings(dir.path()), &launcher);

        runner.report().await;

        let calls = launcher.calls.borrow();
        assert_eq!(calls.len(), 1);
        let expected_args: Vec<OsString> = vec![DEFAULT_AUDIT_SCRIPT.into(), ".".into()];
        assert_eq!(calls[0].program, PathBuf::from("python3"));
        assert_eq!(calls[0].args, expected_args);
        assert_eq!(calls[0].current_dir, dir.path());
    }

    #[tokio::test]
    async fn missing_script_fails_without_launching() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::exited(0, b"", b"");

        let (text, report) = run_to_string(&launcher, Ok(settings(dir.path()))).await;

        assert!(text.starts_with("Starting Audit...\nFAILED: "), "{}", text);
        assert!(text.contains("ux_audit.py"), "{}", text);
        assert!(!text.contains("EXIT CODE:"));
        assert_eq!(report.exit_code(), None);
        assert!(launcher.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn spawn_error_is_reported_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::spawn_error("Failed to execute python3: permission denied");

        let (text, _) = run_to_string(&launcher, Ok(settings(dir.path()))).await;

        assert_eq!(
            text,
            "Starting Audit...\nFAILED: Failed to execute python3: permission denied\n"
        );
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_fail_capture() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"score: 9\xff0\n", b"\xc3");
        let runner = AuditRunner::new(settings(dir.path()), &launcher);

        let output = runner.execute().await.unwrap();
        assert_eq!(output.stdout, "score: 90\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn replace_policy_keeps_marker_for_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"a\xffb", b"");
        let mut settings = settings(dir.path());
        settings.decode = DecodePolicy::Replace;
        let runner = AuditRunner::new(settings, &launcher);

        let output = runner.execute().await.unwrap();
        assert_eq!(output.stdout, "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn custom_args_replace_default_target() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"", b"");
        let mut settings = settings(dir.path());
        settings.args = vec!["src".to_string(), "--strict".to_string()];
        let runner = AuditRunner::new(settings, &launcher);

        let invocation = runner.invocation().unwrap();
        let expected_args: Vec<OsString> =
            vec![DEFAULT_AUDIT_SCRIPT.into(), "src".into(), "--strict".into()];
        assert_eq!(invocation.args, expected_args);
    }

    #[tokio::test]
    async fn settings_error_is_reported_after_banner() {
        let launcher = FakeLauncher::exited(0, b"", b"");
        let settings = Err(AuditError::Config("audit.script must not be empty".to_string()));

        let (text, report) = run_to_string(&launcher, settings).await;

        assert_eq!(
            text,
            "Starting Audit...\nFAILED: Configuration error: audit.script must not be empty\n"
        );
        assert_eq!(report.exit_code(), None);
        assert!(launcher.calls.borrow().is_empty());
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn settings_are_resolved_after_banner() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let launcher = FakeLauncher::exited(0, b"", b"");
        let buf = SharedBuf::default();
        let seen_at_setup = RefCell::new(String::new());

        let mut out = buf.clone();
        run_audit(&mut out, &launcher, async {
            *seen_at_setup.borrow_mut() = String::from_utf8(buf.0.borrow().clone()).unwrap();
            Ok(settings(dir.path()))
        })
        .await;

        assert_eq!(*seen_at_setup.borrow(), "Starting Audit...\n");
    }

    #[tokio::test]
    async fn directory_script_is_passed_to_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("audit_pkg");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(package.join("__main__.py"), "print('audit')\n").unwrap();
        let launcher = FakeLauncher::exited(0, b"", b"");
        let mut settings = settings(dir.path());
        settings.script = PathBuf::from("audit_pkg");
        let runner = AuditRunner::new(settings, &launcher);

        let report = runner.report().await;

        assert_eq!(report.exit_code(), Some(0));
        assert_eq!(launcher.calls.borrow().len(), 1);
    }
}
