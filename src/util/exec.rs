use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One external tool invocation, built incrementally and run synchronously.
///
/// Extra environment entries apply to the child only; the parent environment
/// is inherited untouched. No timeout and no retry: the wrapper blocks until
/// the tool exits and surfaces the exit status exactly once.
#[derive(Debug, Default)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    capture_output: bool,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
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

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Spawn and block until exit. A spawn failure (e.g. the program does not
    /// exist) surfaces as the original io::Error so callers keep the
    /// NotFound exit-code mapping.
    ///
    /// Both pipes are drained to EOF before waiting; a child that fills one
    /// pipe buffer must never block against an undrained wrapper.
    pub fn run(self) -> io::Result<ExecOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if self.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let mut child = cmd.spawn()?;

        // Read stderr on a helper thread while this thread reads stdout, so
        // neither pipe can fill up while the other is being consumed.
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || -> io::Result<String> {
                let mut buf = String::new();
                pipe.read_to_string(&mut buf)?;
                Ok(buf)
            })
        });
        let stdout = read_stream(child.stdout.take().as_mut())?;
        let stderr = match stderr_reader {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("stderr reader thread panicked"))??,
            None => String::new(),
        };

        let status = child.wait()?;

        Ok(ExecOutput {
            status,
            stdout,
            stderr,
        })
    }
}

fn read_stream(stream: Option<&mut impl Read>) -> io::Result<String> {
    let mut buf = String::new();
    if let Some(reader) = stream {
        reader.read_to_string(&mut buf)?;
    }
    Ok(buf)
}

#[derive(Debug)]
pub struct ExecOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}
