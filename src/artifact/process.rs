//! Artifact child process and the callables that forward into it.
use super::protocol::{Manifest, Request, Response};
use crate::grading::{Binding, Callable, Failure, Namespace};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::rc::Rc;

pub const KIND_ARTIFACT_EXITED: &str = "ArtifactExited";
pub const KIND_PROTOCOL: &str = "ProtocolError";

/// Maximum response line accepted from an artifact.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Command line that starts an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ArtifactCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a shell-style command string such as `python3 solution.py`.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("parse artifact command {command_line:?}"))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| anyhow!("artifact command is empty"))?;
        Ok(Self::new(program, words.collect()))
    }

    /// Resolve the program: paths are used as given, bare names via `PATH`.
    pub fn resolve_program(&self) -> Result<PathBuf> {
        let path = Path::new(&self.program);
        if path.components().count() > 1 || path.is_file() {
            return Ok(path.to_path_buf());
        }
        which::which(&self.program)
            .with_context(|| format!("locate artifact program {:?} on PATH", self.program))
    }

    pub fn display(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

struct ArtifactProcess {
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    max_response_bytes: usize,
    /// Set once a reply was cut off mid-line; the stream is out of step.
    desynced: bool,
}

impl ArtifactProcess {
    fn spawn(command: &ArtifactCommand) -> Result<Self> {
        let program = command.resolve_program()?;
        let mut child = Command::new(&program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawn artifact {}", program.display()))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("artifact stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("artifact stdout not captured"))?;
        Ok(Self {
            program: command.display(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            max_response_bytes: MAX_RESPONSE_BYTES,
            desynced: false,
        })
    }

    fn request(&mut self, request: &Request) -> Result<Response, Failure> {
        if self.desynced {
            return Err(self.exited("an earlier response exceeded the size limit"));
        }
        let mut line = serde_json::to_string(request)
            .map_err(|err| Failure::new(KIND_PROTOCOL, format!("encode request: {err}")))?;
        line.push('\n');
        if let Err(err) = self
            .stdin
            .write_all(line.as_bytes())
            .and_then(|()| self.stdin.flush())
        {
            return Err(self.exited(&format!("write request: {err}")));
        }

        let mut reply = Vec::new();
        let read = (&mut self.stdout)
            .take(self.max_response_bytes as u64 + 1)
            .read_until(b'\n', &mut reply);
        match read {
            Ok(0) => return Err(self.exited("closed its stdout")),
            Ok(_) => {}
            Err(err) => return Err(self.exited(&format!("read response: {err}"))),
        }
        if reply.len() > self.max_response_bytes {
            self.desynced = true;
            let _ = self.child.kill();
            return Err(Failure::new(
                KIND_PROTOCOL,
                format!(
                    "artifact {} sent a response over {} bytes",
                    self.program, self.max_response_bytes
                ),
            ));
        }
        serde_json::from_slice(reply.trim_ascii_end()).map_err(|err| {
            Failure::new(
                KIND_PROTOCOL,
                format!("artifact {} sent a malformed response: {err}", self.program),
            )
        })
    }

    fn exited(&mut self, detail: &str) -> Failure {
        let status = match self.child.try_wait() {
            Ok(Some(status)) => format!(" ({status})"),
            Ok(None) | Err(_) => String::new(),
        };
        Failure::new(
            KIND_ARTIFACT_EXITED,
            format!("artifact {} stopped responding: {detail}{status}", self.program),
        )
    }
}

impl Drop for ArtifactProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A function binding backed by the shared artifact process.
struct ArtifactFunction {
    process: Rc<RefCell<ArtifactProcess>>,
    name: String,
}

impl Callable for ArtifactFunction {
    fn call(&self, args: &[Value]) -> Result<Value, Failure> {
        let mut process = self.process.try_borrow_mut().map_err(|_| {
            Failure::internal(format!("re-entrant call into artifact function {:?}", self.name))
        })?;
        let request = Request::Call {
            name: self.name.clone(),
            args: args.to_vec(),
        };
        match process.request(&request)? {
            Response::Ok(value) => Ok(value),
            Response::Error(err) => Err(err.into()),
        }
    }
}

/// Start the artifact and build a namespace from its `describe` reply.
///
/// Any failure here means the whole run cannot be graded.
pub fn load_namespace(name: &str, command: &ArtifactCommand) -> Result<Namespace> {
    tracing::info!(command = %command.display(), "loading artifact");
    let mut process = ArtifactProcess::spawn(command)?;
    let manifest = match process
        .request(&Request::Describe)
        .context("describe artifact")?
    {
        Response::Ok(value) => {
            serde_json::from_value::<Manifest>(value).context("parse artifact manifest")?
        }
        Response::Error(err) => {
            return Err(anyhow!(
                "artifact failed to load: {}: {}",
                err.kind,
                err.message
            ))
        }
    };

    let process = Rc::new(RefCell::new(process));
    let mut namespace = Namespace::new(name);
    for (value_name, value) in manifest.values {
        namespace.insert_value(value_name, value);
    }
    for function in manifest.functions {
        let binding = Binding::Function(Rc::new(ArtifactFunction {
            process: Rc::clone(&process),
            name: function.clone(),
        }));
        namespace.insert(function, binding);
    }
    tracing::info!(
        namespace = name,
        bindings = namespace.len(),
        "artifact loaded"
    );
    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_shell_words() {
        let command = ArtifactCommand::parse("python3 'my solution.py' --fast").expect("parse");
        assert_eq!(command.program, "python3");
        assert_eq!(command.args, vec!["my solution.py", "--fast"]);
        assert_eq!(command.display(), "python3 'my solution.py' --fast");
    }

    #[test]
    fn parse_rejects_empty_commands() {
        assert!(ArtifactCommand::parse("   ").is_err());
        assert!(ArtifactCommand::parse("python3 'unterminated").is_err());
    }

    #[test]
    fn relative_paths_are_not_searched_on_path() {
        let command = ArtifactCommand::new("./bin/solution", Vec::new());
        assert_eq!(
            command.resolve_program().expect("resolve"),
            PathBuf::from("./bin/solution")
        );
    }

    #[test]
    fn missing_program_fails_to_load() {
        let command = ArtifactCommand::new("exam-grader-no-such-artifact", Vec::new());
        assert!(load_namespace("exam", &command).is_err());
    }

    fn shell(script: &str) -> ArtifactCommand {
        ArtifactCommand::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn loads_functions_and_values_and_forwards_calls() {
        let command = shell(
            r#"read l; echo '{"ok":{"functions":["f"],"values":{"N":2}}}'; read l; echo '{"ok":7}'"#,
        );
        let namespace = load_namespace("exam", &command).expect("load");
        assert_eq!(
            namespace.lookup("N").expect("N").value().expect("value"),
            &serde_json::json!(2)
        );
        let f = namespace.lookup("f").expect("f");
        assert_eq!(f.call(&[]).expect("call"), serde_json::json!(7));
    }

    #[test]
    fn describe_error_fails_the_load() {
        let command = shell(
            r#"read l; echo '{"error":{"kind":"SyntaxError","message":"invalid syntax"}}'"#,
        );
        let err = load_namespace("exam", &command).expect_err("describe refused");
        assert!(format!("{err:#}").contains("SyntaxError: invalid syntax"));
    }

    #[test]
    fn unexpected_manifest_fails_the_load() {
        let command = shell(r#"read l; echo '{"ok":{"classes":[]}}'"#);
        let err = load_namespace("exam", &command).expect_err("bad manifest");
        assert!(format!("{err:#}").contains("parse artifact manifest"));
    }

    #[test]
    fn malformed_reply_is_a_protocol_failure_and_stream_stays_in_step() {
        let command = shell(r#"read a; echo garbage; read b; echo '{"ok":3}'"#);
        let mut process = ArtifactProcess::spawn(&command).expect("spawn");
        let failure = process.request(&Request::Describe).expect_err("garbage");
        assert_eq!(failure.kind, KIND_PROTOCOL);
        assert!(failure.message.contains("malformed response"));
        assert_eq!(
            process.request(&Request::Describe).expect("next reply"),
            Response::Ok(serde_json::json!(3))
        );
    }

    #[test]
    fn endless_line_is_cut_off_at_the_size_limit() {
        let mut process = ArtifactProcess::spawn(&shell("yes a | tr -d '\\n'")).expect("spawn");
        process.max_response_bytes = 64;
        let failure = process.request(&Request::Describe).expect_err("oversized");
        assert_eq!(failure.kind, KIND_PROTOCOL);
        assert!(failure.message.contains("over 64 bytes"), "{}", failure.message);

        let next = process.request(&Request::Describe).expect_err("desynced");
        assert_eq!(next.kind, KIND_ARTIFACT_EXITED);
    }

    #[test]
    fn closed_stdout_is_reported_as_exited() {
        let mut process = ArtifactProcess::spawn(&shell("read l; exit 0")).expect("spawn");
        let failure = process.request(&Request::Describe).expect_err("no reply");
        assert_eq!(failure.kind, KIND_ARTIFACT_EXITED);
        assert!(failure.message.contains("closed its stdout"));
        assert!(!failure.message.contains("still running"));
    }
}
