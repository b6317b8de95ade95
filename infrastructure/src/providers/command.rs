//! [`TextGenerator`] backed by a local shell command.
//!
//! The system and user prompts are written to the command's stdin separated
//! by a blank line; the reply is whatever it prints on stdout. This lets any
//! local model runner drive the agents without the engine speaking a wire
//! protocol.

use super::text::TextGenerator;
use async_trait::async_trait;
use crew_application::ProviderError;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Maximum reply size kept (64 KB)
const MAX_REPLY_SIZE: usize = 64 * 1024;

pub struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", &self.command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", &self.command]);
            c
        }
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Unavailable(format!("failed to spawn command: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = format!("{}\n\n{}\n", system, prompt);
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("failed to write prompt: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::RequestFailed(format!(
                "command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let mut reply = String::from_utf8_lossy(&output.stdout).into_owned();
        if reply.len() > MAX_REPLY_SIZE {
            let mut end = MAX_REPLY_SIZE;
            while !reply.is_char_boundary(end) {
                end -= 1;
            }
            reply.truncate(end);
        }
        Ok(reply)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_echoes_prompt() {
        let generator = CommandGenerator::new("tail -n 1");
        let reply = generator.generate("system", "move -> Admin").await.unwrap();
        assert_eq!(reply.trim(), "move -> Admin");
    }

    #[tokio::test]
    async fn test_failing_command_is_an_error() {
        let generator = CommandGenerator::new("cat > /dev/null; echo boom >&2; exit 3");
        let err = generator.generate("system", "prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed(msg) if msg.contains("boom")));
    }
}
