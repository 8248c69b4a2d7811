//! Interactive read-eval-print loop, generic over its input and output.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use parley_transport::TransportError;

use crate::dispatcher::Dispatcher;

pub const BANNER: &str = "Multi-Tool Agent started (type 'exit' to quit)";

/// Prompt and reply decorations.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub prompt: String,
    pub reply_prefix: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            prompt: "User: ".into(),
            reply_prefix: "Agent: ".into(),
        }
    }
}

/// Why the loop stopped.
#[derive(Debug)]
pub enum ReplExit {
    /// The user typed `exit`.
    Quit,
    /// Input ran out.
    EndOfInput,
    /// The provider connection broke mid-turn.
    ConnectionLost(TransportError),
}

/// Run the loop until `exit`, end of input, or a fatal transport error.
pub async fn run<R, W>(
    dispatcher: &mut Dispatcher<'_>,
    input: R,
    output: &mut W,
    prompts: &Prompts,
) -> std::io::Result<ReplExit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(format!("{BANNER}\n\n").as_bytes()).await?;

    loop {
        output.write_all(prompts.prompt.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            output.flush().await?;
            return Ok(ReplExit::EndOfInput);
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            return Ok(ReplExit::Quit);
        }

        match dispatcher.handle_turn(line).await {
            Ok(reply) if reply.is_empty() => {}
            Ok(reply) => {
                output
                    .write_all(format!("{}{reply}\n", prompts.reply_prefix).as_bytes())
                    .await?;
            }
            Err(e) => {
                output
                    .write_all(
                        format!(
                            "{}connection to the tool provider was lost ({e})\n",
                            prompts.reply_prefix
                        )
                        .as_bytes(),
                    )
                    .await?;
                output.flush().await?;
                return Ok(ReplExit::ConnectionLost(e));
            }
        }
        output.flush().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_transport::MockTransport;

    async fn drive(mock: &MockTransport, input: &str) -> (ReplExit, String) {
        let mut dispatcher = Dispatcher::new(mock);
        let mut out = Vec::new();
        let exit = run(
            &mut dispatcher,
            input.as_bytes(),
            &mut out,
            &Prompts::default(),
        )
        .await
        .unwrap();
        (exit, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn banner_prompt_and_reply() {
        let mock = MockTransport::new();
        let (exit, out) = drive(&mock, "hello\nexit\n").await;

        assert!(matches!(exit, ReplExit::Quit));
        assert_eq!(
            out,
            "Multi-Tool Agent started (type 'exit' to quit)\n\n\
             User: Agent: Hi there! How can I help you?\n\
             User: "
        );
    }

    #[tokio::test]
    async fn exit_is_case_insensitive() {
        let mock = MockTransport::new();
        let (exit, out) = drive(&mock, "  EXIT  \nhello\n").await;
        assert!(matches!(exit, ReplExit::Quit));
        assert!(!out.contains("Agent:"));
    }

    #[tokio::test]
    async fn blank_lines_get_no_reply() {
        let mock = MockTransport::new();
        let (exit, out) = drive(&mock, "\n   \nhi\n").await;
        assert!(matches!(exit, ReplExit::EndOfInput));
        assert_eq!(out.matches("Agent:").count(), 1);
        assert_eq!(out.matches("User: ").count(), 4);
    }

    #[tokio::test]
    async fn state_persists_across_lines() {
        let mock = MockTransport::new();
        let (_, out) = drive(&mock, "i am asha\nwhat is my name\n").await;
        assert!(out.contains("Agent: Nice to meet you, Asha!\n"));
        assert!(out.contains("Agent: Your name is Asha.\n"));
    }

    #[tokio::test]
    async fn fatal_error_stops_loop() {
        let mock = MockTransport::new();
        mock.push_error("count_vowels", TransportError::Closed);
        let (exit, out) = drive(&mock, "vowels in apple\nhello\n").await;

        assert!(matches!(exit, ReplExit::ConnectionLost(TransportError::Closed)));
        assert!(out.contains(
            "Agent: connection to the tool provider was lost (tool provider closed the connection)\n"
        ));
        assert!(!out.contains("Hi there"));
    }
}
