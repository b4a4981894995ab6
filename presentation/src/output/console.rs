//! Terminal messenger for hot-seat games
//!
//! Every player shares one screen, so the same update fanned out to each
//! player's message is printed once.

use super::formatter::NoticeFormatter;
use async_trait::async_trait;
use avalon_application::{MessageHandle, MessageTarget, MessengerPort, Notice, PortError};
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

struct Screen {
    out: Box<dyn Write + Send>,
    last_printed: Option<String>,
}

/// Prints notices to a terminal-like writer
pub struct ConsoleMessenger {
    next_id: AtomicU64,
    screen: Mutex<Screen>,
}

impl ConsoleMessenger {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            screen: Mutex::new(Screen {
                out,
                last_printed: None,
            }),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Print `text`; with `dedupe`, skip it if it repeats the previous block.
    fn print(&self, text: String, dedupe: bool) -> Result<(), PortError> {
        let mut screen = self
            .screen
            .lock()
            .map_err(|_| PortError::Delivery("console poisoned".to_string()))?;
        if dedupe && screen.last_printed.as_deref() == Some(text.as_str()) {
            return Ok(());
        }
        writeln!(screen.out, "{}", text)
            .and_then(|_| screen.out.flush())
            .map_err(|e| PortError::Delivery(e.to_string()))?;
        screen.last_printed = Some(text);
        Ok(())
    }

    /// Print free text, e.g. a decision prompt or a command error.
    pub fn say(&self, text: impl Into<String>) -> Result<(), PortError> {
        self.print(text.into(), false)
    }
}

#[async_trait]
impl MessengerPort for ConsoleMessenger {
    async fn post_message(
        &self,
        target: &MessageTarget,
        notice: &Notice,
    ) -> Result<MessageHandle, PortError> {
        let text = match notice {
            // the same vote or quest prompt goes to every player
            Notice::TeamVoteOpened { .. } | Notice::QuestStarted { .. } => {
                NoticeFormatter::format_body(notice)
            }
            _ => NoticeFormatter::format(target, notice),
        };
        self.print(text, true)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(MessageHandle::new(target.clone(), id.to_string()))
    }

    async fn update_message(
        &self,
        _handle: &MessageHandle,
        notice: &Notice,
    ) -> Result<(), PortError> {
        self.print(NoticeFormatter::format_body(notice), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalon_domain::{PlayerId, TeamProposal};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn proposal() -> TeamProposal {
        TeamProposal::new(
            "alice".into(),
            vec![PlayerId::from("alice"), PlayerId::from("bob")],
            0,
            1,
        )
    }

    #[tokio::test]
    async fn test_fan_out_prints_once() {
        let captured = Captured::default();
        let console = ConsoleMessenger::new(Box::new(captured.clone()));
        let opened = Notice::TeamVoteOpened {
            proposal: proposal(),
        };

        let mut handles = Vec::new();
        for player in ["alice", "bob", "carol"] {
            let target = MessageTarget::Player(player.into());
            handles.push(console.post_message(&target, &opened).await.unwrap());
        }
        let progress = Notice::TeamVoteProgress {
            proposal: proposal(),
            voted: vec!["bob".into()],
            pending: vec!["alice".into(), "carol".into()],
        };
        for handle in &handles {
            console.update_message(handle, &progress).await.unwrap();
        }

        let text = captured.text();
        assert_eq!(text.matches("proposes").count(), 1);
        assert_eq!(text.matches("waiting").count(), 1);
        // handles are distinct even when nothing new was printed
        assert_ne!(handles[0], handles[1]);
    }

    #[tokio::test]
    async fn test_private_posts_name_the_player() {
        let captured = Captured::default();
        let console = ConsoleMessenger::new(Box::new(captured.clone()));
        let notice = Notice::AssassinationStarted {
            assassin: "dave".into(),
            candidates: vec!["alice".into()],
        };
        console
            .post_message(&MessageTarget::Player("dave".into()), &notice)
            .await
            .unwrap();
        console.say("Nobody is waiting for that").unwrap();
        console.say("Nobody is waiting for that").unwrap();
        let text = captured.text();
        assert!(text.contains("to dave"));
        assert_eq!(text.matches("Nobody is waiting").count(), 2);
    }
}
