//! One interactive session: prompt, transcript and line submission.

use log::{info, warn};

use crate::commands::{self, Command, Confirm, Context, DirChange, Effect, Navigation};
use crate::config::{CAPTURE_PROMPT, PROMPT_SUFFIX, WELCOME_BANNER};
use crate::gateway::Gateway;
use crate::index::DirectoryIndex;
use crate::mode::InputMode;
use crate::path::PathState;
use crate::transcript::TranscriptLog;

const WRITE_FAILED: &str = "Error: Could not write to file.";

/// Command interpreter session bound to one gateway.
///
/// Each [`submit`](Self::submit) is one unit of work: the caller must await
/// it before submitting the next line. All state is owned here and mutated
/// only from `submit` and [`start`](Self::start).
pub struct Shell<G: Gateway> {
    gateway: G,
    confirm: Box<dyn Confirm>,
    user: Option<String>,
    path: PathState,
    index: DirectoryIndex,
    mode: InputMode,
    transcript: TranscriptLog,
}

impl<G: Gateway> Shell<G> {
    /// Creates a session at the root directory with the welcome banner.
    ///
    /// `confirm` is asked before every delete.
    pub fn new(gateway: G, confirm: impl Confirm + 'static) -> Self {
        let mut transcript = TranscriptLog::new();
        transcript.push(WELCOME_BANNER);
        Self {
            gateway,
            confirm: Box::new(confirm),
            user: None,
            path: PathState::new(),
            index: DirectoryIndex::new(),
            mode: InputMode::Normal,
            transcript,
        }
    }

    /// Sets the name reported by `whoami`.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Load the listing of the working directory.
    pub async fn start(&mut self) {
        self.reload_index().await;
    }

    /// `~/docs>` in normal mode, `...` while capturing.
    pub fn prompt(&self) -> String {
        if self.mode.is_capturing() {
            CAPTURE_PROMPT.to_string()
        } else {
            format!("{}{}", self.path.display(), PROMPT_SUFFIX)
        }
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    pub fn path(&self) -> &PathState {
        &self.path
    }

    pub fn index(&self) -> &DirectoryIndex {
        &self.index
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Process one submitted line.
    ///
    /// Returns the view the front end should switch to, if the command asked
    /// for one.
    pub async fn submit(&mut self, input: &str) -> Option<Navigation> {
        let line = input.trim();

        if let Some((target, append)) = self.mode.take() {
            self.transcript.push(format!("{} {}", CAPTURE_PROMPT, line));
            if let Err(err) = self.gateway.write_content(target.id, line, append).await {
                warn!("write to {} failed ({})", target.name, err);
                self.transcript.push(WRITE_FAILED);
            }
            info!("capture into {} finished", target.name);
            return None;
        }

        let prompt = self.prompt();
        let Some(cmd) = Command::parse(line) else {
            self.transcript.push(prompt);
            return None;
        };
        self.transcript.push(format!("{} {}", prompt, line));

        let mut ctx = Context {
            gateway: &self.gateway,
            path: &self.path,
            index: &mut self.index,
            confirm: self.confirm.as_ref(),
            user: self.user.as_deref(),
        };
        let result = commands::execute(cmd, &mut ctx).await;
        self.transcript.extend(result.output);

        match result.effect {
            Some(effect) => self.apply(effect).await,
            None => None,
        }
    }

    async fn apply(&mut self, effect: Effect) -> Option<Navigation> {
        match effect {
            Effect::ChangeDir(change) => {
                match change {
                    DirChange::Root => self.path.reset(),
                    DirChange::Up if self.path.depth() > 1 => self.path.pop(),
                    DirChange::Up => return None,
                    DirChange::Enter(segment) => self.path.push(segment),
                }
                self.reload_index().await;
                None
            }
            Effect::Capture { target, append } => {
                info!("capturing next line into {} (append: {})", target.name, append);
                self.mode = InputMode::capture(target, append);
                None
            }
            Effect::Navigate(nav) => Some(nav),
            Effect::Clear => {
                self.transcript.clear();
                None
            }
        }
    }

    async fn reload_index(&mut self) {
        let parent = self.path.current_id();
        if let Err(err) = self.index.refresh(&self.gateway, parent).await {
            warn!("listing of {:?} failed ({})", parent, err);
            self.transcript.push(commands::FETCH_FAILED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryGateway, WriteRecord};

    async fn shell_with(gateway: MemoryGateway) -> Shell<MemoryGateway> {
        let mut shell = Shell::new(gateway, |_: &str| true).with_user("alice");
        shell.start().await;
        shell
    }

    fn lines(shell: &Shell<MemoryGateway>) -> Vec<&str> {
        shell.transcript().lines().iter().map(String::as_str).collect()
    }

    #[tokio::test]
    async fn test_welcome_and_prompt_echo() {
        let mut shell = shell_with(MemoryGateway::new("alice")).await;
        assert_eq!(lines(&shell), vec!["Welcome to Virtual OS!"]);
        assert_eq!(shell.prompt(), "~>");

        shell.submit("   ").await;
        shell.submit("pwd").await;
        assert_eq!(lines(&shell), vec!["Welcome to Virtual OS!", "~>", "~> pwd", "~"]);
    }

    #[tokio::test]
    async fn test_unknown_command_changes_nothing_else() {
        let gateway = MemoryGateway::new("alice");
        gateway.seed_dir(None, "docs");
        let mut shell = shell_with(gateway).await;
        shell.submit("cd docs").await;
        let depth = shell.path().depth();

        shell.submit("foo").await;
        assert_eq!(shell.transcript().last(), Some("command not found: foo"));
        assert_eq!(shell.path().depth(), depth);
        assert!(!shell.mode().is_capturing());
    }

    #[tokio::test]
    async fn test_cd_up_floors_at_root() {
        let gateway = MemoryGateway::new("alice");
        let docs = gateway.seed_dir(None, "docs");
        gateway.seed_file(Some(docs), "inner.txt", "");
        let mut shell = shell_with(gateway).await;

        shell.submit("cd ..").await;
        assert_eq!(shell.path().depth(), 1);

        shell.submit("cd docs").await;
        assert_eq!(shell.path().depth(), 2);
        assert_eq!(shell.prompt(), "~/docs>");
        assert!(shell.index().find("inner.txt").is_some());

        shell.submit("cd ..").await;
        assert_eq!(shell.path().depth(), 1);
        assert!(shell.index().find_dir("docs").is_some());
    }

    #[tokio::test]
    async fn test_capture_is_single_shot() {
        let mut shell = shell_with(MemoryGateway::new("alice")).await;

        shell.submit("cat > f").await;
        assert!(shell.mode().is_capturing());
        assert_eq!(shell.prompt(), "...");

        shell.submit("hello").await;
        assert!(!shell.mode().is_capturing());
        let id = shell.index().find("f").unwrap().id;
        assert_eq!(
            shell.gateway().writes(),
            vec![WriteRecord {
                id,
                content: "hello".to_string(),
                append: false
            }]
        );
        assert_eq!(shell.transcript().last(), Some("... hello"));

        shell.submit("ls").await;
        assert_eq!(shell.transcript().last(), Some("f"));
    }

    #[tokio::test]
    async fn test_capture_append_joins_lines() {
        let gateway = MemoryGateway::new("alice");
        let id = gateway.seed_file(None, "log", "first");
        let mut shell = shell_with(gateway).await;

        shell.submit("cat >> log").await;
        shell.submit("second").await;
        assert_eq!(shell.gateway().content(id).as_deref(), Some("first\nsecond"));
    }

    #[tokio::test]
    async fn test_capture_returns_to_normal_on_failure() {
        let gateway = MemoryGateway::new("alice");
        gateway.seed_file(None, "ro", "");
        let mut shell = shell_with(gateway).await;

        shell.submit("chmod 500 ro").await;
        shell.submit("cat > ro").await;
        shell.submit("data").await;
        assert_eq!(shell.transcript().last(), Some(WRITE_FAILED));
        assert!(!shell.mode().is_capturing());
    }

    #[tokio::test]
    async fn test_clear_keeps_path_and_mode() {
        let gateway = MemoryGateway::new("alice");
        gateway.seed_dir(None, "docs");
        let mut shell = shell_with(gateway).await;
        shell.submit("cd docs").await;

        shell.submit("clear").await;
        assert!(shell.transcript().is_empty());
        assert_eq!(shell.path().depth(), 2);
        assert!(!shell.mode().is_capturing());
    }

    #[tokio::test]
    async fn test_navigation_returned() {
        let gateway = MemoryGateway::new("alice");
        let id = gateway.seed_file(None, "notes", "");
        let mut shell = shell_with(gateway).await;

        assert_eq!(shell.submit("edit notes").await, Some(Navigation::Editor(id)));
        assert_eq!(shell.submit("mem_view").await, Some(Navigation::MemoryViewer));
        assert_eq!(shell.submit("pwd").await, None);
    }

    #[tokio::test]
    async fn test_start_reports_fetch_failure() {
        let gateway = MemoryGateway::new("alice");
        gateway.set_offline(true);
        let shell = shell_with(gateway).await;
        assert_eq!(shell.transcript().last(), Some(commands::FETCH_FAILED));
    }
}
