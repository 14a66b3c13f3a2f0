//! Command parsing and dispatch.

pub mod builtins;
pub mod registry;

pub use builtins::system_clock;
pub use registry::{Builtin, Clock, CommandContext, CommandHandler, CommandRegistry, Effect};

use crate::error::ShellError;
use crate::render::{DisplaySurface, OutputLine};
use crate::session::SessionState;
use crate::vfs::Vfs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    /// Lowercased command name.
    pub name: String,
    /// Everything after the first whitespace run, verbatim.
    pub argument: &'a str,
}

/// Splits trimmed input on the first whitespace run. `None` for blank input.
pub fn parse_command(raw: &str) -> Option<Command<'_>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (name, argument) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    };

    Some(Command {
        name: name.to_lowercase(),
        argument,
    })
}

pub struct Interpreter {
    registry: CommandRegistry,
    clock: Clock,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_registry(builtins::registry())
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            registry,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs one submitted line. Handler errors become a single error line;
    /// the returned effect is left for the caller to perform.
    pub fn execute(
        &self,
        raw: &str,
        state: &mut SessionState,
        vfs: &Vfs,
        out: &mut dyn DisplaySurface,
    ) -> Effect {
        let Some(command) = parse_command(raw) else {
            return Effect::None;
        };

        tracing::debug!(command = %command.name, "dispatching command");

        let result = match self.registry.get(&command.name) {
            Some(handler) => {
                let mut ctx = CommandContext {
                    state,
                    vfs,
                    out: &mut *out,
                    commands: &self.registry,
                    clock: self.clock,
                };
                handler.run(command.argument, &mut ctx)
            }
            None => Err(ShellError::CommandNotFound(raw.trim().to_string())),
        };

        match result {
            Ok(effect) => effect,
            Err(err) => {
                tracing::debug!(error = %err, "command failed");
                out.append(OutputLine::error(err.to_string()));
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use time::macros::datetime;
    use time::OffsetDateTime;

    use super::{parse_command, Command, Effect, Interpreter};
    use crate::content::portfolio;
    use crate::render::{LineKind, MemorySurface};
    use crate::session::{Mode, SessionState};
    use crate::vfs::{Vfs, VfsPath};

    struct Harness {
        interpreter: Interpreter,
        state: SessionState,
        vfs: Vfs,
        out: MemorySurface,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                interpreter: Interpreter::new().with_clock(fixed_clock),
                state: SessionState::new(),
                vfs: portfolio().expect("portfolio builds"),
                out: MemorySurface::new(),
            }
        }

        fn run(&mut self, raw: &str) -> Effect {
            self.interpreter
                .execute(raw, &mut self.state, &self.vfs, &mut self.out)
        }

        fn texts(&self) -> Vec<String> {
            self.out.texts()
        }
    }

    fn fixed_clock() -> OffsetDateTime {
        datetime!(2024-03-05 14:07:09 UTC)
    }

    #[test]
    fn parse_splits_on_the_first_whitespace_run() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(
            parse_command("  CAT   notes/todo.txt  "),
            Some(Command {
                name: "cat".to_string(),
                argument: "notes/todo.txt",
            })
        );
        assert_eq!(
            parse_command("echo a   b"),
            Some(Command {
                name: "echo".to_string(),
                argument: "a   b",
            })
        );
    }

    #[test]
    fn unknown_command_echoes_the_original_input() {
        let mut harness = Harness::new();
        assert_eq!(harness.run("Foo Bar"), Effect::None);
        assert_eq!(harness.texts(), vec!["bash: command not found: Foo Bar"]);
        assert_eq!(harness.out.last().map(|line| line.kind), Some(LineKind::Error));
    }

    #[test]
    fn command_names_match_case_insensitively() {
        let mut harness = Harness::new();
        harness.run("WhoAmI");
        assert_eq!(harness.texts(), vec!["You are the operator. I am the machine."]);
    }

    #[test]
    fn help_lists_every_command_in_registration_order() {
        let mut harness = Harness::new();
        harness.run("help");
        let texts = harness.texts();
        assert_eq!(texts[0], "Available commands:");
        assert_eq!(texts.len(), harness.interpreter.registry().len() + 1);
        assert_eq!(texts[1], "    help      - Show this help message.");
        assert_eq!(texts[13], "    matrix    - Take the red pill.");
    }

    #[test]
    fn ls_marks_directories() {
        let mut harness = Harness::new();
        harness.run("ls");
        assert_eq!(
            harness.texts(),
            vec!["about.txt  skills.json  contact.txt  projects/  notes/"]
        );
    }

    #[test]
    fn cd_into_a_directory_and_back() {
        let mut harness = Harness::new();
        harness.run("cd projects/");
        assert_eq!(harness.state.path, VfsPath::from_segments(["projects"]));
        harness.run("cd ..");
        assert_eq!(harness.state.path, VfsPath::root());
        harness.run("cd ..");
        assert_eq!(harness.state.path, VfsPath::root());
        assert!(harness.texts().is_empty());
    }

    #[test]
    fn cd_rejects_files_and_missing_names() {
        let mut harness = Harness::new();
        harness.run("cd about.txt");
        harness.run("cd nowhere");
        assert_eq!(
            harness.texts(),
            vec![
                "cd: about.txt: No such file or directory",
                "cd: nowhere: No such file or directory",
            ]
        );
        assert_eq!(harness.state.path, VfsPath::root());
    }

    #[test]
    fn cd_home_returns_to_root() {
        let mut harness = Harness::new();
        harness.run("cd notes");
        harness.run("cd ~");
        assert!(harness.state.path.is_root());
        harness.run("cd notes");
        harness.run("cd");
        assert!(harness.state.path.is_root());
    }

    #[test]
    fn cat_prints_file_content_verbatim() {
        let mut harness = Harness::new();
        let expected = Vfs::get_file(harness.vfs.root(), "contact.txt")
            .expect("contact file")
            .to_string();
        harness.run("cat contact.txt");
        assert_eq!(harness.texts(), vec![expected.clone()]);
        assert_eq!(
            harness.out.last().map(|line| line.kind),
            Some(LineKind::Preformatted)
        );

        harness.run("cd notes");
        harness.run("cat ~/contact.txt");
        assert_eq!(harness.texts().last(), Some(&expected));
    }

    #[test]
    fn cat_reaches_one_level_down() {
        let mut harness = Harness::new();
        harness.run("cat notes/todo.txt");
        harness.run("cat ~/projects/ofo-shell.txt");
        let texts = harness.texts();
        assert!(texts[0].starts_with("- finish the matrix effect"));
        assert!(texts[1].starts_with("ofo-shell"));
    }

    #[test]
    fn cat_errors_are_exclusive() {
        let mut harness = Harness::new();
        harness.run("cat projects");
        harness.run("cat ghost.txt");
        harness.run("cat");
        harness.run("cat ~");
        assert_eq!(
            harness.texts(),
            vec![
                "cat: projects: Is a directory",
                "cat: ghost.txt: No such file or directory",
                "cat: missing operand",
                "cat: ~: Is a directory",
            ]
        );
    }

    #[test]
    fn projects_lists_actionable_links() {
        let mut harness = Harness::new();
        harness.run("projects");
        let actions: Vec<String> = harness
            .out
            .lines()
            .flat_map(|line| line.actions().map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert_eq!(
            actions,
            vec![
                "cat ~/projects/ofo-shell.txt",
                "cat ~/projects/mail-relay.txt",
                "cat ~/projects/habit-tracker.txt",
            ]
        );
    }

    #[test]
    fn skills_prints_one_line_per_category_in_file_order() {
        let mut harness = Harness::new();
        harness.run("skills");
        assert_eq!(
            harness.texts(),
            vec![
                "languages: Rust, TypeScript, Python, Go, SQL",
                "backend: PostgreSQL, Redis, gRPC, REST",
                "frontend: React, HTML/CSS, Web Audio",
                "tooling: Git, Docker, Linux, CI/CD",
            ]
        );
    }

    #[test]
    fn date_uses_rfc_2822() {
        let mut harness = Harness::new();
        harness.run("date");
        assert_eq!(harness.texts(), vec!["Tue, 05 Mar 2024 14:07:09 +0000"]);
    }

    #[test]
    fn contact_enters_the_guided_form() {
        let mut harness = Harness::new();
        harness.run("contact");
        assert!(matches!(harness.state.mode, Mode::GuidedForm(_)));
        assert_eq!(harness.texts().len(), 1);
    }

    #[test]
    fn deferred_commands_return_effects() {
        let mut harness = Harness::new();
        assert_eq!(harness.run("reboot"), Effect::Reboot);
        assert_eq!(harness.run("matrix"), Effect::Matrix);
        assert_eq!(harness.run(""), Effect::None);
        assert!(harness.texts().is_empty());
    }

    #[test]
    fn clear_empties_the_surface() {
        let mut harness = Harness::new();
        harness.run("whoami");
        harness.run("clear");
        assert!(harness.texts().is_empty());
        assert_eq!(harness.out.clear_count(), 1);
    }
}
