//! Command registry for REPL commands
//!
//! Every line typed at the prompt is matched against the registered prefixes,
//! longest first, and handed to that command with the rest of the line.

pub mod game;
pub mod general;

use crate::presenter::TerminalPresenter;
use rand::rngs::StdRng;
use tonecard_core::{GameSession, ScoreTable, SelectionStrategy};

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No command matched the line
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Everything a command can read or change
pub struct CommandContext {
    pub session: GameSession,
    pub rng: StdRng,
    pub strategy: SelectionStrategy,
    pub table: ScoreTable,
    pub presenter: TerminalPresenter,
    /// Running total across plays
    pub total_score: u32,
    pub plays: u32,
}

impl CommandContext {
    pub fn new(
        session: GameSession,
        rng: StdRng,
        strategy: SelectionStrategy,
        table: ScoreTable,
        presenter: TerminalPresenter,
    ) -> Self {
        Self {
            session,
            rng,
            strategy,
            table,
            presenter,
            total_score: 0,
            plays: 0,
        }
    }

    /// Replace the session with whatever `f` makes of it
    pub fn update_session(&mut self, f: impl FnOnce(GameSession, &mut StdRng) -> GameSession) {
        let session = self.session.clone();
        self.session = f(session, &mut self.rng);
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                log::debug!("command {:?} args {:?}", prefix, args);
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("hand", game::cmd_hand);
    registry.register("select", game::cmd_select);
    registry.register("clear", game::cmd_clear);
    registry.register("play", game::cmd_play);
    registry.register("draw", game::cmd_draw);
    registry.register("sort", game::cmd_sort);
    registry.register("deck", game::cmd_deck);
    registry.register("key", game::cmd_key);
    registry.register("scale", game::cmd_scale);
    registry.register("modes", game::cmd_modes);
    registry.register("scores", game::cmd_scores);
    registry.register("strategy", game::cmd_strategy);
    registry.register("analyze", game::cmd_analyze);
    registry.register("audio", game::cmd_audio);

    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io;
    use tonecard_core::{Scale, SessionSettings};

    /// A context in `key` with a seeded deck and no audio
    pub(crate) fn context(key: &str) -> CommandContext {
        let mut rng = StdRng::seed_from_u64(42);
        let scale = Scale::parse(key).unwrap();
        let session = GameSession::new(scale, SessionSettings::default(), &mut rng);
        CommandContext::new(
            session,
            rng,
            SelectionStrategy::default(),
            ScoreTable::default(),
            TerminalPresenter::with_writer(Box::new(io::sink()), None),
        )
    }

    #[test]
    fn test_longest_prefix_wins() {
        fn short(_: &str, _: &mut CommandContext) -> CommandResult {
            CommandResult::Message("short".into())
        }
        fn long(args: &str, _: &mut CommandContext) -> CommandResult {
            CommandResult::Message(format!("long {}", args))
        }

        let mut registry = CommandRegistry::new();
        registry.register("key", short);
        registry.register("key list", long);

        let mut ctx = context("C");
        assert_eq!(
            registry.execute("key list all", &mut ctx),
            CommandResult::Message("long all".into())
        );
        assert_eq!(registry.execute("key", &mut ctx), CommandResult::Message("short".into()));
        assert_eq!(registry.execute("keys", &mut ctx), CommandResult::NotACommand);
    }

    #[test]
    fn test_registry_has_every_command() {
        let registry = create_registry();
        let commands = registry.list_commands();
        for name in [
            "hand", "select", "clear", "play", "draw", "sort", "deck", "key", "scale", "modes",
            "scores", "strategy", "analyze", "audio", "help", "quit", "exit",
        ] {
            assert!(commands.contains(&name), "{}", name);
        }
    }

    #[test]
    fn test_quit_and_unknown() {
        let registry = create_registry();
        let mut ctx = context("C");
        assert_eq!(registry.execute("quit", &mut ctx), CommandResult::Exit);
        assert_eq!(registry.execute("exit", &mut ctx), CommandResult::Exit);
        assert_eq!(registry.execute("dance", &mut ctx), CommandResult::NotACommand);
    }
}
