//! REPL (Read-Eval-Print Loop) for the Tonecard game

use crate::audio::{AudioEvent, Performer};
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::config::Config;
use crate::presenter::TerminalPresenter;
use anyhow::Result;
use colored::*;
use crossbeam_channel::{never, unbounded, Receiver, RecvError, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::thread;
use tonecard_core::GameSession;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Whichever channel fired first
enum LoopEvent {
    Input(Result<ReplEvent, RecvError>),
    Audio(Result<AudioEvent, RecvError>),
}

/// What the loop should do after a line
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive REPL for the Tonecard game
pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    ctx: CommandContext,

    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    rx_audio: Receiver<AudioEvent>,
}

impl Repl {
    /// Create a new REPL instance from the loaded configuration
    pub fn new(config: &Config) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;

        let (performer, rx_audio) = if config.audio_enabled() {
            let (performer, events) = Performer::spawn(config.performance_settings());
            (Some(performer), events)
        } else {
            (None, never())
        };

        let mut rng = StdRng::from_entropy();
        let session = GameSession::new(config.default_scale(), config.session_settings(), &mut rng);
        let ctx = CommandContext::new(
            session,
            rng,
            config.strategy(),
            config.score_table(),
            TerminalPresenter::new(performer),
        );

        let (tx_input, rx_input) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            registry: create_registry(),
            ctx,
            tx_input,
            rx_input,
            rx_audio,
        })
    }

    /// Run one line through the command registry and print the result
    fn handle_line(&mut self, line: &str) -> Flow {
        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return Flow::Exit,
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::NotACommand => {
                println!(
                    "{} unknown command '{}', try {}",
                    "Error:".bright_red().bold(),
                    line,
                    "help".bright_green()
                );
            }
        }
        Flow::Continue
    }

    fn goodbye(&self) {
        println!(
            "{} {} in {} play(s) 🃏",
            "Goodbye!".bright_cyan(),
            self.ctx.total_score.to_string().yellow().bold(),
            self.ctx.plays
        );
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🃏".bright_yellow(),
            "Tonecard".bright_cyan().bold()
        );
        println!(
            "Playing in {}. Type {} for commands, {} or {} to leave.",
            self.ctx.session.scale().name().cyan(),
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );
        self.handle_line("hand");

        // Move editor to thread
        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow::anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "tonecard>".bright_magenta().bold());
            let readline = editor.readline(&prompt);

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        let rx_input = self.rx_input.clone();
        let mut rx_audio = self.rx_audio.clone();

        loop {
            let event = crossbeam_channel::select! {
                recv(rx_input) -> msg => LoopEvent::Input(msg),
                recv(rx_audio) -> msg => LoopEvent::Audio(msg),
            };

            match event {
                LoopEvent::Input(Ok(ReplEvent::Input(Ok(line)))) => {
                    if line.is_empty() {
                        continue;
                    }
                    if self.handle_line(&line) == Flow::Exit {
                        self.goodbye();
                        break;
                    }
                }
                LoopEvent::Input(Ok(ReplEvent::Input(Err(
                    ReadlineError::Interrupted | ReadlineError::Eof,
                )))) => {
                    self.goodbye();
                    break;
                }
                LoopEvent::Input(Ok(ReplEvent::Input(Err(err)))) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                    break;
                }
                LoopEvent::Input(Err(_)) => break, // Channel closed
                LoopEvent::Audio(Ok(AudioEvent::Unavailable(reason))) => {
                    self.ctx.presenter.set_audio(false);
                    println!("{} {}", "Audio off:".yellow(), reason);
                }
                // Performer gone; stop listening to it
                LoopEvent::Audio(Err(_)) => rx_audio = never(),
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start(config: &Config) -> Result<()> {
    let mut repl =
        Repl::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
