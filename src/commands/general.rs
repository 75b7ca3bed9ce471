//! General REPL commands (help, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

fn print_help() {
    println!("{}", "🃏 Tonecard Help".bold());
    println!("{}", "================".bold());
    println!();
    println!("{}", "Playing:".green());
    println!("  {}            - Show your hand", "hand".cyan());
    println!("  {}    - Toggle cards by position, e.g. select 1 3 5", "select <n..>".cyan());
    println!("  {}           - Deselect everything", "clear".cyan());
    println!("  {}            - Score the selected cards and draw replacements", "play".cyan());
    println!("  {}        - Draw extra cards (default 1)", "draw [n]".cyan());
    println!("  {}            - Order the hand by pitch", "sort".cyan());
    println!("  {}            - Cards left in the deck", "deck".cyan());
    println!();
    println!("{}", "Keys:".green());
    println!("  {}    - Show or change the key (Bb, D dorian, chromatic)", "key [name]".cyan());
    println!("  {}           - Notes of the current key", "scale".cyan());
    println!(
        "  {} - Every mode of the key, or of its melodic/harmonic minor",
        "modes [kind]".cyan()
    );
    println!();
    println!("{}", "Scoring:".green());
    println!("  {}          - Score multipliers", "scores".cyan());
    println!("  {} - last-declared or highest-score", "strategy [name]".cyan());
    println!("  {} - Analyze any notes, e.g. analyze C4 E4 G4", "analyze <notes..>".cyan());
    println!("  {}  - Sound played hands", "audio on|off".cyan());
    println!();
    println!("  {} / {}     - Leave", "quit".red(), "exit".red());
}
