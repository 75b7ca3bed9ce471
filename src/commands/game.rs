//! Game commands: the hand, the key and scoring

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use tonecard_core::scoring::score_hand;
use tonecard_core::types::ScaleKind;
use tonecard_core::{
    analyze_hand, build_mode_table, build_mode_table_for, create_harmonic_structure, Card,
    HandReport, PitchClass, Presenter, Scale, SelectionStrategy,
};

const DEFAULT_OCTAVE: u8 = 4;

/// Parse a card such as `C#4`, `Bb2` or `E` (octave 4)
pub fn parse_card(text: &str) -> Result<Card, String> {
    let text = text.trim();
    let split = text
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(text.len());
    let (rank, octave) = text.split_at(split);

    let mut letters = rank.chars();
    let rank: String = match letters.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + letters.as_str(),
        None => return Err(format!("'{}' has no note name", text)),
    };
    PitchClass::from_name(&rank).map_err(|e| e.to_string())?;

    let octave = if octave.is_empty() {
        DEFAULT_OCTAVE
    } else {
        match octave.parse::<u8>() {
            Ok(o) if (1..=8).contains(&o) => o,
            _ => return Err(format!("'{}' is not an octave between 1 and 8", octave)),
        }
    };
    Ok(Card::new(rank, octave))
}

/// Parse 1-based hand positions into indices
fn parse_positions(args: &str) -> Result<Vec<usize>, String> {
    args.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("'{}' is not a card position", s)),
        })
        .collect()
}

fn format_hand(ctx: &CommandContext) -> String {
    let session = &ctx.session;
    let cards: Vec<String> = session
        .hand()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let label = format!("{}:{}", i + 1, card);
            if session.is_selected(card) {
                label.bright_yellow().bold().to_string()
            } else {
                label
            }
        })
        .collect();

    let selected: Vec<String> = session.selected().iter().map(|c| c.to_string()).collect();
    format!(
        "{} {}\n{} {}",
        "Hand:".green(),
        cards.join("  "),
        "Selected:".green(),
        if selected.is_empty() {
            "none".bright_black().to_string()
        } else {
            selected.join(" ")
        }
    )
}

/// Handle `hand`
pub fn cmd_hand(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(format_hand(ctx))
}

/// Handle `select <n..>`. Either every position toggles or none does.
pub fn cmd_select(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: select <n..>".to_string());
    }
    let positions = match parse_positions(args) {
        Ok(p) => p,
        Err(e) => return CommandResult::Error(e),
    };

    let mut next = ctx.session.clone();
    for index in positions {
        next = match next.toggle_select(index) {
            Ok(session) => session,
            Err(e) => return CommandResult::Error(e.to_string()),
        };
    }
    ctx.session = next;
    CommandResult::Message(format_hand(ctx))
}

/// Handle `clear`
pub fn cmd_clear(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.update_session(|session, _| session.clear_selection());
    CommandResult::Success
}

/// Handle `play`
pub fn cmd_play(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if ctx.session.selected().is_empty() {
        return CommandResult::Error("Select cards first with `select <n..>`".to_string());
    }

    let (session, outcome) = ctx
        .session
        .clone()
        .play(&mut ctx.rng, ctx.strategy, &ctx.table);
    ctx.session = session;
    ctx.presenter.present_play(&outcome);

    ctx.total_score += outcome.score.score;
    ctx.plays += 1;
    log::info!(
        "play {}: {} card(s), {} point(s)",
        ctx.plays,
        outcome.played.len(),
        outcome.score.score
    );

    let mut message = format!(
        "{} {} after {} play(s)",
        "Total:".green(),
        ctx.total_score.to_string().yellow().bold(),
        ctx.plays
    );
    if outcome.drawn.len() < outcome.played.len() {
        message.push_str(&format!("\n{}", "The deck is empty".bright_black()));
    }
    CommandResult::Message(message)
}

/// Handle `draw [n]`
pub fn cmd_draw(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let count = if args.is_empty() {
        1
    } else {
        match args.parse::<usize>() {
            Ok(n) => n,
            Err(_) => return CommandResult::Error(format!("'{}' is not a number", args)),
        }
    };

    let (session, drawn) = ctx.session.clone().draw(count, &mut ctx.rng);
    ctx.session = session;
    if drawn.is_empty() {
        return CommandResult::Error("The deck is empty".to_string());
    }
    let drawn: Vec<String> = drawn.iter().map(|c| c.to_string()).collect();
    CommandResult::Message(format!("{} {}", "Drew".green(), drawn.join(" ")))
}

/// Handle `sort`
pub fn cmd_sort(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.update_session(|session, _| session.sort_hand());
    CommandResult::Message(format_hand(ctx))
}

/// Handle `deck`
pub fn cmd_deck(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(format!(
        "{} card(s) left in the {} deck",
        ctx.session.deck().len(),
        ctx.session.scale().name()
    ))
}

/// Handle `key [name]`. Changing key deals a fresh deck and hand.
pub fn cmd_key(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Key: {}", ctx.session.scale().name().cyan()));
    }
    match Scale::parse(args) {
        Ok(scale) => {
            let name = scale.name();
            ctx.update_session(|session, rng| session.change_key(scale, rng));
            CommandResult::Message(format!(
                "{} {}\n{}",
                "Key changed to".green(),
                name.cyan().bold(),
                format_hand(ctx)
            ))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `scale`
pub fn cmd_scale(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(ctx.session.scale().to_string())
}

/// Handle `modes [major|melodic|harmonic]`. Minor tables are built on the current tonic.
pub fn cmd_modes(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let scale = ctx.session.scale();
    let (key, tonic) = match scale.kind() {
        ScaleKind::Diatonic { key, .. } => (key.clone(), scale.tonic().to_string()),
        ScaleKind::Chromatic => {
            return CommandResult::Error("The chromatic key has no modes".to_string())
        }
    };
    let table = match args {
        "" | "major" => build_mode_table(&key),
        "melodic" => create_harmonic_structure(&tonic, "melMinorHepta")
            .and_then(|notes| build_mode_table_for(&notes)),
        "harmonic" => create_harmonic_structure(&tonic, "harmMinorHepta")
            .and_then(|notes| build_mode_table_for(&notes)),
        _ => return CommandResult::Error("Usage: modes [major|melodic|harmonic]".to_string()),
    };
    match table {
        Ok(table) => {
            let rows: Vec<String> = table
                .iter()
                .map(|entry| {
                    format!(
                        "{:>10} {:<3} [{}]  {}",
                        entry.mode.to_string().green(),
                        entry.root,
                        entry.scale.join(" "),
                        entry.chord.join(" ").bright_black()
                    )
                })
                .collect();
            CommandResult::Message(rows.join("\n"))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `scores`
pub fn cmd_scores(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let rows: Vec<String> = ctx
        .table
        .entries()
        .iter()
        .map(|(name, value)| format!("  {:<10} x{}", name, value))
        .collect();
    CommandResult::Message(format!(
        "{} ({})\n{}",
        "Multipliers".green(),
        ctx.strategy,
        rows.join("\n")
    ))
}

/// Handle `strategy [name]`
pub fn cmd_strategy(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Strategy: {}", ctx.strategy));
    }
    match args.parse::<SelectionStrategy>() {
        Ok(strategy) => {
            ctx.strategy = strategy;
            CommandResult::Message(format!("{} {}", "Strategy set to".green(), strategy))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `analyze <notes..>`: score any notes in the current key without touching the hand
pub fn cmd_analyze(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: analyze <notes..>, e.g. analyze C4 E4 G4".to_string());
    }
    let cards: Result<Vec<Card>, String> = args
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(parse_card)
        .collect();
    let cards = match cards {
        Ok(cards) => cards,
        Err(e) => return CommandResult::Error(e),
    };

    let analysis = analyze_hand(&cards, ctx.session.context());
    let score = score_hand(&analysis, ctx.strategy, &ctx.table);
    ctx.presenter.present_report(&HandReport::new(&analysis, &score));
    CommandResult::Success
}

/// Handle `audio on|off`
pub fn cmd_audio(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let wanted = match args {
        "" => {
            let state = if ctx.presenter.audio_enabled() { "on" } else { "off" };
            return CommandResult::Message(format!("Audio is {}", state));
        }
        "on" => true,
        "off" => false,
        _ => return CommandResult::Error("Usage: audio on|off".to_string()),
    };

    if ctx.presenter.set_audio(wanted) == wanted {
        CommandResult::Message(format!("Audio {}", args))
    } else {
        CommandResult::Error("No audio output is available".to_string())
    }
}
