//! Turning a play into text and sound for whatever front end is attached.

use crate::analysis::{HandAnalysis, OctaveKind};
use crate::scoring::{Category, HandScore};
use crate::session::PlayOutcome;
use crate::types::card::Card;
#[cfg(feature = "colored")]
use colored::*;
use std::fmt;

/// Human-readable summary of a scored hand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandReport {
    pub category: Option<Category>,
    pub score: u32,
    /// Labels of the matches in the scored category
    pub labels: Vec<String>,
    /// One line per populated analysis slot, e.g. "2 octave of C"
    pub lines: Vec<String>,
}

impl HandReport {
    pub fn new(analysis: &HandAnalysis, score: &HandScore) -> Self {
        HandReport {
            category: score.category,
            score: score.score,
            labels: score.labels.clone(),
            lines: describe(analysis),
        }
    }
}

impl From<&PlayOutcome> for HandReport {
    fn from(outcome: &PlayOutcome) -> Self {
        HandReport::new(&outcome.analysis, &outcome.score)
    }
}

fn joined<I: IntoIterator<Item = String>>(labels: I) -> String {
    labels.into_iter().collect::<Vec<_>>().join(", ")
}

/// Describe every populated slot of an analysis
pub fn describe(analysis: &HandAnalysis) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(octaves) = &analysis.octaves {
        match octaves.kind {
            OctaveKind::Octave => {
                let count = octaves.matches.first().map_or(0, |m| m.count);
                lines.push(format!("{} octave of {}", count, joined(octaves.labels())));
            }
            OctaveKind::HighNote => {
                lines.push(format!("High note of {}", joined(octaves.labels())));
            }
        }
    }
    if let Some(intervals) = &analysis.intervals {
        lines.push(format!(
            "Intervals of {}",
            joined(intervals.iter().map(|m| format!("{} x{}", m.interval.symbol(), m.pairs.len())))
        ));
    }
    if let Some(triads) = &analysis.triads {
        lines.push(format!("Triads of {}", joined(triads.iter().map(|m| m.label()))));
    }
    if let Some(sevenths) = &analysis.sevenths {
        lines.push(format!("Sevenths of {}", joined(sevenths.iter().map(|m| m.label()))));
    }
    if let Some(scales) = &analysis.scales {
        lines.push(format!("Scales of {}", joined(scales.iter().map(|m| m.label.clone()))));
    }
    lines
}

#[cfg(feature = "colored")]
impl fmt::Display for HandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => writeln!(
                f,
                "{} {} {}",
                category.to_string().green().bold(),
                "for".bright_black(),
                self.score.to_string().yellow().bold()
            )?,
            None => writeln!(f, "{}", "Nothing to score".bright_black())?,
        }
        for line in &self.lines {
            writeln!(f, "  {}", line.cyan())?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl fmt::Display for HandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => writeln!(f, "{} for {}", category, self.score)?,
            None => writeln!(f, "Nothing to score")?,
        }
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// One note to sound when a hand is played
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformedNote {
    pub name: String,
    pub octave: u8,
    pub frequency: f32,
}

/// Notes to sound for `cards`, in play order. Cards without a pitch are skipped.
pub fn performance_sequence(cards: &[Card]) -> Vec<PerformedNote> {
    cards
        .iter()
        .filter_map(|card| {
            card.frequency().map(|frequency| PerformedNote {
                name: card.rank.clone(),
                octave: card.octave,
                frequency,
            })
        })
        .collect()
}

/// A front end that shows reports and sounds performances
pub trait Presenter {
    fn present_report(&mut self, report: &HandReport);

    fn present_performance(&mut self, notes: &[PerformedNote]);

    /// Show the report, then sound the played cards
    fn present_play(&mut self, outcome: &PlayOutcome) {
        self.present_report(&HandReport::from(outcome));
        self.present_performance(&performance_sequence(&outcome.played));
    }
}
