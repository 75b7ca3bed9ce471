//! Reducing an analysis to one scored hand type.

use crate::analysis::{HandAnalysis, OctaveKind};
use crate::error::TheoryError;
use std::fmt;
use std::str::FromStr;

/// The hand type a play is scored as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    HighNote,
    Octaves,
    Intervals,
    Triads,
    Sevenths,
    Scales,
}

impl Category {
    /// Key into the multiplier table
    pub fn key(&self) -> &'static str {
        match self {
            Category::HighNote => "highnote",
            Category::Octaves => "octaves",
            Category::Intervals => "intervals",
            Category::Triads => "triads",
            Category::Sevenths => "sevenths",
            Category::Scales => "scales",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::HighNote => "High Note",
            Category::Octaves => "Octaves",
            Category::Intervals => "Intervals",
            Category::Triads => "Triads",
            Category::Sevenths => "Sevenths",
            Category::Scales => "Scales",
        };
        write!(f, "{}", name)
    }
}

/// Per-category score multipliers.
///
/// `stacked`, `flush` and `bonus` have no detector yet but are kept so a
/// configured table round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreTable {
    pub highnote: u32,
    pub intervals: u32,
    pub octaves: u32,
    pub stacked: u32,
    pub triads: u32,
    pub sevenths: u32,
    pub scales: u32,
    pub flush: u32,
    pub bonus: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        ScoreTable {
            highnote: 1,
            intervals: 2,
            octaves: 3,
            stacked: 4,
            triads: 5,
            sevenths: 6,
            scales: 7,
            flush: 8,
            bonus: 10,
        }
    }
}

impl ScoreTable {
    /// Every multiplier by name, lowest first
    pub fn entries(&self) -> [(&'static str, u32); 9] {
        [
            ("highnote", self.highnote),
            ("intervals", self.intervals),
            ("octaves", self.octaves),
            ("stacked", self.stacked),
            ("triads", self.triads),
            ("sevenths", self.sevenths),
            ("scales", self.scales),
            ("flush", self.flush),
            ("bonus", self.bonus),
        ]
    }

    /// Look up a multiplier by name. `unison` is an alias for `highnote`.
    pub fn multiplier(&self, name: &str) -> Option<u32> {
        let name = name.to_ascii_lowercase();
        let name = if name == "unison" { "highnote" } else { name.as_str() };
        self.entries()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn for_category(&self, category: Category) -> u32 {
        match category {
            Category::HighNote => self.highnote,
            Category::Octaves => self.octaves,
            Category::Intervals => self.intervals,
            Category::Triads => self.triads,
            Category::Sevenths => self.sevenths,
            Category::Scales => self.scales,
        }
    }
}

/// How the scored category is picked from a full analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SelectionStrategy {
    /// The last populated slot in octaves, intervals, triads, sevenths, scales order
    #[default]
    LastDeclared,
    /// The category worth the most points; ties go to the later category
    HighestScore,
}

impl SelectionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionStrategy::LastDeclared => "last-declared",
            SelectionStrategy::HighestScore => "highest-score",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SelectionStrategy {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "last-declared" | "last" => Ok(SelectionStrategy::LastDeclared),
            "highest-score" | "highest" => Ok(SelectionStrategy::HighestScore),
            other => Err(TheoryError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Populated categories in declaration order
fn populated(analysis: &HandAnalysis) -> Vec<Category> {
    let mut found = Vec::new();
    if let Some(octaves) = &analysis.octaves {
        found.push(match octaves.kind {
            OctaveKind::Octave => Category::Octaves,
            OctaveKind::HighNote => Category::HighNote,
        });
    }
    if analysis.intervals.is_some() {
        found.push(Category::Intervals);
    }
    if analysis.triads.is_some() {
        found.push(Category::Triads);
    }
    if analysis.sevenths.is_some() {
        found.push(Category::Sevenths);
    }
    if analysis.scales.is_some() {
        found.push(Category::Scales);
    }
    found
}

/// The last populated category, so scales beat sevenths beat triads and so on
pub fn choose_top_category(analysis: &HandAnalysis) -> Option<Category> {
    populated(analysis).last().copied()
}

/// Points for `category`; 0 when the analysis has nothing in that slot
pub fn calculate_score(category: Category, analysis: &HandAnalysis, table: &ScoreTable) -> u32 {
    let multiplier = table.for_category(category);
    let units: usize = match category {
        Category::HighNote | Category::Octaves => analysis
            .octaves
            .as_ref()
            .map_or(0, |o| o.matches.iter().map(|m| m.count).sum()),
        Category::Intervals => analysis
            .intervals
            .as_ref()
            .map_or(0, |found| found.iter().map(|m| m.weight).sum()),
        Category::Triads => analysis
            .triads
            .as_ref()
            .map_or(0, |found| found.iter().map(|m| m.cards.len()).sum()),
        Category::Sevenths => analysis
            .sevenths
            .as_ref()
            .map_or(0, |found| found.iter().map(|m| m.cards.len()).sum()),
        Category::Scales => analysis
            .scales
            .as_ref()
            .and_then(|found| found.last())
            .map_or(0, |m| m.count()),
    };
    units as u32 * multiplier
}

/// Labels of the matches in one category
pub fn category_labels(category: Category, analysis: &HandAnalysis) -> Vec<String> {
    match category {
        Category::HighNote | Category::Octaves => {
            analysis.octaves.as_ref().map(|o| o.labels()).unwrap_or_default()
        }
        Category::Intervals => analysis
            .intervals
            .iter()
            .flatten()
            .map(|m| m.label())
            .collect(),
        Category::Triads => analysis.triads.iter().flatten().map(|m| m.label()).collect(),
        Category::Sevenths => analysis.sevenths.iter().flatten().map(|m| m.label()).collect(),
        Category::Scales => analysis
            .scales
            .iter()
            .flatten()
            .map(|m| m.label.clone())
            .collect(),
    }
}

/// The scored outcome of one hand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandScore {
    pub category: Option<Category>,
    pub score: u32,
    pub labels: Vec<String>,
}

/// Pick a category with `strategy` and score it
pub fn score_hand(
    analysis: &HandAnalysis,
    strategy: SelectionStrategy,
    table: &ScoreTable,
) -> HandScore {
    let category = match strategy {
        SelectionStrategy::LastDeclared => choose_top_category(analysis),
        SelectionStrategy::HighestScore => populated(analysis)
            .into_iter()
            .map(|c| (c, calculate_score(c, analysis, table)))
            .fold(None, |best: Option<(Category, u32)>, (c, score)| match best {
                Some((_, top)) if top > score => best,
                _ => Some((c, score)),
            })
            .map(|(c, _)| c),
    };

    match category {
        Some(category) => {
            let score = calculate_score(category, analysis, table);
            log::debug!("hand scored as {} for {} ({})", category, score, strategy);
            HandScore {
                category: Some(category),
                score,
                labels: category_labels(category, analysis),
            }
        }
        None => HandScore::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_hand, GameContext};
    use crate::types::card::Card;

    fn analyze(key: &str, specs: &[(&str, u8)]) -> HandAnalysis {
        let cards: Vec<Card> = specs.iter().map(|(r, o)| Card::new(*r, *o)).collect();
        analyze_hand(&cards, &GameContext::from_key(key).unwrap())
    }

    #[test]
    fn test_multiplier_lookup() {
        let table = ScoreTable::default();
        assert_eq!(table.multiplier("highnote"), Some(1));
        assert_eq!(table.multiplier("Unison"), Some(1));
        assert_eq!(table.multiplier("scales"), Some(7));
        assert_eq!(table.multiplier("bonus"), Some(10));
        assert_eq!(table.multiplier("nothing"), None);
        assert_eq!(table.for_category(Category::Sevenths), 6);
    }

    #[test]
    fn test_empty_analysis_scores_zero() {
        let analysis = HandAnalysis::default();
        assert_eq!(choose_top_category(&analysis), None);
        let score = score_hand(&analysis, SelectionStrategy::LastDeclared, &ScoreTable::default());
        assert_eq!(score, HandScore::default());
        assert_eq!(
            calculate_score(Category::Triads, &analysis, &ScoreTable::default()),
            0
        );
    }

    #[test]
    fn test_high_note_scores_one() {
        let analysis = analyze("C", &[("A", 4)]);
        let score = score_hand(&analysis, SelectionStrategy::LastDeclared, &ScoreTable::default());
        assert_eq!(score.category, Some(Category::HighNote));
        assert_eq!(score.score, 1);
        assert_eq!(score.labels, vec!["A4"]);
    }

    #[test]
    fn test_octaves_count_top_entries() {
        let analysis = analyze("C", &[("C", 1), ("C", 2), ("C", 3)]);
        assert_eq!(choose_top_category(&analysis), Some(Category::Octaves));
        assert_eq!(calculate_score(Category::Octaves, &analysis, &ScoreTable::default()), 9);
    }

    #[test]
    fn test_last_declared_prefers_later_slots() {
        // C E G: octaves (high note), intervals and a triad
        let analysis = analyze("C", &[("C", 4), ("E", 4), ("G", 4)]);
        assert_eq!(choose_top_category(&analysis), Some(Category::Triads));

        let score = score_hand(&analysis, SelectionStrategy::LastDeclared, &ScoreTable::default());
        assert_eq!(score.score, 15);
        assert_eq!(score.labels, vec!["C Major Triad"]);
    }

    #[test]
    fn test_scales_score_last_match() {
        let analysis = analyze(
            "C",
            &[("C", 4), ("D", 4), ("E", 4), ("F", 4), ("G", 4), ("A", 4), ("B", 4)],
        );
        assert_eq!(choose_top_category(&analysis), Some(Category::Scales));
        assert_eq!(calculate_score(Category::Scales, &analysis, &ScoreTable::default()), 49);
    }

    #[test]
    fn test_highest_score_strategy() {
        // C E G B holds two triads, C major and E minor
        let analysis = analyze("C", &[("C", 4), ("E", 4), ("G", 4), ("B", 4)]);
        let table = ScoreTable::default();
        let last = score_hand(&analysis, SelectionStrategy::LastDeclared, &table);
        assert_eq!(last.category, Some(Category::Sevenths));
        assert_eq!(last.score, 24);

        assert_eq!(calculate_score(Category::Intervals, &analysis, &table), 24);

        let best = score_hand(&analysis, SelectionStrategy::HighestScore, &table);
        assert_eq!(best.category, Some(Category::Triads));
        assert_eq!(best.score, 30);
        assert_eq!(best.labels, vec!["C Major Triad", "E Minor Triad"]);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "highest".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::HighestScore
        );
        assert_eq!(
            "last_declared".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::LastDeclared
        );
        assert!("random".parse::<SelectionStrategy>().is_err());
    }
}
