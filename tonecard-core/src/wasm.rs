//! WASM bindings for tonecard-core
//!
//! Exposes hand analysis and scale building to JavaScript. Results are plain
//! objects with a `success` flag; errors come back as a message, never a throw.

use crate::analysis::{self, GameContext, HandAnalysis};
use crate::catalog::{build_mode_table, ModeEntry};
use crate::presentation::HandReport;
use crate::scoring::{score_hand, HandScore, ScoreTable, SelectionStrategy};
use crate::types::card::Card;
use crate::types::key::build_major_scale;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub key: String,
    pub analysis: Option<HandAnalysis>,
    pub score: Option<HandScore>,
    pub report: Option<HandReport>,
    pub error: Option<String>,
}

impl AnalysisResult {
    fn failure(key: &str, error: String) -> Self {
        AnalysisResult {
            success: false,
            key: key.to_string(),
            analysis: None,
            score: None,
            report: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScaleResult {
    pub success: bool,
    pub notes: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModeTableResult {
    pub success: bool,
    pub modes: Vec<ModeEntry>,
    pub error: Option<String>,
}

/// Analyze and score a hand.
///
/// `cards` is an array of `{ rank, octave }` objects; `key` is any key name
/// the engine accepts ("A", "D dorian", "chromatic").
#[wasm_bindgen]
pub fn analyze_hand(cards: JsValue, key: &str) -> JsValue {
    let result = match serde_wasm_bindgen::from_value::<Vec<Card>>(cards) {
        Err(e) => AnalysisResult::failure(key, format!("Invalid cards: {}", e)),
        Ok(cards) => match GameContext::from_key(key) {
            Err(e) => AnalysisResult::failure(key, e.to_string()),
            Ok(context) => {
                let analysis = analysis::analyze_hand(&cards, &context);
                let score =
                    score_hand(&analysis, SelectionStrategy::default(), &ScoreTable::default());
                let report = HandReport::new(&analysis, &score);
                AnalysisResult {
                    success: true,
                    key: context.key_label,
                    analysis: Some(analysis),
                    score: Some(score),
                    report: Some(report),
                    error: None,
                }
            }
        },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// The major scale of `key`
#[wasm_bindgen]
pub fn major_scale(key: &str) -> JsValue {
    let result = match build_major_scale(key) {
        Ok(notes) => ScaleResult {
            success: true,
            notes,
            error: None,
        },
        Err(e) => ScaleResult {
            success: false,
            notes: vec![],
            error: Some(e.to_string()),
        },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// The seven modes of `key` with their seventh chords
#[wasm_bindgen]
pub fn mode_table(key: &str) -> JsValue {
    let result = match build_mode_table(key) {
        Ok(modes) => ModeTableResult {
            success: true,
            modes,
            error: None,
        },
        Err(e) => ModeTableResult {
            success: false,
            modes: vec![],
            error: Some(e.to_string()),
        },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn chromatic_scale() -> JsValue {
    serde_wasm_bindgen::to_value(&crate::types::pitch::chromatic_scale()).unwrap_or(JsValue::NULL)
}
