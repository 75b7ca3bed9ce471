//! Catalog of harmonic structures.
//!
//! Every structure is a list of leaps beginning with 0. Diatonic leaps count
//! scale positions and wrap at the scale's length; chromatic leaps count
//! semitones and wrap at 12. The heptatonic modes are derived from their step
//! patterns when the catalog is first built.

use crate::error::{Result, TheoryError};
use crate::types::key::{build_major_scale, build_modal_scale, Mode};
use crate::types::pitch::{PitchClass, CHROMATIC_SLOTS};
use std::sync::OnceLock;

/// One step of a scale pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Half,
    Whole,
    /// Augmented second (three half steps)
    WholeAndHalf,
}

impl Step {
    pub fn semitones(self) -> u8 {
        match self {
            Step::Half => 1,
            Step::Whole => 2,
            Step::WholeAndHalf => 3,
        }
    }

    /// Parse a step letter: `W`, `H` or `3H` (case-insensitive)
    pub fn from_letter(letter: &str) -> Option<Step> {
        match letter.trim().to_uppercase().as_str() {
            "W" => Some(Step::Whole),
            "H" => Some(Step::Half),
            "3H" => Some(Step::WholeAndHalf),
            _ => None,
        }
    }
}

use Step::{Half as H, Whole as W, WholeAndHalf as A};

pub const MAJOR_STEPS: [Step; 7] = [W, W, H, W, W, W, H];
pub const MELODIC_MINOR_STEPS: [Step; 7] = [W, H, W, W, W, W, H];
pub const HARMONIC_MINOR_STEPS: [Step; 7] = [W, H, W, W, H, A, H];

const MAJOR_MODE_NAMES: [&str; 7] = [
    "majorHepta",
    "dorianHepta",
    "phrygianHepta",
    "lydianHepta",
    "mixolydianHepta",
    "aeolianHepta",
    "locrianHepta",
];

/// Convert steps to leaps, prefixed with the 0 leap for the root
pub fn convert_step_pattern(pattern: &[Step]) -> Vec<u8> {
    std::iter::once(0)
        .chain(pattern.iter().map(|s| s.semitones()))
        .collect()
}

/// Leaps of the `mode`th rotation of a full-octave step pattern. The closing
/// step back to the octave is implied, so it is dropped.
pub fn rotate_step_pattern(mode: u8, pattern: &[Step]) -> Result<Vec<u8>> {
    let mut rotated = build_modal_scale(pattern, mode)?;
    rotated.pop();
    Ok(convert_step_pattern(&rotated))
}

/// Which space a structure's leaps are measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureSpace {
    Diatonic,
    Chromatic,
}

/// A named interval-leap pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    name: String,
    space: StructureSpace,
    leaps: Vec<u8>,
}

impl Structure {
    fn new(name: impl Into<String>, space: StructureSpace, leaps: Vec<u8>) -> Self {
        Structure {
            name: name.into(),
            space,
            leaps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space(&self) -> StructureSpace {
        self.space
    }

    pub fn leaps(&self) -> &[u8] {
        &self.leaps
    }

    /// Number of members (root included)
    pub fn len(&self) -> usize {
        self.leaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaps.is_empty()
    }

    /// Running totals of the leaps: each member's distance from the root
    pub fn offsets(&self) -> Vec<usize> {
        self.leaps
            .iter()
            .scan(0usize, |total, &leap| {
                *total += leap as usize;
                Some(*total)
            })
            .collect()
    }

    /// Total span covered by the leaps
    pub fn span(&self) -> usize {
        self.leaps.iter().map(|&l| l as usize).sum()
    }

    /// Apply the leaps from `start` over `scale`, wrapping at its length
    pub fn realize<S: AsRef<str>>(&self, start: usize, scale: &[S]) -> Vec<String> {
        if scale.is_empty() {
            return Vec::new();
        }
        self.offsets()
            .into_iter()
            .map(|offset| scale[(start + offset) % scale.len()].as_ref().to_string())
            .collect()
    }
}

/// The two families of structures
#[derive(Debug)]
pub struct Catalog {
    diatonic: Vec<Structure>,
    chromatic: Vec<Structure>,
}

impl Catalog {
    fn build() -> Self {
        use StructureSpace::{Chromatic, Diatonic};

        let diatonic = vec![
            Structure::new("majorHepta", Diatonic, vec![0, 1, 1, 1, 1, 1, 1]),
            Structure::new("majorPenta", Diatonic, vec![0, 1, 1, 2, 1]),
            Structure::new("minorPenta", Diatonic, vec![0, 2, 1, 1, 2]),
            Structure::new("triad", Diatonic, vec![0, 2, 2]),
            Structure::new("seventhChord", Diatonic, vec![0, 2, 2, 2]),
        ];

        let mut chromatic = Vec::new();
        let families: [(&[Step; 7], Option<&str>); 3] = [
            (&MAJOR_STEPS, None),
            (&MELODIC_MINOR_STEPS, Some("melMinorHepta")),
            (&HARMONIC_MINOR_STEPS, Some("harmMinorHepta")),
        ];
        for (steps, base) in families {
            for mode in 1..=7u8 {
                let name = match base {
                    None => MAJOR_MODE_NAMES[mode as usize - 1].to_string(),
                    Some(base) if mode == 1 => base.to_string(),
                    Some(base) => format!("{}Mode{}", base, mode),
                };
                // Rotations of a 7-step pattern by 1..=7 cannot fail
                if let Ok(leaps) = rotate_step_pattern(mode, steps) {
                    chromatic.push(Structure::new(name, Chromatic, leaps));
                }
            }
        }

        let literal: [(&str, &[u8]); 12] = [
            ("majorPenta", &[0, 2, 2, 3, 2]),
            ("minorPenta", &[0, 3, 2, 2, 3]),
            ("majorTriad", &[0, 4, 3]),
            ("majorSeventhChord", &[0, 4, 3, 4]),
            ("minorTriad", &[0, 3, 4]),
            ("minorSeventhChord", &[0, 3, 4, 3]),
            ("dominantSeventhChord", &[0, 4, 3, 3]),
            ("dimTriad", &[0, 3, 3]),
            ("minor7flat5", &[0, 3, 3, 4]),
            ("augTriad", &[0, 4, 4]),
            ("wholeTone", &[0, 2, 2, 2, 2, 2]),
            ("halfWhole", &[0, 1, 2, 1, 2, 1, 2, 1]),
        ];
        chromatic.extend(
            literal
                .iter()
                .map(|(name, leaps)| Structure::new(*name, Chromatic, leaps.to_vec())),
        );

        Catalog {
            diatonic,
            chromatic,
        }
    }

    pub fn diatonic(&self, name: &str) -> Option<&Structure> {
        self.diatonic.iter().find(|s| s.name == name)
    }

    pub fn chromatic(&self, name: &str) -> Option<&Structure> {
        self.chromatic.iter().find(|s| s.name == name)
    }

    pub fn diatonic_structures(&self) -> &[Structure] {
        &self.diatonic
    }

    pub fn chromatic_structures(&self) -> &[Structure] {
        &self.chromatic
    }
}

/// The shared, immutable structure catalog
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::build)
}

/// Realize a diatonic structure starting at scale position `start`
pub fn create_diatonic_structure<S: AsRef<str>>(
    start: usize,
    scale: &[S],
    name: &str,
) -> Result<Vec<String>> {
    let structure = catalog()
        .diatonic(name)
        .ok_or_else(|| TheoryError::UnknownStructure(name.to_string()))?;
    Ok(structure.realize(start, scale))
}

/// Realize a chromatic structure on the chromatic slots, starting at `start_note`
pub fn create_harmonic_structure(start_note: &str, name: &str) -> Result<Vec<String>> {
    let structure = catalog()
        .chromatic(name)
        .ok_or_else(|| TheoryError::UnknownStructure(name.to_string()))?;
    let start = PitchClass::from_name(start_note)?.index() as usize;
    Ok(structure.realize(start, &CHROMATIC_SLOTS))
}

/// One row of a key's mode table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeEntry {
    pub mode: Mode,
    pub root: String,
    pub scale: Vec<String>,
    /// Diatonic seventh chord built on this degree
    pub chord: Vec<String>,
}

/// Every mode of a major key with its root, rotated scale and seventh chord
pub fn build_mode_table(key: &str) -> Result<Vec<ModeEntry>> {
    build_mode_table_for(&build_major_scale(key)?)
}

/// Mode table for any seven-note scale, such as melodic or harmonic minor.
///
/// `mode` numbers the rotation; its name is the major-scale mode at that degree.
pub fn build_mode_table_for<S: AsRef<str>>(scale: &[S]) -> Result<Vec<ModeEntry>> {
    if scale.len() != Mode::ALL.len() {
        return Err(TheoryError::NotHeptatonic(scale.len()));
    }
    let scale: Vec<String> = scale.iter().map(|n| n.as_ref().to_string()).collect();
    Mode::ALL
        .iter()
        .enumerate()
        .map(|(degree, &mode)| {
            Ok(ModeEntry {
                mode,
                root: scale[degree].clone(),
                scale: build_modal_scale(&scale, mode.number())?,
                chord: create_diatonic_structure(degree, &scale, "seventhChord")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_conversion() {
        assert_eq!(convert_step_pattern(&MAJOR_STEPS), vec![0, 2, 2, 1, 2, 2, 2, 1]);
        assert_eq!(Step::from_letter("w"), Some(Step::Whole));
        assert_eq!(Step::from_letter("3H"), Some(Step::WholeAndHalf));
        assert_eq!(Step::from_letter("x"), None);
    }

    #[test]
    fn test_mode_rotation() {
        assert_eq!(rotate_step_pattern(1, &MAJOR_STEPS).unwrap(), vec![0, 2, 2, 1, 2, 2, 2]);
        assert_eq!(rotate_step_pattern(2, &MAJOR_STEPS).unwrap(), vec![0, 2, 1, 2, 2, 2, 1]);
        assert_eq!(rotate_step_pattern(6, &MAJOR_STEPS).unwrap(), vec![0, 2, 1, 2, 2, 1, 2]);
        assert_eq!(
            rotate_step_pattern(1, &HARMONIC_MINOR_STEPS).unwrap(),
            vec![0, 2, 1, 2, 2, 1, 3]
        );
        assert!(rotate_step_pattern(0, &MAJOR_STEPS).is_err());
    }

    #[test]
    fn test_catalog_contents() {
        let catalog = catalog();
        assert_eq!(catalog.diatonic_structures().len(), 5);
        // 21 derived heptatonic modes plus 12 literal tables
        assert_eq!(catalog.chromatic_structures().len(), 33);

        assert_eq!(catalog.chromatic("majorHepta").unwrap().leaps(), &[0, 2, 2, 1, 2, 2, 2]);
        assert_eq!(catalog.chromatic("locrianHepta").unwrap().leaps(), &[0, 1, 2, 2, 1, 2, 2]);
        assert_eq!(catalog.chromatic("melMinorHepta").unwrap().leaps(), &[0, 2, 1, 2, 2, 2, 2]);
        assert!(catalog.chromatic("melMinorHeptaMode7").is_some());
        assert!(catalog.chromatic("harmMinorHeptaMode5").is_some());
        assert!(catalog.chromatic("nonsense").is_none());
    }

    #[test]
    fn test_leaps_start_at_root_and_fit_the_octave() {
        for structure in catalog().chromatic_structures() {
            assert_eq!(structure.leaps()[0], 0, "{}", structure.name());
            assert!(structure.span() < 12, "{}", structure.name());
        }
        for structure in catalog().diatonic_structures() {
            assert_eq!(structure.leaps()[0], 0, "{}", structure.name());
            assert!(structure.span() < 7, "{}", structure.name());
        }
    }

    #[test]
    fn test_heptatonic_closing_step_completes_octave() {
        for structure in catalog()
            .chromatic_structures()
            .iter()
            .filter(|s| s.name().contains("Hepta"))
        {
            assert_eq!(structure.len(), 7, "{}", structure.name());
            let closing = 12 - structure.span();
            assert!((1..=3).contains(&closing), "{}", structure.name());
        }
    }

    #[test]
    fn test_create_diatonic_structure() {
        let c_major = build_major_scale("C").unwrap();
        assert_eq!(
            create_diatonic_structure(0, &c_major, "triad").unwrap(),
            vec!["C", "E", "G"]
        );
        assert_eq!(
            create_diatonic_structure(6, &c_major, "seventhChord").unwrap(),
            vec!["B", "D", "F", "A"]
        );
        assert_eq!(
            create_diatonic_structure(5, &c_major, "minorPenta").unwrap(),
            vec!["A", "C", "D", "E", "G"]
        );
        assert!(create_diatonic_structure(0, &c_major, "nonsense").is_err());
    }

    #[test]
    fn test_create_harmonic_structure() {
        assert_eq!(
            create_harmonic_structure("C", "majorTriad").unwrap(),
            vec!["C", "E/Fb", "G"]
        );
        assert_eq!(
            create_harmonic_structure("Db", "minor7flat5").unwrap(),
            vec!["C#/Db", "E/Fb", "G", "B/Cb"]
        );
        assert_eq!(
            create_harmonic_structure("C", "mixolydianHepta").unwrap(),
            vec!["C", "D", "E/Fb", "F", "G", "A", "A#/Bb"]
        );
        assert!(create_harmonic_structure("H", "majorTriad").is_err());
    }

    #[test]
    fn test_mode_table() {
        let table = build_mode_table("Bb").unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table[0].root, "Bb");
        assert_eq!(table[0].chord, vec!["Bb", "D", "F", "A"]);
        assert_eq!(table[1].mode, Mode::Dorian);
        assert_eq!(table[1].scale[0], "C");
        assert_eq!(table[4].chord, vec!["F", "A", "C", "Eb"]);
        assert!(build_mode_table("H").is_err());
    }

    #[test]
    fn test_mode_table_for_melodic_minor() {
        let melodic = create_harmonic_structure("C", "melMinorHepta").unwrap();
        let table = build_mode_table_for(&melodic).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table[0].scale, melodic);
        assert_eq!(table[0].chord, vec!["C", "D#/Eb", "G", "B/Cb"]);
        assert_eq!(table[1].root, "D");
        assert_eq!(table[1].scale[6], "C");

        let pentatonic = ["C", "D", "E", "G", "A"];
        assert_eq!(
            build_mode_table_for(&pentatonic),
            Err(TheoryError::NotHeptatonic(5))
        );
    }
}
