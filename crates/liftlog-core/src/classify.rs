//! Body-part classification for exercise names.
//!
//! Classification walks a fixed, priority-ordered rule table and returns the
//! label of the first rule that matches. Keyword matchers use substring
//! containment on the lowercased name; code matchers use whole-name equality
//! so that short abbreviations like `s` never match inside longer names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target body part assigned to a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    #[serde(rename = "背中")]
    Back,
    #[serde(rename = "脚")]
    Legs,
    #[serde(rename = "胸")]
    Chest,
    #[serde(rename = "腕")]
    Arms,
    #[serde(rename = "体幹")]
    Core,
    #[serde(rename = "全身（スナッチ）")]
    Snatch,
    #[serde(rename = "全身（C&J）")]
    CleanAndJerk,
    #[serde(rename = "全身（デッドリフト）")]
    Deadlift,
    #[serde(rename = "その他")]
    Other,
}

pub const ALL_BODY_PARTS: [BodyPart; 9] = [
    BodyPart::Back,
    BodyPart::Legs,
    BodyPart::Chest,
    BodyPart::Arms,
    BodyPart::Core,
    BodyPart::Snatch,
    BodyPart::CleanAndJerk,
    BodyPart::Deadlift,
    BodyPart::Other,
];

impl BodyPart {
    /// Stored and displayed label.
    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::Back => "背中",
            BodyPart::Legs => "脚",
            BodyPart::Chest => "胸",
            BodyPart::Arms => "腕",
            BodyPart::Core => "体幹",
            BodyPart::Snatch => "全身（スナッチ）",
            BodyPart::CleanAndJerk => "全身（C&J）",
            BodyPart::Deadlift => "全身（デッドリフト）",
            BodyPart::Other => "その他",
        }
    }

    /// Parse a stored label. Unknown labels fall back to `Other`.
    pub fn from_label(label: &str) -> Self {
        ALL_BODY_PARTS
            .iter()
            .copied()
            .find(|part| part.label() == label.trim())
            .unwrap_or(BodyPart::Other)
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a rule tests the lowercased exercise name.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    Contains(&'static str),
    Exact(&'static str),
}

impl Matcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Contains(keyword) => name.contains(keyword),
            Matcher::Exact(code) => name == *code,
        }
    }
}

struct Rule {
    part: BodyPart,
    matchers: &'static [Matcher],
}

use Matcher::{Contains, Exact};

// Order is significant: first matching group wins.
const RULES: &[Rule] = &[
    Rule {
        part: BodyPart::Back,
        matchers: &[
            Contains("懸垂"),
            Contains("チンニング"),
            Contains("ラット"),
            Contains("ロウ"),
            Contains("プル"),
        ],
    },
    Rule {
        part: BodyPart::Legs,
        matchers: &[
            Contains("スクワット"),
            Contains("レッグ"),
            Contains("ランジ"),
            Contains("カーフ"),
            Contains("squat"),
            Contains("sq"),
        ],
    },
    Rule {
        part: BodyPart::Chest,
        matchers: &[
            Contains("ベンチ"),
            Contains("プレス"),
            Contains("フライ"),
            Contains("ディップ"),
            Contains("プッシュ"),
        ],
    },
    Rule {
        part: BodyPart::Arms,
        matchers: &[
            Contains("カール"),
            Contains("トライセップ"),
            Contains("プレスダウン"),
        ],
    },
    Rule {
        part: BodyPart::Core,
        matchers: &[
            Contains("プランク"),
            Contains("クランチ"),
            Contains("レッグレイズ"),
            Contains("デッドバグ"),
        ],
    },
    Rule {
        part: BodyPart::Snatch,
        matchers: &[Contains("スナッチ"), Exact("s"), Exact("hs")],
    },
    Rule {
        part: BodyPart::CleanAndJerk,
        matchers: &[
            Contains("クリーン"),
            Contains("ジャーク"),
            Exact("c&j"),
            Exact("hj"),
        ],
    },
    Rule {
        part: BodyPart::Deadlift,
        matchers: &[Contains("デッドリフト"), Contains("dl")],
    },
];

/// Classify an exercise name into exactly one body part.
pub fn classify(exercise_name: &str) -> BodyPart {
    let name = exercise_name.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matchers.iter().any(|m| m.matches(&name)))
        .map(|rule| rule.part)
        .unwrap_or(BodyPart::Other)
}

/// Resolve the body part for a stored set: the stored label when present,
/// otherwise a fresh classification of the exercise name.
pub fn resolve(stored_label: Option<&str>, exercise_name: &str) -> BodyPart {
    match stored_label {
        Some(label) if !label.trim().is_empty() => BodyPart::from_label(label),
        _ => classify(exercise_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_press_is_chest() {
        assert_eq!(classify("ベンチプレス"), BodyPart::Chest);
        assert_eq!(classify("ベンチプレス").label(), "胸");
    }

    #[test]
    fn test_snatch_exact_code() {
        assert_eq!(classify("S"), BodyPart::Snatch);
        assert_eq!(classify("hs"), BodyPart::Snatch);
        assert_eq!(classify("S").label(), "全身（スナッチ）");
    }

    #[test]
    fn test_short_codes_do_not_match_as_substring() {
        // "pws" contains "s" but is not the exact code.
        assert_eq!(classify("PwS"), BodyPart::Other);
        assert_eq!(classify("HJX"), BodyPart::Other);
    }

    #[test]
    fn test_squat_is_legs() {
        assert_eq!(classify("スクワット"), BodyPart::Legs);
        assert_eq!(classify("BSq"), BodyPart::Legs);
        assert_eq!(classify("Front Squat"), BodyPart::Legs);
    }

    #[test]
    fn test_unrecognized_is_other() {
        assert_eq!(classify("ABC123"), BodyPart::Other);
        assert_eq!(classify("ABC123").label(), "その他");
        assert_eq!(classify(""), BodyPart::Other);
    }

    #[test]
    fn test_group_priority_breaks_ties() {
        // Back keywords are checked before snatch keywords.
        assert_eq!(classify("スナッチプル"), BodyPart::Back);
        // Chest ("プレス") is checked before arms ("プレスダウン").
        assert_eq!(classify("プレスダウン"), BodyPart::Chest);
        // Legs ("レッグ") is checked before core ("レッグレイズ").
        assert_eq!(classify("レッグレイズ"), BodyPart::Legs);
    }

    #[test]
    fn test_weightlifting_codes() {
        assert_eq!(classify("C&J"), BodyPart::CleanAndJerk);
        assert_eq!(classify("パワークリーン"), BodyPart::CleanAndJerk);
        assert_eq!(classify("DL_S"), BodyPart::Deadlift);
        assert_eq!(classify("ルーマニアンデッドリフト"), BodyPart::Deadlift);
    }

    #[test]
    fn test_resolve_prefers_stored_label() {
        assert_eq!(resolve(Some("腕"), "スクワット"), BodyPart::Arms);
        assert_eq!(resolve(None, "スクワット"), BodyPart::Legs);
        assert_eq!(resolve(Some(""), "スクワット"), BodyPart::Legs);
    }

    #[test]
    fn test_label_round_trip() {
        for part in ALL_BODY_PARTS {
            assert_eq!(BodyPart::from_label(part.label()), part);
        }
        assert_eq!(BodyPart::from_label("unknown"), BodyPart::Other);
    }
}
