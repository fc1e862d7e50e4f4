//! Exercise catalog reference data.
//!
//! The seed list is written into the store on creation and read back ordered
//! by `display_order`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LiftLogError;

/// Catalog category: competition lifts or general training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExerciseCategory {
    #[serde(rename = "WL")]
    Weightlifting,
    #[serde(rename = "Training")]
    Training,
}

impl ExerciseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Weightlifting => "WL",
            ExerciseCategory::Training => "Training",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = LiftLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "WL" | "wl" => Ok(ExerciseCategory::Weightlifting),
            "Training" | "training" => Ok(ExerciseCategory::Training),
            other => Err(LiftLogError::InvalidInput(format!(
                "Unknown exercise category: {} (use WL or Training)",
                other
            ))),
        }
    }
}

/// A catalog exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub category: ExerciseCategory,
    pub major_category: String,
    pub display_order: i32,
}

impl Exercise {
    /// Grouping key used by the exercise picker: `{category}-{major_category}`.
    pub fn group_key(&self) -> String {
        format!("{}-{}", self.category, self.major_category)
    }
}

/// Seed entry: (category, major category, name).
type SeedExercise = (ExerciseCategory, &'static str, &'static str);

const SEED: &[SeedExercise] = &[
    (ExerciseCategory::Weightlifting, "スナッチ", "スナッチ"),
    (ExerciseCategory::Weightlifting, "スナッチ", "ハングスナッチ"),
    (ExerciseCategory::Weightlifting, "スナッチ", "パワースナッチ"),
    (ExerciseCategory::Weightlifting, "スナッチ", "スナッチプル"),
    (ExerciseCategory::Weightlifting, "クリーン&ジャーク", "クリーン&ジャーク"),
    (ExerciseCategory::Weightlifting, "クリーン&ジャーク", "パワークリーン"),
    (ExerciseCategory::Weightlifting, "クリーン&ジャーク", "ハングクリーン"),
    (ExerciseCategory::Weightlifting, "クリーン&ジャーク", "プッシュジャーク"),
    (ExerciseCategory::Weightlifting, "クリーン&ジャーク", "クリーンプル"),
    (ExerciseCategory::Weightlifting, "スクワット", "バックスクワット"),
    (ExerciseCategory::Weightlifting, "スクワット", "フロントスクワット"),
    (ExerciseCategory::Weightlifting, "スクワット", "オーバーヘッドスクワット"),
    (ExerciseCategory::Weightlifting, "デッドリフト", "スナッチデッドリフト"),
    (ExerciseCategory::Weightlifting, "デッドリフト", "クリーンデッドリフト"),
    (ExerciseCategory::Training, "胸", "ベンチプレス"),
    (ExerciseCategory::Training, "胸", "ダンベルフライ"),
    (ExerciseCategory::Training, "胸", "ディップス"),
    (ExerciseCategory::Training, "背中", "懸垂"),
    (ExerciseCategory::Training, "背中", "ラットプルダウン"),
    (ExerciseCategory::Training, "背中", "ベントオーバーロウ"),
    (ExerciseCategory::Training, "脚", "レッグプレス"),
    (ExerciseCategory::Training, "脚", "ランジ"),
    (ExerciseCategory::Training, "脚", "カーフレイズ"),
    (ExerciseCategory::Training, "肩", "ショルダープレス"),
    (ExerciseCategory::Training, "腕", "バーベルカール"),
    (ExerciseCategory::Training, "腕", "トライセップエクステンション"),
    (ExerciseCategory::Training, "体幹", "プランク"),
    (ExerciseCategory::Training, "体幹", "クランチ"),
];

/// The seeded catalog, with display order following the seed order.
pub fn seed_exercises() -> Vec<Exercise> {
    SEED.iter()
        .enumerate()
        .map(|(index, (category, major, name))| Exercise {
            name: (*name).to_string(),
            category: *category,
            major_category: (*major).to_string(),
            display_order: (index as i32 + 1) * 10,
        })
        .collect()
}

/// Group exercises by `{category}-{major_category}`, keeping input order
/// within each group.
pub fn group_by_category(exercises: &[Exercise]) -> BTreeMap<String, Vec<Exercise>> {
    let mut grouped: BTreeMap<String, Vec<Exercise>> = BTreeMap::new();
    for exercise in exercises {
        grouped
            .entry(exercise.group_key())
            .or_default()
            .push(exercise.clone());
    }
    grouped
}

/// Filter exercises the way the picker does: a search query overrides the
/// category filters.
pub fn filter_exercises<'a>(
    exercises: &'a [Exercise],
    query: Option<&str>,
    category: Option<ExerciseCategory>,
    major_category: Option<&str>,
) -> Vec<&'a Exercise> {
    if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
        let needle = query.trim().to_lowercase();
        return exercises
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect();
    }

    exercises
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .filter(|e| major_category.map_or(true, |m| e.major_category == m))
        .collect()
}

/// Weightlifting lift codes tracked as personal bests.
pub const PERSONAL_BEST_CODES: [&str; 12] = [
    "S", "HS", "PwS", "C&J", "HJ", "P", "PP", "PJ", "BSq", "FSq", "DL_S", "DL_J",
];

/// Whether a code is one of the tracked personal-best lifts.
pub fn is_personal_best_code(code: &str) -> bool {
    PERSONAL_BEST_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_display_order_is_increasing() {
        let exercises = seed_exercises();
        assert!(!exercises.is_empty());
        assert!(exercises
            .windows(2)
            .all(|w| w[0].display_order < w[1].display_order));
    }

    #[test]
    fn test_group_key() {
        let exercises = seed_exercises();
        let grouped = group_by_category(&exercises);
        let snatch = grouped.get("WL-スナッチ").expect("snatch group");
        assert_eq!(snatch[0].name, "スナッチ");
        assert!(grouped.contains_key("Training-胸"));
    }

    #[test]
    fn test_filter_query_overrides_category() {
        let exercises = seed_exercises();
        let hits = filter_exercises(
            &exercises,
            Some("プレス"),
            Some(ExerciseCategory::Weightlifting),
            None,
        );
        assert!(hits.iter().any(|e| e.name == "ベンチプレス"));
    }

    #[test]
    fn test_filter_by_category_and_major() {
        let exercises = seed_exercises();
        let hits = filter_exercises(&exercises, None, Some(ExerciseCategory::Training), Some("体幹"));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|e| e.major_category == "体幹"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "WL".parse::<ExerciseCategory>().unwrap(),
            ExerciseCategory::Weightlifting
        );
        assert!("cardio".parse::<ExerciseCategory>().is_err());
    }

    #[test]
    fn test_personal_best_codes() {
        assert!(is_personal_best_code("C&J"));
        assert!(!is_personal_best_code("c&j"));
    }
}
