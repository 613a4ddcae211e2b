//! Standard load drafts read from TOML.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use wl_core::entities::{StandardLoad, StandardLoadDraft};

/// Rates and targets to change; anything left out keeps its current value.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DraftOverrides {
    pub load_lecture: Option<f64>,
    pub load_lecture_first: Option<f64>,
    pub load_coursework_set: Option<f64>,
    pub load_coursework_credit: Option<f64>,
    pub load_coursework_marked: Option<f64>,
    pub load_exam_credit: Option<f64>,
    pub load_exam_marked: Option<f64>,
    pub load_fte_misc: Option<f64>,
    pub target_load_per_fte: Option<u32>,
}

impl DraftOverrides {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read draft {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse draft {}", path.display()))
    }

    /// Draft for `year` starting from `current`'s rates.
    #[must_use]
    pub fn apply(self, current: &StandardLoad, year: i32) -> StandardLoadDraft {
        let base = current.draft_for_year(year);
        StandardLoadDraft {
            year,
            load_lecture: self.load_lecture.unwrap_or(base.load_lecture),
            load_lecture_first: self.load_lecture_first.unwrap_or(base.load_lecture_first),
            load_coursework_set: self.load_coursework_set.unwrap_or(base.load_coursework_set),
            load_coursework_credit: self
                .load_coursework_credit
                .unwrap_or(base.load_coursework_credit),
            load_coursework_marked: self
                .load_coursework_marked
                .unwrap_or(base.load_coursework_marked),
            load_exam_credit: self.load_exam_credit.unwrap_or(base.load_exam_credit),
            load_exam_marked: self.load_exam_marked.unwrap_or(base.load_exam_marked),
            load_fte_misc: self.load_fte_misc.unwrap_or(base.load_fte_misc),
            target_load_per_fte: self.target_load_per_fte.unwrap_or(base.target_load_per_fte),
        }
    }
}
