use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Year-scoped rates and targets that parametrise every load formula.
///
/// `target_load_per_fte_calc` is the only field the engine writes; everything
/// else is user-declared.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StandardLoad {
    pub year: i32,
    pub load_lecture: f64,
    pub load_lecture_first: f64,
    pub load_coursework_set: f64,
    pub load_coursework_credit: f64,
    pub load_coursework_marked: f64,
    pub load_exam_credit: f64,
    pub load_exam_marked: f64,
    /// Baseline hours per unit FTE independent of tasks.
    pub load_fte_misc: f64,
    /// User-declared hours per FTE.
    pub target_load_per_fte: u32,
    /// Engine-computed hours per FTE.
    pub target_load_per_fte_calc: Option<i64>,
}

impl StandardLoad {
    /// The computed hours per FTE, or the declared one when none has been computed.
    #[must_use]
    pub fn effective_target_per_fte(&self) -> i64 {
        self.target_load_per_fte_calc
            .unwrap_or_else(|| i64::from(self.target_load_per_fte))
    }

    /// Draft for another year carrying this year's rates forward.
    #[must_use]
    pub fn draft_for_year(&self, year: i32) -> StandardLoadDraft {
        StandardLoadDraft {
            year,
            load_lecture: self.load_lecture,
            load_lecture_first: self.load_lecture_first,
            load_coursework_set: self.load_coursework_set,
            load_coursework_credit: self.load_coursework_credit,
            load_coursework_marked: self.load_coursework_marked,
            load_exam_credit: self.load_exam_credit,
            load_exam_marked: self.load_exam_marked,
            load_fte_misc: self.load_fte_misc,
            target_load_per_fte: self.target_load_per_fte,
        }
    }

    /// Iterate the named per-unit rates, for range checks and reporting.
    #[must_use]
    pub fn rates(&self) -> [(&'static str, f64); 8] {
        [
            ("load_lecture", self.load_lecture),
            ("load_lecture_first", self.load_lecture_first),
            ("load_coursework_set", self.load_coursework_set),
            ("load_coursework_credit", self.load_coursework_credit),
            ("load_coursework_marked", self.load_coursework_marked),
            ("load_exam_credit", self.load_exam_credit),
            ("load_exam_marked", self.load_exam_marked),
            ("load_fte_misc", self.load_fte_misc),
        ]
    }
}

/// User-supplied standard load, without engine-computed fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StandardLoadDraft {
    pub year: i32,
    pub load_lecture: f64,
    pub load_lecture_first: f64,
    pub load_coursework_set: f64,
    pub load_coursework_credit: f64,
    pub load_coursework_marked: f64,
    pub load_exam_credit: f64,
    pub load_exam_marked: f64,
    pub load_fte_misc: f64,
    pub target_load_per_fte: u32,
}

impl StandardLoadDraft {
    /// Promote the draft to a standard load, seeding the computed target.
    #[must_use]
    pub fn into_standard_load(self, target_load_per_fte_calc: Option<i64>) -> StandardLoad {
        StandardLoad {
            year: self.year,
            load_lecture: self.load_lecture,
            load_lecture_first: self.load_lecture_first,
            load_coursework_set: self.load_coursework_set,
            load_coursework_credit: self.load_coursework_credit,
            load_coursework_marked: self.load_coursework_marked,
            load_exam_credit: self.load_exam_credit,
            load_exam_marked: self.load_exam_marked,
            load_fte_misc: self.load_fte_misc,
            target_load_per_fte: self.target_load_per_fte,
            target_load_per_fte_calc,
        }
    }
}
