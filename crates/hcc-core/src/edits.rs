//! Age and sex reclassification edits.
//!
//! CMS reassigns some diagnoses when the beneficiary's age or sex makes the
//! default category implausible, and removes others from the payment model
//! entirely. The diagnosis sets below are disjoint, so at most one edit
//! applies to any diagnosis.

use hcc_model::{CategoryCode, DiagnosisCode, Sex};

/// What an applicable edit does to a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The diagnosis maps to this category instead of its table categories.
    Reassign(CategoryCode),
    /// The diagnosis does not count toward the payment model.
    OutOfModel,
}

struct AgeSexEdit {
    name: &'static str,
    diagnoses: &'static [&'static str],
    applies: fn(u32, Sex) -> bool,
    outcome: EditOutcome,
}

const LEUKEMIA: &[&str] = &[
    "C9100", "C9101", "C9102", "C9500", "C9501", "C9502", "C7400", "C7401", "C7402", "C7410",
    "C7411", "C7412", "C7490", "C7491", "C7492",
];
const CHRONIC_BRONCHITIS: &[&str] = &["J410", "J411", "J418", "J42", "J440", "J441"];
const INTESTINAL_VASCULAR: &[&str] = &[
    "K55011", "K55012", "K55019", "K55021", "K55022", "K55029", "K55031", "K55032", "K55039",
    "K55041", "K55042", "K55049", "K55051", "K55052", "K55059", "K55061", "K55062", "K55069",
    "K5530", "K5531", "K5532", "K5533",
];
const EMPHYSEMA: &[&str] = &["J430", "J431", "J432", "J438", "J439", "J449", "J982", "J983"];
const BREAST: &[&str] = &[
    "C50011", "C50012", "C50019", "C50021", "C50022", "C50029", "C50111", "C50112", "C50119",
    "C50121", "C50122", "C50129", "C50211", "C50212", "C50219", "C50221", "C50222", "C50229",
    "C50311", "C50312", "C50319", "C50321", "C50322", "C50329", "C50411", "C50412", "C50419",
    "C50421", "C50422", "C50429", "C50511", "C50512", "C50519", "C50521", "C50522", "C50529",
    "C50611", "C50612", "C50619", "C50621", "C50622", "C50629", "C50811", "C50812", "C50819",
    "C50821", "C50822", "C50829", "C50911", "C50912", "C50919", "C50921", "C50922", "C50929",
];
const LOW_BIRTH_WEIGHT: &[&str] = &[
    "P0500", "P0501", "P0502", "P0503", "P0504", "P0505", "P0506", "P0507", "P0508", "P0509",
    "P0510", "P0511", "P0512", "P0513", "P0514", "P0515", "P0516", "P0517", "P0518", "P0519",
    "P052", "P059", "P0700", "P0701", "P0702", "P0703", "P0710", "P0714", "P0715", "P0716",
    "P0717", "P0718", "P0720", "P0721", "P0722", "P0723", "P0724", "P0725", "P0726", "P0730",
    "P0731", "P0732", "P0733", "P0734", "P0735", "P0736", "P0737", "P0738", "P0739", "P080",
    "P081", "P0821", "P0822",
];
const CONJOINED_TWINS: &[&str] = &["Q894"];
const NEWBORN: &[&str] = &[
    "K551", "K558", "K559", "P041", "P0411", "P0412", "P0413", "P0414", "P0415", "P0416",
    "P0417", "P0418", "P0419", "P041A", "P042", "P043", "P0440", "P0441", "P0442", "P0449",
    "P045", "P046", "P048", "P0481", "P0489", "P049", "P930", "P938", "P961", "P962", "Q390",
    "Q391", "Q392", "Q393", "Q394", "Q6410", "Q6411", "Q6412", "Q6419", "Q790", "Q791", "Q792",
    "Q793", "Q794", "Q7951",
];
const PERINATAL_RESPIRATORY: &[&str] = &["P270", "P271", "P278", "P279"];
const DISRUPTIVE_MOOD: &[&str] = &["F3481"];
const HEMOPHILIA: &[&str] = &["D66", "D67"];

const EDITS: &[AgeSexEdit] = &[
    AgeSexEdit {
        name: "leukemia",
        diagnoses: LEUKEMIA,
        applies: |age, _| age < 18,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(9)),
    },
    AgeSexEdit {
        name: "chronic_bronchitis",
        diagnoses: CHRONIC_BRONCHITIS,
        applies: |age, _| age < 18,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(161)),
    },
    AgeSexEdit {
        name: "intestinal_vascular",
        diagnoses: INTESTINAL_VASCULAR,
        applies: |age, _| age < 2,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(42)),
    },
    AgeSexEdit {
        name: "emphysema",
        diagnoses: EMPHYSEMA,
        applies: |age, _| age < 2,
        outcome: EditOutcome::OutOfModel,
    },
    AgeSexEdit {
        name: "breast_cancer",
        diagnoses: BREAST,
        applies: |age, _| age < 50,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(11)),
    },
    AgeSexEdit {
        name: "low_birth_weight",
        diagnoses: LOW_BIRTH_WEIGHT,
        applies: |age, _| age != 0,
        outcome: EditOutcome::OutOfModel,
    },
    AgeSexEdit {
        name: "conjoined_twins",
        diagnoses: CONJOINED_TWINS,
        applies: |age, _| age >= 1,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(97)),
    },
    AgeSexEdit {
        name: "newborn",
        diagnoses: NEWBORN,
        applies: |age, _| age >= 2,
        outcome: EditOutcome::OutOfModel,
    },
    AgeSexEdit {
        name: "perinatal_respiratory",
        diagnoses: PERINATAL_RESPIRATORY,
        applies: |age, _| age >= 2,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(162)),
    },
    AgeSexEdit {
        name: "disruptive_mood",
        diagnoses: DISRUPTIVE_MOOD,
        applies: |age, _| !(6..=18).contains(&age),
        outcome: EditOutcome::OutOfModel,
    },
    AgeSexEdit {
        name: "hemophilia",
        diagnoses: HEMOPHILIA,
        applies: |_, sex| sex == Sex::Female,
        outcome: EditOutcome::Reassign(CategoryCode::from_number(75)),
    },
];

/// The edit that applies to `diagnosis` for this age and sex, if any.
pub fn age_sex_edit(diagnosis: &DiagnosisCode, age: u32, sex: Sex) -> Option<EditOutcome> {
    EDITS
        .iter()
        .find(|edit| edit.diagnoses.contains(&diagnosis.as_str()))
        .filter(|edit| (edit.applies)(age, sex))
        .map(|edit| {
            tracing::trace!(edit = edit.name, "age/sex edit applies");
            edit.outcome
        })
}
