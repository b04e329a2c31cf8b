//! Members CSV in, scores CSV out.
//!
//! Input columns: `member_id,age,sex,orec,model,medicaid,conditions`.
//! `sex`, `orec` and `medicaid` are read leniently and a fractional `age` is
//! truncated. A blank `model` means community non-dual aged. An unreadable
//! `age` or `model` rejects the member, which then appears in the scores CSV
//! as an error row; the other members are still scored. `conditions` holds
//! codes separated by commas, semicolons or whitespace (quote the field when
//! using commas). An optional `version` column selects the model version per
//! member and rejects the member when it names an unknown version.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use hcc_core::{EngineError, MemberInput, MemberOutcome, MemberRequest};
use hcc_model::{
    Beneficiary, EntitlementReason, InputKind, ModelError, PayerModel, Sex, parse_age,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

const REQUIRED_COLUMNS: [&str; 2] = ["member_id", "age"];

#[derive(Debug, Clone, Deserialize)]
pub struct MemberRow {
    pub member_id: String,
    pub age: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub orec: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub medicaid: String,
    #[serde(default)]
    pub conditions: String,
    /// Optional per-member model version.
    #[serde(default)]
    pub version: Option<String>,
}

impl MemberRow {
    pub fn into_request(self) -> Result<MemberRequest, ModelError> {
        let age = parse_age(&self.age)?;
        let model = match self.model.trim() {
            "" => PayerModel::default(),
            value => value.parse()?,
        };
        let version = match self.version.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse()?),
        };
        let beneficiary = Beneficiary::new(age, Sex::from_code_lenient(&self.sex))
            .with_orec(EntitlementReason::from_code_lenient(&self.orec))
            .with_medicaid(parse_flag(&self.medicaid))
            .with_model(model);
        Ok(MemberRequest {
            member_id: self.member_id,
            beneficiary,
            conditions: vec![self.conditions],
            version,
        })
    }

    fn into_input(self, line: usize) -> MemberInput {
        let member_id = self.member_id.clone();
        match self.into_request() {
            Ok(request) => MemberInput::Request(request),
            Err(error) => {
                warn!(row = line, member_id = %member_id, %error, "member rejected");
                MemberInput::Rejected {
                    member_id,
                    error: error.into(),
                }
            }
        }
    }
}

/// `1`, `y`, `yes` and `true` in any case are set; everything else is not.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true"
    )
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

pub fn read_members(path: &Path) -> Result<Vec<MemberInput>> {
    let reader = reader_builder()
        .from_path(path)
        .with_context(|| format!("open members csv {}", path.display()))?;
    collect_members(reader).with_context(|| format!("read members csv {}", path.display()))
}

pub fn read_members_from<R: Read>(input: R) -> Result<Vec<MemberInput>> {
    collect_members(reader_builder().from_reader(input))
}

/// Reads every row. A row that does not deserialize is rejected on its own;
/// only an unreadable file or a missing required column fails the whole read.
fn collect_members<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<MemberInput>> {
    let headers = reader.headers().context("read members header")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            bail!("members csv has no {column} column");
        }
    }
    let id_column = headers.iter().position(|header| header == "member_id");

    let mut members = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 1;
        let record = record.with_context(|| format!("members row {line}"))?;
        let member = match record.deserialize::<MemberRow>(Some(&headers)) {
            Ok(row) => row.into_input(line),
            Err(error) => {
                warn!(row = line, %error, "unreadable members row");
                let member_id = id_column
                    .and_then(|column| record.get(column))
                    .filter(|id| !id.is_empty())
                    .map_or_else(|| format!("row {line}"), str::to_string);
                MemberInput::Rejected {
                    member_id,
                    error: EngineError::InvalidRecord(error.to_string()),
                }
            }
        };
        members.push(member);
    }
    Ok(members)
}

/// One line of the scores CSV. Failed members carry only the error.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub member_id: String,
    pub version: String,
    pub model: String,
    pub input_kind: String,
    pub demographic_score: String,
    pub condition_score: String,
    pub total: String,
    pub premium: String,
    /// Scored categories and interaction terms, comma-joined.
    pub conditions: String,
    pub error: String,
}

impl ScoreRow {
    pub fn from_outcome(outcome: &MemberOutcome) -> Self {
        match &outcome.result {
            Ok(score) => Self {
                member_id: outcome.member_id.clone(),
                version: score.model.version.to_string(),
                model: score.model.model.to_string(),
                input_kind: match score.input_kind {
                    InputKind::Diagnosis => "diagnosis".to_string(),
                    InputKind::Category => "category".to_string(),
                },
                demographic_score: score.raf.demographic_score.to_string(),
                condition_score: score.raf.condition_score.to_string(),
                total: score.raf.total.to_string(),
                premium: score.raf.premium.to_string(),
                conditions: score
                    .raf
                    .condition_detail
                    .iter()
                    .map(|c| c.code.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
                error: String::new(),
            },
            Err(error) => Self {
                member_id: outcome.member_id.clone(),
                version: String::new(),
                model: String::new(),
                input_kind: String::new(),
                demographic_score: String::new(),
                condition_score: String::new(),
                total: String::new(),
                premium: String::new(),
                conditions: String::new(),
                error: error.to_string(),
            },
        }
    }
}

pub fn write_scores<W: Write>(output: W, outcomes: &[MemberOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for outcome in outcomes {
        writer
            .serialize(ScoreRow::from_outcome(outcome))
            .with_context(|| format!("write scores row for {}", outcome.member_id))?;
    }
    writer.flush().context("flush scores csv")?;
    Ok(())
}

pub fn write_scores_to_path(path: &Path, outcomes: &[MemberOutcome]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create scores csv {}", path.display()))?;
    write_scores(file, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("Y"));
        assert!(parse_flag(" true "));
        assert!(parse_flag("1"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
    }

    fn row(age: &str, model: &str, version: Option<&str>) -> MemberRow {
        MemberRow {
            member_id: "m1".to_string(),
            age: age.to_string(),
            sex: "2".to_string(),
            orec: "9".to_string(),
            model: model.to_string(),
            medicaid: "yes".to_string(),
            conditions: "E119 I281".to_string(),
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn lenient_row_conversion() {
        let request = row("72.5", "ins", Some("24")).into_request().unwrap();
        assert_eq!(request.beneficiary.age, 72);
        assert_eq!(request.beneficiary.sex, Sex::Female);
        assert_eq!(request.beneficiary.orec, EntitlementReason::default());
        assert_eq!(request.beneficiary.model, PayerModel::Institutional);
        assert!(request.beneficiary.medicaid);
        assert_eq!(request.version, Some(hcc_model::ModelVersion::V24));
        assert_eq!(request.conditions, vec!["E119 I281".to_string()]);
    }

    #[test]
    fn blank_model_and_version_use_defaults() {
        let request = row("70", " ", Some("")).into_request().unwrap();
        assert_eq!(request.beneficiary.model, PayerModel::CommunityNonDualAged);
        assert_eq!(request.version, None);
    }

    #[test]
    fn unknown_model_or_version_is_rejected() {
        assert_eq!(
            row("70", "XYZ", None).into_request().unwrap_err(),
            ModelError::UnknownPayerModel("XYZ".to_string())
        );
        assert_eq!(
            row("70", "CNA", Some("v99")).into_request().unwrap_err(),
            ModelError::UnknownVersion("v99".to_string())
        );
        assert_eq!(
            row("-4", "CNA", None).into_request().unwrap_err(),
            ModelError::InvalidAge("-4".to_string())
        );
    }
}
