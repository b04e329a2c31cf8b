use hcc_cli::csv_io::{read_members_from, write_scores};
use hcc_core::{BatchConfig, BatchScorer, MemberInput, RafEngine};
use hcc_model::{EngineConfig, InputKind, PayerModel};
use hcc_standards::load_default_tables;

const MEMBERS: &str = "\
member_id,age,sex,orec,model,medicaid,conditions
m1, 70, F, 0, CNA, 0, E11.11 E11.9
m2,70,2,,,,\"HCC19;HCC85\"
";

fn engine() -> RafEngine {
    RafEngine::new(
        load_default_tables().expect("load default standards"),
        EngineConfig::default(),
    )
}

fn request(member: &MemberInput) -> &hcc_core::MemberRequest {
    match member {
        MemberInput::Request(request) => request,
        MemberInput::Rejected { member_id, error } => panic!("{member_id} rejected: {error}"),
    }
}

fn rejection(member: &MemberInput) -> (&str, String) {
    match member {
        MemberInput::Rejected { member_id, error } => (member_id.as_str(), error.to_string()),
        MemberInput::Request(request) => panic!("{} was accepted", request.member_id),
    }
}

#[test]
fn members_csv_scores_to_csv() {
    let engine = engine();
    let members = read_members_from(MEMBERS.as_bytes()).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(
        request(&members[1]).beneficiary.model,
        PayerModel::CommunityNonDualAged
    );

    let outcomes = BatchScorer::new(&engine, BatchConfig::default())
        .score_inputs(members)
        .outcomes;
    assert_eq!(
        outcomes
            .iter()
            .map(|o| o.result.as_ref().map(|s| s.input_kind).ok())
            .collect::<Vec<_>>(),
        vec![Some(InputKind::Diagnosis), Some(InputKind::Category)]
    );

    let mut buffer = Vec::new();
    write_scores(&mut buffer, &outcomes).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r#"
    member_id,version,model,input_kind,demographic_score,condition_score,total,premium,conditions,error
    m1,v23,CNA,diagnosis,0.3820,0.3110,0.6930,601.52,HCC17,
    m2,v23,CNA,category,0.3820,0.5700,0.9520,826.34,"HCC19,HCC85,HCC85_gDiabetesMellit",
    "#);
}

#[test]
fn fractional_age_truncates_and_unreadable_age_fails_its_row() {
    let input = "member_id,age,sex,conditions\nm1,70,F,HCC19\nm2,72.5,M,\nm3,seventy,M,HCC19\n";
    let members = read_members_from(input.as_bytes()).unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(request(&members[0]).beneficiary.age, 70);
    assert_eq!(request(&members[1]).beneficiary.age, 72);
    assert_eq!(
        rejection(&members[2]),
        ("m3", "invalid age: seventy".to_string())
    );

    let engine = engine();
    let report = BatchScorer::new(&engine, BatchConfig::default()).score_inputs(members);
    assert_eq!(report.failed_count(), 1);
    assert!(report.outcomes[0].result.is_ok());
    assert!(report.outcomes[1].result.is_ok());
    assert_eq!(report.outcomes[2].member_id, "m3");
}

#[test]
fn unknown_model_or_version_becomes_an_error_row() {
    let input = "member_id,age,sex,model,version,conditions\n\
                 m1,70,F,XYZ,,HCC19\n\
                 m2,70,F,CNA,v99,HCC19\n\
                 m3,70,F,INS,v24,HCC19\n";
    let members = read_members_from(input.as_bytes()).unwrap();
    assert_eq!(
        rejection(&members[0]),
        ("m1", "unknown payer model: XYZ".to_string())
    );
    assert_eq!(
        rejection(&members[1]),
        ("m2", "unknown model version: v99".to_string())
    );
    assert_eq!(request(&members[2]).beneficiary.model, PayerModel::Institutional);

    let engine = engine();
    let report = BatchScorer::new(&engine, BatchConfig::default()).score_inputs(members);
    let mut buffer = Vec::new();
    write_scores(&mut buffer, &report.outcomes[..2]).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r"
    member_id,version,model,input_kind,demographic_score,condition_score,total,premium,conditions,error
    m1,,,,,,,,,unknown payer model: XYZ
    m2,,,,,,,,,unknown model version: v99
    ");
    assert!(report.outcomes[2].result.is_ok());
}

#[test]
fn short_row_is_rejected_by_member_id() {
    let input = "member_id,age,sex\nm1,70,F\nm2\n";
    let members = read_members_from(input.as_bytes()).unwrap();
    assert_eq!(members.len(), 2);
    let (member_id, error) = rejection(&members[1]);
    assert_eq!(member_id, "m2");
    assert!(error.starts_with("invalid member record:"), "{error}");
}

#[test]
fn missing_age_column_fails_the_file() {
    let input = "member_id,sex\nm1,F\n";
    let error = read_members_from(input.as_bytes()).unwrap_err();
    assert_eq!(error.to_string(), "members csv has no age column");
}
