use hcc_model::{CategoryCode, DiagnosisCode, ModelVersion, PayerModel};
use hcc_standards::{DoctorReport, StandardsRegistry, load_default_tables, standards_root};

#[test]
fn loads_every_pinned_version() {
    let tables = load_default_tables().expect("load default standards");
    let versions: Vec<ModelVersion> = tables.versions().collect();
    assert_eq!(versions, ModelVersion::ALL.to_vec());
}

#[test]
fn default_snapshot_counts() {
    let (_, summary) = StandardsRegistry::verify_and_load(&standards_root()).expect("verify");
    let counts: Vec<(ModelVersion, usize, usize)> = summary
        .versions
        .iter()
        .map(|c| (c.version, c.diagnoses, c.categories))
        .collect();
    assert_eq!(
        counts,
        vec![
            (ModelVersion::V22, 67, 55),
            (ModelVersion::V23, 70, 59),
            (ModelVersion::V24, 72, 59),
        ]
    );
}

#[test]
fn default_snapshot_is_clean() {
    let (tables, summary) = StandardsRegistry::verify_and_load(&standards_root()).expect("verify");
    let report = DoctorReport::from_verify_summary(&summary, &tables);
    assert!(!report.has_violations());
    assert!(report.versions.iter().all(|v| v.unmapped_categories.is_empty()));
}

#[test]
fn v22_lacks_the_v23_substance_split() {
    let tables = load_default_tables().expect("load");
    let v22 = tables.require(ModelVersion::V22).unwrap();
    let v23 = tables.require(ModelVersion::V23).unwrap();
    let hcc56 = CategoryCode::from_number(56);

    assert!(!v22.hierarchy.contains(hcc56));
    assert!(v23.hierarchy.contains(hcc56));

    let opioid = DiagnosisCode::new("F11.10").unwrap();
    assert_eq!(
        v22.diagnosis(&opioid).unwrap().categories,
        vec![CategoryCode::from_number(55)]
    );
    assert_eq!(v23.diagnosis(&opioid).unwrap().categories, vec![hcc56]);
}

#[test]
fn v24_maps_the_stage_three_kidney_split() {
    let tables = load_default_tables().expect("load");
    let v23 = tables.require(ModelVersion::V23).unwrap();
    let v24 = tables.require(ModelVersion::V24).unwrap();
    let hcc138 = CategoryCode::from_number(138);

    let stage_3a = DiagnosisCode::new("N18.31").unwrap();
    assert!(v23.diagnosis(&stage_3a).is_none());
    assert_eq!(v24.diagnosis(&stage_3a).unwrap().categories, vec![hcc138]);

    let stage_3 = DiagnosisCode::new("N18.3").unwrap();
    assert!(v23.diagnosis(&stage_3).is_some());
    assert!(v24.diagnosis(&stage_3).is_none());
}

#[test]
fn hierarchy_children_are_mirrored_as_parents() {
    let tables = load_default_tables().expect("load");
    for version in ModelVersion::ALL {
        let hierarchy = &tables.require(version).unwrap().hierarchy;
        for code in hierarchy.codes() {
            for child in hierarchy.children(code) {
                assert!(
                    hierarchy.parents(child).contains(&code),
                    "{version}: {child} should list {code} as parent"
                );
            }
        }
    }
}

#[test]
fn coefficients_are_keyed_by_model() {
    let tables = load_default_tables().expect("load");
    let v24 = tables.require(ModelVersion::V24).unwrap();
    assert_eq!(
        v24.coefficients
            .get(PayerModel::CommunityNonDualAged, CategoryCode::from_number(19)),
        Some(0.105)
    );
    assert_eq!(v24.coefficients.get_key("CNA_D10P"), Some(0.362));
}
