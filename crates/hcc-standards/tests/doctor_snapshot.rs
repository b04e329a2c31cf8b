use std::fs;
use std::path::Path;

use hcc_standards::hash::sha256_hex;
use hcc_standards::{DoctorReport, StandardsRegistry};

const DXMAP: &[u8] = br#"{"E119": {"desc": "Type 2 diabetes mellitus without complications", "hccs": ["HCC19"]}, "N183": {"desc": "Chronic kidney disease, stage 3 (moderate)", "hccs": ["HCC138"]}}"#;
const HCCMAP: &[u8] = br#"{"HCC18": {"desc": "Diabetes with Chronic Complications", "parents": [], "children": ["HCC19"]}, "HCC19": {"desc": "Diabetes without Complication", "parents": [], "children": []}}"#;
const COEFFICIENTS: &[u8] = br#"{"CNA_HCC18": 0.302, "CNA_HCC19": 0.105}"#;

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn verify_and_doctor_report_snapshot_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let standards_dir = dir.path();

    write(&standards_dir.join("v24/dxmap.json"), DXMAP);
    write(&standards_dir.join("v24/hccmap.json"), HCCMAP);
    write(&standards_dir.join("v24/coefficients.json"), COEFFICIENTS);

    let manifest = format!(
        r#"[manifest]
schema = "hcc-raf.standards-manifest"
schema_version = 1

[pins]
versions = ["v24"]

[[files]]
path = "v24/coefficients.json"
sha256 = "{}"
kind = "json"
role = "coefficients"
version = "v24"

[[files]]
path = "v24/hccmap.json"
sha256 = "{}"
kind = "json"
role = "hccmap"
version = "v24"

[[files]]
path = "v24/dxmap.json"
sha256 = "{}"
kind = "json"
role = "dxmap"
version = "v24"
"#,
        sha256_hex(COEFFICIENTS),
        sha256_hex(HCCMAP),
        sha256_hex(DXMAP),
    );
    write(&standards_dir.join("manifest.toml"), manifest.as_bytes());

    let (tables, summary) =
        StandardsRegistry::verify_and_load(standards_dir).expect("verify_and_load should succeed");

    assert_eq!(summary.versions.len(), 1);
    assert_eq!(summary.versions[0].diagnoses, 2);

    let report = DoctorReport::from_verify_summary(&summary, &tables);
    assert!(report.has_violations());

    insta::assert_json_snapshot!(report, @r#"
    {
      "schema": "hcc-raf.standards-doctor",
      "schema_version": 1,
      "pinned_versions": [
        "v24"
      ],
      "files": [
        {
          "path": "v24/dxmap.json",
          "sha256": "819acbc04bf8117e213c03a8641e8f3bd68d0277dc0723b2456cf72331b25b53",
          "kind": "json",
          "role": "dxmap",
          "version": "v24",
          "notes": null
        },
        {
          "path": "v24/hccmap.json",
          "sha256": "15b3a73723d1f4755ca90ba633cffb9f57b442f09e56d8580bcd48808a3e41bc",
          "kind": "json",
          "role": "hccmap",
          "version": "v24",
          "notes": null
        },
        {
          "path": "v24/coefficients.json",
          "sha256": "c79c063ec80a7077bc0d01fcd0f3345436a1ef9620f27ac2ea972f83ff4323d8",
          "kind": "json",
          "role": "coefficients",
          "version": "v24",
          "notes": null
        }
      ],
      "versions": [
        {
          "version": "v24",
          "diagnoses": 2,
          "categories": 2,
          "coefficients": 2,
          "inverse_violations": [
            {
              "category": "HCC18",
              "relation": "child",
              "related": "HCC19"
            }
          ],
          "unmapped_categories": [
            {
              "diagnosis": "N183",
              "category": "HCC138"
            }
          ]
        }
      ]
    }
    "#);
}
