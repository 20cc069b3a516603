use tfdh_project::schema::*;
use tfdh_project::{load, load_json, load_yaml, save_json, save_yaml, validate_case_file};

fn carbon_case() -> CaseDef {
    CaseDef {
        id: "carbon".to_string(),
        description: Some("C in H/He".to_string()),
        element: ElementDef::Symbol("C".to_string()),
        plasma: PlasmaDef {
            density_g_cc: 1.0,
            temperature: TemperatureDef::Kelvin { value: 1.0e6 },
            relativistic: false,
            composition: vec![
                AbundanceDef {
                    element: ElementDef::Symbol("H".to_string()),
                    mass_fraction: 0.5,
                },
                AbundanceDef {
                    element: ElementDef::Symbol("He".to_string()),
                    mass_fraction: 0.5,
                },
            ],
        },
        cutoff: 0.0,
        solver: SolverOverridesDef::default(),
        outputs: OutputsDef {
            summary: Some("carbon.txt".to_string()),
            profile: None,
            json: None,
        },
    }
}

fn explicit_case() -> CaseDef {
    CaseDef {
        id: "c13".to_string(),
        description: None,
        element: ElementDef::Explicit {
            a: 13,
            z: 6,
            name: "Carbon-13".to_string(),
        },
        plasma: PlasmaDef {
            density_g_cc: 5.0,
            temperature: TemperatureDef::KeV { value: 0.5 },
            relativistic: true,
            composition: vec![AbundanceDef {
                element: ElementDef::Symbol("He".to_string()),
                mass_fraction: 1.0,
            }],
        },
        cutoff: 2.0,
        solver: SolverOverridesDef {
            r_final_multiple: Some(500.0),
            max_bisections: Some(80),
            ..SolverOverridesDef::default()
        },
        outputs: OutputsDef::default(),
    }
}

fn sample() -> CaseFile {
    CaseFile {
        version: 1,
        name: "Round trip".to_string(),
        cases: vec![carbon_case(), explicit_case()],
    }
}

#[test]
fn roundtrip_yaml() {
    let file = sample();
    validate_case_file(&file).unwrap();

    let path = std::env::temp_dir().join("tfdh_project_roundtrip.yaml");
    save_yaml(&path, &file).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(file, loaded);
}

#[test]
fn roundtrip_json() {
    let file = sample();
    let path = std::env::temp_dir().join("tfdh_project_roundtrip.json");
    save_json(&path, &file).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(file, loaded);

    // extension dispatch
    assert_eq!(load(&path).unwrap(), file);
}

#[test]
fn empty_case_file_roundtrips() {
    let file = CaseFile {
        version: 1,
        name: "Empty".to_string(),
        cases: vec![],
    };
    let path = std::env::temp_dir().join("tfdh_project_roundtrip_empty.yaml");
    save_yaml(&path, &file).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), file);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("tfdh_project_cases.toml");
    std::fs::write(&path, "version = 1").unwrap();
    assert!(matches!(
        load(&path),
        Err(tfdh_project::ProjectError::UnknownFormat { .. })
    ));
}

#[test]
fn parses_handwritten_yaml() {
    let yaml = r#"
version: 1
name: handwritten
cases:
  - id: iron
    element: Fe56
    plasma:
      density_g_cc: 10.0
      temperature: { unit: KeV, value: 1.0 }
      composition:
        - { element: H, mass_fraction: 0.7 }
        - { element: { a: 4, z: 2, name: Helium }, mass_fraction: 0.3 }
"#;
    let file: CaseFile = serde_yaml::from_str(yaml).unwrap();
    validate_case_file(&file).unwrap();
    let case = &file.cases[0];
    assert_eq!(case.element, ElementDef::Symbol("Fe56".to_string()));
    assert_eq!(case.cutoff, 0.0);
    assert!(!case.plasma.relativistic);
    assert!(case.solver.is_empty());
    assert!(case.outputs.is_empty());
    assert_eq!(
        case.plasma.composition[1].element,
        ElementDef::Explicit {
            a: 4,
            z: 2,
            name: "Helium".to_string()
        }
    );
}
