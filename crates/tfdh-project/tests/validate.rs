use tfdh_project::schema::*;
use tfdh_project::{ValidationError, validate_case_file};

fn case(id: &str) -> CaseDef {
    CaseDef {
        id: id.to_string(),
        description: None,
        element: ElementDef::Symbol("O".to_string()),
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
        outputs: OutputsDef::default(),
    }
}

fn file(cases: Vec<CaseDef>) -> CaseFile {
    CaseFile {
        version: 1,
        name: "validation".to_string(),
        cases,
    }
}

fn invalid_field(result: Result<(), ValidationError>) -> String {
    match result {
        Err(ValidationError::InvalidValue { field, .. }) => field,
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn valid_file_passes() {
    validate_case_file(&file(vec![case("a"), case("b")])).unwrap();
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = validate_case_file(&file(vec![case("a"), case("a")])).unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateId { id, .. } if id == "a"));
}

#[test]
fn unsupported_version_is_rejected() {
    let mut f = file(vec![]);
    f.version = 7;
    assert!(matches!(
        validate_case_file(&f),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    ));
    f.version = 0;
    assert!(validate_case_file(&f).is_err());
}

#[test]
fn non_positive_density_and_temperature() {
    let mut c = case("rho");
    c.plasma.density_g_cc = -1.0;
    assert_eq!(
        invalid_field(validate_case_file(&file(vec![c]))),
        "rho.plasma.density_g_cc"
    );

    let mut c = case("t");
    c.plasma.temperature = TemperatureDef::KeV { value: 0.0 };
    assert_eq!(
        invalid_field(validate_case_file(&file(vec![c]))),
        "t.plasma.temperature"
    );
}

#[test]
fn mass_fractions_must_sum_to_one() {
    let mut c = case("x");
    c.plasma.composition[0].mass_fraction = 0.6;
    c.plasma.composition[1].mass_fraction = 0.6;
    assert_eq!(
        invalid_field(validate_case_file(&file(vec![c]))),
        "x.plasma.composition"
    );

    let mut c = case("y");
    c.plasma.composition.clear();
    assert!(validate_case_file(&file(vec![c])).is_err());
}

#[test]
fn unknown_elements_are_reported() {
    let mut c = case("u");
    c.element = ElementDef::Symbol("Unobtainium".to_string());
    assert!(matches!(
        validate_case_file(&file(vec![c])),
        Err(ValidationError::UnknownElement { key, .. }) if key == "Unobtainium"
    ));

    let mut c = case("v");
    c.element = ElementDef::Explicit {
        a: 2,
        z: 6,
        name: "bogus".to_string(),
    };
    assert_eq!(invalid_field(validate_case_file(&file(vec![c]))), "case 'v' element");
}

#[test]
fn solver_overrides_are_checked() {
    let mut c = case("s");
    c.solver.max_bisections = Some(0);
    assert_eq!(
        invalid_field(validate_case_file(&file(vec![c]))),
        "s.solver.max_bisections"
    );

    let mut c = case("r");
    c.solver.r_final_multiple = Some(-5.0);
    assert_eq!(
        invalid_field(validate_case_file(&file(vec![c]))),
        "r.solver.r_final_multiple"
    );

    let mut c = case("k");
    c.cutoff = -0.5;
    assert_eq!(invalid_field(validate_case_file(&file(vec![c]))), "k.cutoff");
}
