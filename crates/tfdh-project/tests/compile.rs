use std::path::Path;
use tfdh_core::constants::K_BOLTZMANN;
use tfdh_plasma::Element;
use tfdh_project::schema::*;
use tfdh_project::{ProjectError, ValidationError, compile_case, compile_cases, load_yaml};

fn demo_file() -> CaseFile {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/h_he_impurities.yaml");
    load_yaml(&path).unwrap_or_else(|e| panic!("failed to load demo cases: {e}"))
}

#[test]
fn demo_cases_compile() {
    let file = demo_file();
    let compiled = compile_cases(&file, &[]).unwrap();
    assert_eq!(compiled.len(), 3);

    let carbon = &compiled[0].case;
    assert_eq!(carbon.id, "carbon-1e6K");
    assert_eq!(carbon.element, Element::CARBON);
    assert!((carbon.state.kt() / (1.0e6 * K_BOLTZMANN) - 1.0).abs() < 1e-12);
    // ne = rho / (m_p mu_e) with mu_e = 4/3
    assert!((carbon.state.ne() / 4.485e23 - 1.0).abs() < 1e-3);
    assert_eq!(compiled[0].outputs.json.as_deref(), Some("out/carbon-1e6K.json"));

    let iron = &compiled[1].case;
    assert_eq!(iron.element, Element::IRON_56);
    assert!(iron.state.is_relativistic());
    assert_eq!(iron.cutoff, 1.0);
    assert_eq!(iron.config.r_final_multiple, 2000.0);
    assert_eq!(iron.config.r_init_fraction, 1e-4);

    let custom = &compiled[2].case;
    assert_eq!(custom.element.a(), 13);
    assert_eq!(custom.element.name(), "Carbon-13");
}

#[test]
fn filter_by_id() {
    let file = demo_file();
    let only = vec!["iron-1keV".to_string()];
    let compiled = compile_cases(&file, &only).unwrap();
    assert_eq!(compiled.len(), 1);
    assert_eq!(compiled[0].case.id, "iron-1keV");
}

#[test]
fn kev_temperature_is_thermal_energy() {
    let kt = tfdh_core::units::energy_cgs(TemperatureDef::KeV { value: 1.0 }.thermal_energy());
    assert!((kt / 1.602176634e-9 - 1.0).abs() < 1e-6);
    let kt_k = tfdh_core::units::energy_cgs(
        TemperatureDef::Kelvin {
            value: 1.0e6,
        }
        .thermal_energy(),
    );
    assert!((kt_k / (1.0e6 * K_BOLTZMANN) - 1.0).abs() < 1e-12);
}

#[test]
fn unknown_element_fails_to_compile() {
    let mut file = demo_file();
    file.cases[0].element = ElementDef::Symbol("Xx".to_string());
    let err = compile_case(&file.cases[0]).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::UnknownElement { .. })
    ));
}

#[test]
fn overrides_leave_defaults_alone() {
    let overrides = SolverOverridesDef {
        dv0_step: Some(10.0),
        ode_rel_tol: Some(1e-8),
        ..SolverOverridesDef::default()
    };
    let base = tfdh_solver::ShootingConfig::default();
    let config = overrides.apply(base.clone());
    assert_eq!(config.dv0_step, 10.0);
    assert_eq!(config.ode_tolerances.rel, 1e-8);
    assert_eq!(config.ode_tolerances.abs, base.ode_tolerances.abs);
    assert_eq!(config.max_bisections, base.max_bisections);
}
