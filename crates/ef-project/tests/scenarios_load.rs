use ef_project::load;
use ef_sim::{ReservoirPairSimulator, SystemType};
use std::path::PathBuf;

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("scenarios")
}

#[test]
fn bundled_scenarios_load_and_run() {
    let mut count = 0;
    for entry in std::fs::read_dir(scenarios_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let scenario = load(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let mut sim = ReservoirPairSimulator::new(scenario.parameters.clone()).unwrap();
        sim.run_to_completion().unwrap();
        assert!(sim.is_finished(), "{}", path.display());
        count += 1;
    }
    assert!(count >= 3);
}

#[test]
fn isolated_scenario_keeps_defaults() {
    let scenario = load(&scenarios_dir().join("isolated.yaml")).unwrap();
    assert_eq!(scenario.parameters.system_type, SystemType::Isolated);
    assert_eq!(scenario.parameters.t_hot_initial_k, 400.0);
    assert_eq!(scenario.parameters.max_time_s, 200.0);
}

#[test]
fn default_scenario_carries_sweep() {
    let scenario = load(&scenarios_dir().join("default.yaml")).unwrap();
    let sweep = scenario.sweep.expect("default scenario defines a sweep");
    assert_eq!(sweep.points, 50);
    assert_eq!(scenario.ambient_temperature_k, 298.0);
}
