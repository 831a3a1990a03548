use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

fn run_bin(args: &[&str]) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_vacnet"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
}

fn write_config(test_dir: &Path, contents: &str) {
    fs::remove_dir_all(test_dir).ok();
    fs::create_dir(test_dir).expect("failed to create test directory");
    fs::write(test_dir.join("config.toml"), contents).expect("failed to write config file");
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    let config_contents = String::new()
        + "[model]\n"
        + "prob_infection = 0.3\n"
        + "prob_recovery = 0.1\n"
        + "prob_death = 0.002\n"
        + "efficacy_a = 0.79\n"
        + "efficacy_b = 0.95\n"
        + "\n"
        + "[init]\n"
        + "n_agents = 200\n"
        + "avg_degree = 4.0\n"
        + "frac_infected = 0.05\n"
        + "frac_vaccine_a = 0.2\n"
        + "frac_vaccine_b = 0.3\n"
        + "\n"
        + "[output]\n"
        + "n_ticks = 50\n";

    write_config(&test_dir, &config_contents);

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--sim-dir", test_dir_str, "run", "--seed", "42"]);
    run_bin(&["--sim-dir", test_dir_str, "run"]);

    for run_dir in ["run-0000", "run-0001"] {
        assert!(test_dir.join(run_dir).join("time-series.msgpack").is_file());
        assert!(test_dir.join(run_dir).join("network.msgpack").is_file());
    }

    run_bin(&["--sim-dir", test_dir_str, "analyze"]);

    for run_dir in ["run-0000", "run-0001"] {
        assert!(test_dir.join(run_dir).join("summary.msgpack").is_file());
    }

    run_bin(&["--sim-dir", test_dir_str, "clean"]);

    assert!(!test_dir.join("run-0000").exists());
    assert!(!test_dir.join("run-0001").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn same_seed_writes_same_time_series() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("same_seed");

    let config_contents = String::new()
        + "[model]\n"
        + "prob_infection = 0.5\n"
        + "prob_recovery = 0.2\n"
        + "prob_death = 0.01\n"
        + "efficacy_a = 0.5\n"
        + "efficacy_b = 0.9\n"
        + "\n"
        + "[init]\n"
        + "n_agents = 100\n"
        + "avg_degree = 5.0\n"
        + "frac_infected = 0.1\n"
        + "frac_vaccine_a = 0.1\n"
        + "frac_vaccine_b = 0.1\n"
        + "\n"
        + "[output]\n"
        + "n_ticks = 30\n";

    write_config(&test_dir, &config_contents);

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--sim-dir", test_dir_str, "run", "--seed", "7"]);
    run_bin(&["--sim-dir", test_dir_str, "run", "--seed", "7"]);

    let read = |run_dir: &str| {
        fs::read(test_dir.join(run_dir).join("time-series.msgpack"))
            .expect("failed to read time series")
    };
    assert_eq!(read("run-0000"), read("run-0001"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config");

    let config_contents = String::new()
        + "[model]\n"
        + "prob_infection = 1.5\n"
        + "prob_recovery = 0.1\n"
        + "prob_death = 0.002\n"
        + "efficacy_a = 0.79\n"
        + "efficacy_b = 0.95\n"
        + "\n"
        + "[init]\n"
        + "n_agents = 10\n"
        + "avg_degree = 4.0\n"
        + "frac_infected = 0.1\n"
        + "frac_vaccine_a = 0.0\n"
        + "frac_vaccine_b = 0.0\n"
        + "\n"
        + "[output]\n"
        + "n_ticks = 10\n";

    write_config(&test_dir, &config_contents);

    let output = Command::new(env!("CARGO_BIN_EXE_vacnet"))
        .args(["--sim-dir", test_dir.to_str().expect("invalid path"), "run"])
        .output()
        .expect("failed to execute command");

    assert!(!output.status.success());
    assert!(!test_dir.join("run-0000").exists());

    fs::remove_dir_all(&test_dir).ok();
}
