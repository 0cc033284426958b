use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const ANALOG_SENSOR: &str = r#"
[[sensors]]
name = "Mash pH"
model = "SEN0161"
analog_pin = 0
"#;

const BUS_SENSOR: &str = r#"
[[sensors]]
name = "Boil pH"
model = "SEN0161"
bus_address = "20.1A2B3C000000"
bus_offset = "A"
"#;

const SCHEDULE: &str = r#"
[[ferment]]
type = "Secondary"
time = 14
temp = 18.0

[[ferment]]
type = "Primary"
time = 7
temp = 20.0
"#;

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("brewctl.toml");
    fs::write(&path, format!("[poll]\ninterval_ms = 10\n{body}")).unwrap();
    path
}

fn brewctl(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("brewctl").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("BREWCTL_SIM_COUNTS")
        .env_remove("BREWCTL_SIM_VOLTS")
        .arg("--config")
        .arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["models"], 0, "SEN0161", "stdout")]
#[case(&["self-check"], 0, "ok (1 sensors)", "stdout")]
#[case(&["ferment-xml"], 0, "<TYPE>Primary</TYPE>", "stdout")]
#[case(&["ferment-xml", "--unit", "f"], 0, "<TEMP>68.0</TEMP>", "stdout")]
#[case(&["read"], 0, "Mash pH: reading=10 pH=0.170898 [SEN0161]", "stdout")]
#[case(&["ferment-xml", "--unit", "k"], 2, "invalid value", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &format!("{ANALOG_SENSOR}{SCHEDULE}"));

    let mut cmd = brewctl(&cfg);
    cmd.env("BREWCTL_SIM_COUNTS", "10");
    cmd.args(args);

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn ferment_xml_lists_steps_in_schedule_order() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, SCHEDULE);

    let out = brewctl(&cfg).arg("ferment-xml").output().unwrap();
    assert!(out.status.success());
    let xml = String::from_utf8(out.stdout).unwrap();
    let primary = xml.find("<TYPE>Primary</TYPE>").unwrap();
    let secondary = xml.find("<TYPE>Secondary</TYPE>").unwrap();
    assert!(primary < secondary);
    assert!(xml.starts_with("    <FERMENTATION_STEPS>"));
}

#[test]
fn json_read_uses_report_field_names() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, ANALOG_SENSOR);

    let out = brewctl(&cfg)
        .env("BREWCTL_SIM_COUNTS", "10")
        .arg("--json")
        .arg("read")
        .output()
        .unwrap();
    assert!(out.status.success());
    let line = String::from_utf8(out.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(v["name"], "Mash pH");
    assert_eq!(v["deviceType"], "SEN0161");
    assert_eq!(v["phReading"], serde_json::json!(10.0));
    assert_eq!(v["faulted"], false);
    assert!((v["ph"].as_f64().unwrap() - 0.170898).abs() < 1e-9);
}

#[test]
fn zero_counts_report_ph_unavailable() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, ANALOG_SENSOR);

    brewctl(&cfg)
        .env("BREWCTL_SIM_COUNTS", "0")
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("pH=n/a"))
        .stderr(predicate::str::contains("pH unavailable"));
}

#[test]
fn failing_bus_marks_sensor_faulted_and_logs_once() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, BUS_SENSOR);

    let out = brewctl(&cfg)
        .env("BREWCTL_SIM_VOLTS", "x")
        .arg("read")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Boil pH: reading=0 pH=n/a [SEN0161] (faulted)"));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert_eq!(stderr.matches("pH reading failed").count(), 1);
}

#[test]
fn bus_sensor_reads_volts() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, BUS_SENSOR);

    brewctl(&cfg)
        .env("BREWCTL_SIM_VOLTS", "2.5")
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("reading=2.5 pH=0.042725"));
}

#[test]
fn poll_stops_after_count() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, ANALOG_SENSOR);

    let out = brewctl(&cfg)
        .env("BREWCTL_SIM_COUNTS", "10")
        .args(["--json", "poll", "--count", "2", "--interval-ms", "5"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for l in lines {
        let v: serde_json::Value = serde_json::from_str(l).unwrap();
        assert_eq!(v["name"], "Mash pH");
    }
}

#[test]
fn conflicting_sources_are_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_config(
        &dir,
        "[[sensors]]\nanalog_pin = 1\nbus_address = \"20.1\"\nbus_offset = \"A\"\n",
    );

    brewctl(&cfg)
        .arg("read")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pick one"));
}

#[test]
fn missing_config_is_reported() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("nope.toml");

    brewctl(&cfg)
        .arg("read")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read the config file"));
}

#[test]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[calibration]\nsamples = 0\n");

    let out = brewctl(&cfg).args(["--json", "read"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let v: serde_json::Value =
        serde_json::from_str(String::from_utf8(out.stderr).unwrap().trim()).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(
        v["message"]
            .as_str()
            .unwrap()
            .contains("calibration.samples must be >= 1")
    );
}

#[test]
fn calibration_overflow_only_affects_that_sensor() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &format!("{ANALOG_SENSOR}{BUS_SENSOR}"));

    brewctl(&cfg)
        .env("BREWCTL_SIM_COUNTS", "10")
        .env("BREWCTL_SIM_VOLTS", "9000000000000")
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Mash pH: reading=10 pH=0.170898 [SEN0161]",
        ))
        .stdout(predicate::str::contains(
            "Boil pH: reading=9000000000000 pH=n/a [SEN0161]",
        ))
        .stderr(predicate::str::contains("overflowed"));
}

#[test]
fn poll_reports_reading_behind_the_printed_ph() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, ANALOG_SENSOR);

    // The first cycle reads 5; pH sampling then sees the steady 10s.
    let out = brewctl(&cfg)
        .env("BREWCTL_SIM_COUNTS", "5,10")
        .args(["--json", "poll", "--count", "2", "--interval-ms", "5"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    for l in stdout.lines() {
        let v: serde_json::Value = serde_json::from_str(l).unwrap();
        assert!((v["ph"].as_f64().unwrap() - 0.170898).abs() < 1e-9);
        assert_eq!(v["phReading"], serde_json::json!(10.0), "line: {l}");
    }
}
