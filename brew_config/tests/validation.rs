use brew_config::load_toml;
use rstest::rstest;

const BASE: &str = r#"
[owfs]
mount = "/mnt/1wire"

[poll]
interval_ms = 1000
"#;

fn with_sensors(extra: &str) -> String {
    format!("{BASE}\n{extra}")
}

#[test]
fn accepts_one_source_per_sensor() {
    let toml = with_sensors(
        r#"
[[sensors]]
name = "Mash"
model = "SEN0161"
analog_pin = 0

[[sensors]]
name = "Boil"
bus_address = "20.1A2B3C000000"
bus_offset = "A"
calibration_offset = -0.12
"#,
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.sensors.len(), 2);
}

#[rstest]
#[case(
    "[[sensors]]\nname = \"x\"\nanalog_pin = 1\nbus_address = \"20.1\"\nbus_offset = \"A\"\n",
    "pick one"
)]
#[case(
    "[[sensors]]\nname = \"x\"\nbus_address = \"20.1\"\n",
    "must be set together"
)]
#[case(
    "[[sensors]]\nname = \"x\"\nbus_address = \"\"\nbus_offset = \"A\"\n",
    "must not be empty"
)]
#[case("[[sensors]]\nname = \"  \"\nanalog_pin = 1\n", "name must not be empty")]
#[case(
    "[[sensors]]\nname = \"a\"\nanalog_pin = 1\n[[sensors]]\nname = \"a\"\nanalog_pin = 2\n",
    "duplicated"
)]
#[case(
    "[[sensors]]\nname = \"x\"\nanalog_pin = 1\ncalibration_offset = 1e13\n",
    "within ±14 pH"
)]
#[case(
    "[[sensors]]\nname = \"x\"\nanalog_pin = 1\ncalibration_offset = -14.5\n",
    "within ±14 pH"
)]
#[case(
    "[[ferment]]\ntype = \"Primary\"\ntime = 7\ntemp = 18.0\ntemp_unit = \"K\"\n",
    "temp_unit"
)]
#[case(
    "[[ferment]]\ntype = \"Primary\"\ntime = -1\ntemp = 18.0\n",
    "time must be >= 0"
)]
fn rejects_invalid_sensor_and_ferment_entries(#[case] extra: &str, #[case] needle: &str) {
    let cfg = load_toml(&with_sensors(extra)).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[test]
fn rejects_zero_poll_interval() {
    let cfg = load_toml("[poll]\ninterval_ms = 0\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject interval_ms=0");
    assert!(format!("{err}").contains("poll.interval_ms must be >= 1"));
}

#[test]
fn rejects_attempt_budget_below_sample_count() {
    let cfg = load_toml("[calibration]\nsamples = 4\nmax_attempts = 3\n").expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains("max_attempts"));
}

#[test]
fn rejects_unknown_rotation() {
    let cfg = load_toml("[logging]\nrotation = \"weekly\"\n").expect("parse TOML");
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_offset_at_scale_edge() {
    let cfg = load_toml("[[sensors]]\nname = \"x\"\nanalog_pin = 1\ncalibration_offset = -14.0\n")
        .expect("parse TOML");
    cfg.validate().expect("offset of exactly 14 is allowed");
}
