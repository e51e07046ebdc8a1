use std::process::Command;

#[derive(Debug)]
struct Row {
    cost: i64,
    peak: i64,
}

#[test]
fn presets_run_via_cli_and_project_distinct_figures() {
    let default = run_and_parse(&["--preset", "default"]);
    let ev_heavy = run_and_parse(&["--preset", "ev_heavy"]);
    let solar_rich = run_and_parse(&["--preset", "solar_rich"]);

    assert_eq!(default.0, 30);
    assert_eq!(default.1.cost, 91);
    let bare = run_and_parse(&[]);
    assert_eq!(bare.0, default.0);
    assert_eq!(bare.1.cost, default.1.cost);
    assert_eq!(ev_heavy.0, 45);
    assert_eq!(solar_rich.0, 40);

    assert!(
        ev_heavy.1.peak < solar_rich.1.peak && solar_rich.1.peak < default.1.peak,
        "expected peak to fall with participation: default={:?} ev_heavy={:?} solar_rich={:?}",
        default.1,
        ev_heavy.1,
        solar_rich.1
    );
}

#[test]
fn participation_override_and_toml_config() {
    let (pct, row) = run_and_parse(&["--participation", "50"]);
    assert_eq!(pct, 50);
    assert_eq!(row.cost, 85);
    assert_eq!(row.peak, 225);

    let path = std::env::temp_dir().join(format!("colab-planner-it-{}.toml", std::process::id()));
    std::fs::write(&path, "[strategy]\nparticipation_pct = 10\n").unwrap();
    let (pct, row) = run_and_parse(&["--config", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);
    assert_eq!(pct, 10);
    assert_eq!(row.cost, 97);
}

#[test]
fn invalid_inputs_exit_with_error() {
    let bad_preset = planner(&["--preset", "nope"]);
    assert!(!bad_preset.status.success());
    assert!(String::from_utf8_lossy(&bad_preset.stderr).contains("unknown preset"));

    let bad_flag = planner(&["--bogus"]);
    assert_eq!(bad_flag.status.code(), Some(2));

    let out_of_range = planner(&["--participation", "150"]);
    assert!(!out_of_range.status.success());
    assert!(String::from_utf8_lossy(&out_of_range.stderr).contains("strategy.participation_pct"));
}

#[test]
fn curves_out_writes_seeded_csv() {
    let dir = std::env::temp_dir();
    let a = dir.join(format!("colab-planner-curves-a-{}.csv", std::process::id()));
    let b = dir.join(format!("colab-planner-curves-b-{}.csv", std::process::id()));
    for path in [&a, &b] {
        let out = planner(&["--seed", "7", "--curves-out", path.to_str().unwrap()]);
        assert!(out.status.success());
    }
    let text_a = std::fs::read_to_string(&a).unwrap();
    let text_b = std::fs::read_to_string(&b).unwrap();
    let _ = std::fs::remove_file(&a);
    let _ = std::fs::remove_file(&b);

    assert_eq!(text_a, text_b);
    assert_eq!(text_a.lines().count(), 25);
}

fn planner(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_colab-planner"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("colab-planner process should run")
}

/// Returns the projected participation and the Strategy A row.
fn run_and_parse(args: &[&str]) -> (i64, Row) {
    let output = planner(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    (parse_participation(&stdout), parse_row(&stdout, "Strategy A"))
}

fn parse_participation(stdout: &str) -> i64 {
    let raw = stdout
        .split_once("(participation ")
        .and_then(|(_, rest)| rest.split_once('%'))
        .map(|(pct, _)| pct)
        .unwrap_or_else(|| panic!("missing projection header in output: {stdout}"));
    raw.parse()
        .unwrap_or_else(|_| panic!("failed parsing participation `{raw}`"))
}

fn parse_row(stdout: &str, label: &str) -> Row {
    let line = stdout
        .lines()
        .find(|line| line.starts_with(label))
        .unwrap_or_else(|| panic!("missing row `{label}` in output: {stdout}"));
    let numbers: Vec<i64> = line[label.len()..]
        .split_whitespace()
        .take(2)
        .map(|v| v.parse().unwrap_or_else(|_| panic!("bad value `{v}` in `{line}`")))
        .collect();
    Row {
        cost: numbers[0],
        peak: numbers[1],
    }
}
