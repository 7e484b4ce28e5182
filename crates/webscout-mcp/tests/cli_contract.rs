use assert_cmd::Command;
use predicates::prelude::*;

fn webscout() -> Command {
    Command::cargo_bin("webscout").unwrap()
}

#[test]
fn tools_prints_the_operation_catalog() {
    webscout()
        .arg("tools")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("search_web")
                .and(predicate::str::contains("search_news"))
                .and(predicate::str::contains("search_tech"))
                .and(predicate::str::contains("get_tool_info")),
        );
}

#[test]
fn info_prints_a_stable_descriptor() {
    webscout()
        .arg("info")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"name\": \"webscout\"")
                .and(predicate::str::contains("\"version\""))
                .and(predicate::str::contains("\"functions\"")),
        );
}

#[test]
fn call_with_unknown_operation_reports_an_error_envelope() {
    // Unknown names short-circuit before any network traffic.
    webscout()
        .args(["call", "delete_everything"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"status\": \"error\"")
                .and(predicate::str::contains("delete_everything")),
        );
}

#[test]
fn call_with_malformed_params_reports_invalid_syntax() {
    webscout()
        .args(["call", "search_web", "--params", "{oops"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid parameter syntax"));
}

#[test]
fn call_get_tool_info_round_trips_json() {
    let out = webscout()
        .args(["call", "get_tool_info"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["status"], "success");
    assert_eq!(v["name"], "webscout");
    assert_eq!(v["functions"].as_array().map(Vec::len), Some(4));
}
