mod common;

use std::path::Path;
use std::process::Output;

use axum::routing::post;
use axum::Json;
use serde_json::{json, Value};
use tokio::process::Command;

use common::{fake_cms, fake_cms_with, serve_origin};

/// Run the built binary with a clean environment and logging switched off
async fn councilhub(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_councilhub"))
        .args(args)
        .env_remove("COUNCILHUB_CONFIG")
        .env_remove("COUNCILHUB_API_URL")
        .env("COUNCILHUB_LOG", "off")
        .output()
        .await
        .expect("Failed to execute councilhub")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn write_config(dir: &Path, yaml: &str) -> String {
    let path = dir.join("councilhub.yml");
    std::fs::write(&path, yaml).unwrap();
    path.to_string_lossy().to_string()
}

/// Month header followed by one line per event
fn month_summary(output: &Output) -> String {
    let lines = json_lines(output);
    let header = &lines[0];
    let mut summary = vec![format!(
        "{} prev={} next={}",
        header["month"].as_str().unwrap(),
        header["has_prev"],
        header["has_next"]
    )];
    for line in &lines[1..] {
        summary.push(format!(
            "{} | {} | past={}",
            line["event"]["title"].as_str().unwrap(),
            line["time_label"].as_str().unwrap(),
            line["past"]
        ));
    }
    summary.join("\n")
}

fn ids(values: &Value) -> String {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn partition_summary(output: &Output) -> String {
    let lines = json_lines(output);
    let line = &lines[0];
    format!(
        "next={} upcoming={} recent={}",
        line["next"]["id"].as_str().unwrap(),
        ids(&line["upcoming"]),
        ids(&line["recent"])
    )
}

#[tokio::test]
async fn test_no_command_lists_commands() {
    let output = councilhub(&[]).await;
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Available commands:"));
}

#[tokio::test]
async fn test_events_opens_on_next_event_month() {
    let origin = serve_origin(fake_cms()).await;
    let output = councilhub(&["--api-url", &origin, "--today", "2025-07-18", "events"]).await;

    assert!(output.status.success());
    insta::assert_snapshot!(month_summary(&output), @r"
    2025-07 prev=false next=true
    Community Clean-Up Day | 10:00 | past=true
    Summer Fair | 14:00 | past=false
    ");
}

#[tokio::test]
async fn test_events_month_then_next() {
    let origin = serve_origin(fake_cms()).await;
    let output = councilhub(&[
        "--api-url", &origin, "--today", "2025-07-01", "events", "--month", "2025-07", "--next",
    ])
    .await;

    assert!(output.status.success());
    insta::assert_snapshot!(month_summary(&output), @r"
    2025-12 prev=true next=false
    Carol Service | 18:30 | past=false
    ");
}

#[tokio::test]
async fn test_events_month_then_prev_with_category() {
    let origin = serve_origin(fake_cms()).await;
    let output = councilhub(&[
        "--api-url", &origin, "--today", "2025-07-01", "events", "--month", "2025-12", "--prev",
        "--category", "2",
    ])
    .await;

    assert!(output.status.success());
    insta::assert_snapshot!(month_summary(&output), @r"
    2025-07 prev=false next=true
    Summer Fair | 14:00 | past=false
    ");
}

#[tokio::test]
async fn test_meetings_rule_flag_overrides_config() {
    let origin = serve_origin(fake_cms()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "next_meeting_rule: first_in_descending\n");
    let mut args: Vec<&str> = vec![
        "--api-url", &origin, "--config", &config, "--today", "2025-01-01",
        "meetings", "Full Council Meetings",
    ];

    let from_config = councilhub(&args).await;
    assert!(from_config.status.success());
    insta::assert_snapshot!(partition_summary(&from_config), @"next=2 upcoming=3,2 recent=1");

    args.extend(["--rule", "earliest_upcoming"]);
    let overridden = councilhub(&args).await;
    assert!(overridden.status.success());
    insta::assert_snapshot!(partition_summary(&overridden), @"next=3 upcoming=3,2 recent=1");
}

#[tokio::test]
async fn test_meetings_without_type_lists_allowed_types() {
    let origin = serve_origin(fake_cms()).await;
    let output = councilhub(&["--api-url", &origin, "meetings"]).await;

    let names: Vec<String> = json_lines(&output)
        .iter()
        .map(|line| line["meeting_type"]["name"].as_str().unwrap().to_string())
        .collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Full Council Meetings
    Planning and Development
    ");
}

const CONTACT_ARGS: [&str; 10] = [
    "contact",
    "--name",
    "Jo Bloggs",
    "--email",
    "jo@example.org",
    "--subject",
    "general",
    "--message",
    "The bins were not collected",
    "--privacy",
];

#[tokio::test]
async fn test_contact_sent_exits_zero() {
    let origin = serve_origin(fake_cms()).await;
    let output = councilhub(&[&["--api-url", origin.as_str()][..], &CONTACT_ARGS[..]].concat()).await;

    assert!(output.status.success());
    insta::assert_snapshot!(stdout(&output), @r#"{"status":"sent","message":"Thanks Jo Bloggs"}"#);
}

#[tokio::test]
async fn test_contact_not_sent_exits_non_zero() {
    let router = fake_cms_with(vec![(
        "/api/contact",
        post(|| async { Json(json!({"success": false, "message": "Mailbox full"})) }),
    )]);
    let origin = serve_origin(router).await;
    let output = councilhub(&[&["--api-url", origin.as_str()][..], &CONTACT_ARGS[..]].concat()).await;

    assert!(!output.status.success());
    insta::assert_snapshot!(stdout(&output), @r#"{"status":"failed","message":"Mailbox full"}"#);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Mailbox full"));
}

#[tokio::test]
async fn test_contact_without_consent_sends_nothing() {
    let origin = serve_origin(fake_cms()).await;
    let args = &CONTACT_ARGS[..CONTACT_ARGS.len() - 1];
    let output = councilhub(&[&["--api-url", origin.as_str()][..], args].concat()).await;

    assert!(!output.status.success());
    assert_eq!(stdout(&output), "");
}

#[tokio::test]
async fn test_settings_actions_persist() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("prefs").join("settings.toml");
    let config = write_config(
        dir.path(),
        &format!("settings_path: '{}'\n", settings.display()),
    );

    let mut lines = Vec::new();
    for action in ["toggle-contrast", "toggle-text-size", "show", "reset"] {
        let output = councilhub(&["--config", &config, "settings", action]).await;
        assert!(output.status.success(), "{}", action);
        lines.push(format!("{}: {}", action, stdout(&output)));
    }

    insta::assert_snapshot!(lines.join("\n"), @r#"
    toggle-contrast: {"high_contrast":true,"large_text":false}
    toggle-text-size: {"high_contrast":true,"large_text":true}
    show: {"high_contrast":true,"large_text":true}
    reset: {"high_contrast":false,"large_text":false}
    "#);
    assert!(settings.exists());
}
