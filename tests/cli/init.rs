use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .armatextrc.json

    ----- stderr -----
    "###);

    let content = test.read_file(".armatextrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["."]));
    assert_eq!(parsed["defaultKeywords"], Value::Bool(true));
    assert_eq!(parsed["output"], "messages.pot");
    assert!(parsed.get("addComments").is_none());

    Ok(())
}

#[test]
fn test_init_keeps_existing_config() -> Result<()> {
    let test = CliTest::with_file(".armatextrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r###"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .armatextrc.json already exists
    "###);

    assert_eq!(test.read_file(".armatextrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_extract_after_init() -> Result<()> {
    let test = CliTest::with_file("addons/main/fn_a.sqf", r#"hint localize "STR_a";"#)?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    assert!(test.read_file("messages.pot")?.contains("msgid \"STR_a\"\n"));

    Ok(())
}
