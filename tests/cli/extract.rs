use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

/// Everything after the POT header.
fn pot_body(pot: &str) -> &str {
    pot.split_once("\n\n").map_or("", |(_, body)| body)
}

#[test]
fn test_extract_writes_pot() -> Result<()> {
    let test = CliTest::with_file(
        "addons/main/fn_hint.sqf",
        r#"// Greeting
hint localize "STR_hello";
hint format [localize "STR_count", _n];
"#,
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "\u{2713} Extracted 2 messages from 1 source file into messages.pot\n"
    );

    let pot = test.read_file("messages.pot")?;
    assert!(pot.starts_with("# SOME DESCRIPTIVE TITLE.\n"));
    assert_eq!(
        pot_body(&pot),
        r#"#: addons/main/fn_hint.sqf:2
msgid "STR_hello"
msgstr ""

#: addons/main/fn_hint.sqf:3
#, arma-format
msgid "STR_count"
msgstr ""
"#
    );

    Ok(())
}

#[test]
fn test_extract_to_stdout() -> Result<()> {
    let test = CliTest::with_file("fn_a.sqf", r#"hint localize "STR_a";"#)?;

    assert_cmd_snapshot!(test.extract_command().args(["-o", "-"]), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    # SOME DESCRIPTIVE TITLE.
    # Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER
    # This file is distributed under the same license as the PACKAGE package.
    # FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.
    #
    #, fuzzy
    msgid ""
    msgstr ""
    "Project-Id-Version: PACKAGE VERSION\n"
    "Report-Msgid-Bugs-To: \n"
    "PO-Revision-Date: YEAR-MO-DA HO:MI+ZONE\n"
    "Last-Translator: FULL NAME <EMAIL@ADDRESS>\n"
    "Language-Team: LANGUAGE <LL@li.org>\n"
    "Language: \n"
    "MIME-Version: 1.0\n"
    "Content-Type: text/plain; charset=UTF-8\n"
    "Content-Transfer-Encoding: 8bit\n"

    #: fn_a.sqf:1
    msgid "STR_a"
    msgstr ""

    ----- stderr -----
    ✓ Extracted 1 message from 1 source file
    "###);

    Ok(())
}

#[test]
fn test_extract_json() -> Result<()> {
    let test = CliTest::with_file(
        "fn_a.sqf",
        "hint localize \"STR_a\";\nhint localize \"STR_a\";",
    )?;

    let output = test.extract_command().args(["--json", "-o", "-"]).output()?;
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        json,
        serde_json::json!([{
            "msgid": "STR_a",
            "references": [
                { "file": "fn_a.sqf", "line": 1 },
                { "file": "fn_a.sqf", "line": 2 }
            ],
            "format": "undecided"
        }])
    );

    Ok(())
}

#[test]
fn test_keyword_options() -> Result<()> {
    let test = CliTest::with_file(
        "fn_ui.sqf",
        r#"
hint localize "STR_skipped";
[_ctrl, "Ready"] call tr;
tr(_ctrl, "Save");
ctx("menu", "Open");
"#,
    )?;

    let output = test
        .extract_command()
        .args(["--no-default-keywords", "-k", "tr:2", "-k", "ctx:1c,2", "-o", "-"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        pot_body(&String::from_utf8_lossy(&output.stdout)),
        r#"#: fn_ui.sqf:4
msgid "Save"
msgstr ""

#: fn_ui.sqf:5
msgctxt "menu"
msgid "Open"
msgstr ""
"#
    );

    Ok(())
}

#[test]
fn test_add_comments() -> Result<()> {
    let test = CliTest::with_file(
        "fn_a.sqf",
        r#"// helper note
// TRANSLATORS: button on the main menu
hint localize "STR_play";
"#,
    )?;

    let output = test
        .extract_command()
        .args(["--add-comments=TRANSLATORS:", "-o", "-"])
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#. TRANSLATORS: button on the main menu\n#: fn_a.sqf:3\n"));
    assert!(!stdout.contains("helper note"));

    Ok(())
}

#[test]
fn test_extract_all() -> Result<()> {
    let test = CliTest::with_file("fn_a.sqf", r#"_title = "Mission"; hint localize "STR_b";"#)?;

    let output = test.extract_command().args(["-a", "-o", "-"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("msgid \"Mission\"\n"));
    assert!(stdout.contains("msgid \"STR_b\"\n"));

    Ok(())
}

#[test]
fn test_tagged_literals_in_config() -> Result<()> {
    let test = CliTest::with_file(
        "addons/main/config.cpp",
        r#"class CfgVehicles {
    class MyCar {
        displayName = $STR_MyCar_Name;
    };
};
"#,
    )?;

    let output = test.extract_command().args(["-o", "-"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#: addons/main/config.cpp:3\nmsgid \"str_MyCar_Name\"\n"));

    Ok(())
}

#[test]
fn test_line_markers_change_references() -> Result<()> {
    let test = CliTest::with_file(
        "build/fn_a.sqf",
        "#line 10 \"addons/main/fn_a.sqf\"\nhint localize \"STR_a\";\n",
    )?;

    let output = test.extract_command().args(["-o", "-"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#: addons/main/fn_a.sqf:10\n"));

    Ok(())
}

#[test]
fn test_paths_argument() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("addons/main/fn_a.sqf", r#"hint localize "STR_main";"#)?;
    test.write_file("addons/ui/fn_b.sqf", r#"hint localize "STR_ui";"#)?;

    let output = test
        .extract_command()
        .args(["addons/ui", "-o", "-"])
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#: addons/ui/fn_b.sqf:1\n"));
    assert!(!stdout.contains("STR_main"));

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".armatextrc.json",
        r#"{
  "includes": ["addons"],
  "ignores": ["**/old/**"],
  "keywords": ["BIS_fnc_localize"],
  "output": "l10n/mission.pot",
  "packageName": "My Mission 1.0"
}"#,
    )?;
    test.write_file(
        "addons/main/fn_a.sqf",
        r#"hint ("STR_bis" call BIS_fnc_localize); hint BIS_fnc_localize("STR_call");"#,
    )?;
    test.write_file("addons/old/fn_b.sqf", r#"hint localize "STR_old";"#)?;
    test.write_file("tools/fn_c.sqf", r#"hint localize "STR_tool";"#)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    let pot = test.read_file("l10n/mission.pot")?;
    assert!(pot.contains("\"Project-Id-Version: My Mission 1.0\\n\"\n"));
    assert_eq!(
        pot_body(&pot),
        r#"#: addons/main/fn_a.sqf:1
msgid "STR_call"
msgstr ""
"#
    );

    Ok(())
}

#[test]
fn test_warnings_are_reported() -> Result<()> {
    let test = CliTest::with_file("fn_a.sqf", "hint localize \"STR_open\n;\n")?;

    let output = test.extract_command().args(["-o", "-"]).output()?;
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fn_a.sqf:1: warning: unterminated string literal\n"));
    assert!(stderr.contains("1 warning"));

    Ok(())
}

#[test]
fn test_invalid_keyword_is_an_error() -> Result<()> {
    let test = CliTest::with_file("fn_a.sqf", "")?;

    let output = test.extract_command().args(["-k", "1bad"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: Invalid keyword in 'keywords': \"1bad\""));
    assert!(!test.root().join("messages.pot").exists());

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".armatextrc.json", r#"{ "flags": ["format:1:c-format"] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid flag in 'flags'"));

    Ok(())
}
