use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_compatible_translation() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_format_command("%1 of %2", "%2 von %1"), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Format strings are compatible

    ----- stderr -----
    "###);

    Ok(())
}

#[test]
fn test_missing_placeholder() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_format_command("%1 %2", "%1"), @r###"
    success: false
    exit_code: 1
    ----- stdout -----
    ✘ a format specification for argument 2 doesn't exist in '%1'

    ----- stderr -----
    "###);

    Ok(())
}

#[test]
fn test_extra_placeholder() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_format_command("%1", "%1 %3").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "\u{2718} a format specification for argument 3, as in '%1 %3', doesn't exist in '%1'\n"
    );

    Ok(())
}

#[test]
fn test_invalid_template() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_format_command("50%", "50%").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "\u{2718} invalid template: The string ends in the middle of a directive.\n"
    );

    Ok(())
}
