use anyhow::Result;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_in(dir: &TempDir, exe: &str, configure: impl FnOnce(&mut Command)) -> Result<Output> {
    let mut command = Command::new(exe);
    command
        .current_dir(dir.path())
        .env_remove("POSTGRES_URL")
        .env_remove("MYSQL_URL")
        .env_remove("MONGODB_URI")
        .env_remove("SEED_CONFIG");
    configure(&mut command);
    Ok(command.output()?)
}

#[test]
fn database_setup_without_urls_prints_hint_and_leaves_no_logs() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_in(&dir, env!("CARGO_BIN_EXE_database_setup"), |_| {})?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("No database URL provided"));
    assert!(!dir.path().join("logs").exists());
    Ok(())
}

#[test]
fn database_setup_ignores_empty_urls() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_in(&dir, env!("CARGO_BIN_EXE_database_setup"), |command| {
        command.env("POSTGRES_URL", "").env("MYSQL_URL", "");
    })?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.starts_with("No database URL provided"));
    Ok(())
}

#[test]
fn nosql_setup_with_empty_uri_prints_hint_and_leaves_no_logs() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_in(&dir, env!("CARGO_BIN_EXE_nosql_setup"), |command| {
        command.env("MONGODB_URI", "");
    })?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("No MongoDB URI provided"));
    assert!(!dir.path().join("logs").exists());
    Ok(())
}

#[test]
fn unconfigured_exit_does_not_depend_on_log_directory() -> Result<()> {
    let dir = TempDir::new()?;
    // 占用 logs 路径，使日志目录无法创建
    std::fs::write(dir.path().join("logs"), "")?;

    let relational = run_in(&dir, env!("CARGO_BIN_EXE_database_setup"), |_| {})?;
    assert!(relational.status.success());
    assert!(String::from_utf8(relational.stdout)?.starts_with("No database URL provided"));

    let document = run_in(&dir, env!("CARGO_BIN_EXE_nosql_setup"), |command| {
        command.env("MONGODB_URI", "");
    })?;
    assert!(document.status.success());
    assert!(String::from_utf8(document.stdout)?.starts_with("No MongoDB URI provided"));
    Ok(())
}
