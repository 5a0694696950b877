//! Integration tests for the AeroCode CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.
//! Every invocation starts from the seeded fixture data.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an aerocode command isolated from the user's environment
fn aerocode() -> Command {
    let mut cmd = Command::cargo_bin("aerocode").unwrap();
    cmd.env("AEROCODE_LOGIN_DELAY_MS", "0")
        .env("AEROCODE_REPORT_DELAY_MS", "0")
        .env_remove("AEROCODE_USER")
        .env_remove("AEROCODE_PASSWORD")
        .env_remove("AEROCODE_CONFIG")
        .env_remove("AEROCODE_FORMAT")
        .env_remove("AEROCODE_DOWNLOAD_PREFIX")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to get a command already logged in as one of the mock users
fn aerocode_as(user: &str) -> Command {
    let mut cmd = aerocode();
    cmd.args(["--user", user, "--password", "123"]);
    cmd
}

/// Helper to create an empty config directory so the global config never leaks in
fn isolated_config() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    aerocode()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("production stages"));
}

#[test]
fn test_version_displays() {
    aerocode()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aerocode"));
}

#[test]
fn test_unknown_command_fails() {
    aerocode()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_whoami_without_login() {
    aerocode()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_whoami_shows_modules() {
    aerocode_as("operador")
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Op. Produção"))
        .stdout(predicate::str::contains("parts"))
        .stdout(predicate::str::contains("execute production stages"));
}

#[test]
fn test_whoami_json() {
    aerocode_as("admin")
        .args(["whoami", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Adm. Global\""))
        .stdout(predicate::str::contains("user administration"));
}

#[test]
fn test_login_with_bad_password_fails() {
    aerocode()
        .args(["login", "admin", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid username or password"));
}

#[test]
fn test_login_succeeds() {
    aerocode()
        .args(["login", "engenheiro", "--password", "123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as"))
        .stdout(predicate::str::contains("Eng. Chefe"));
}

#[test]
fn test_command_requires_login() {
    aerocode()
        .args(["part", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_operator_cannot_open_aircraft() {
    aerocode_as("operador")
        .args(["acft", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not allowed to"));
}

#[test]
fn test_admin_cannot_start_stage() {
    aerocode_as("admin")
        .args(["stage", "start", "F35", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission_denied"))
        .stderr(predicate::str::contains("not allowed to"));
}

// ============================================================================
// Aircraft Command Tests
// ============================================================================

#[test]
fn test_acft_list_filters_by_status() {
    aerocode_as("engenheiro")
        .args(["acft", "list", "--status", "ready", "-f", "id"])
        .assert()
        .success()
        .stdout("A350\nA220\nF16\n");
}

#[test]
fn test_acft_list_portuguese_alias() {
    aerocode_as("engenheiro")
        .args(["acft", "list", "--status", "pronta", "--count"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_acft_new_rejects_duplicate_code() {
    aerocode_as("engenheiro")
        .args([
            "acft", "new", "--code", "e175", "--model", "Dup", "--capacity", "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_acft_show_lists_stages() {
    aerocode_as("engenheiro")
        .args(["acft", "show", "E175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EMB-175"))
        .stdout(predicate::str::contains("Instalação Elétrica"));
}

#[test]
fn test_acft_show_json() {
    aerocode_as("admin")
        .args(["acft", "show", "F35", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"MILITAR\""));
}

// ============================================================================
// Stage Command Tests
// ============================================================================

#[test]
fn test_stage_start_pending() {
    aerocode_as("operador")
        .args(["stage", "start", "F35", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EM ANDAMENTO"));
}

#[test]
fn test_stage_finish_requires_in_progress() {
    aerocode_as("operador")
        .args(["stage", "finish", "F35", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot"));
}

#[test]
fn test_stage_list_for_aircraft() {
    aerocode_as("operador")
        .args(["stage", "list", "--aircraft", "E175", "--count"])
        .assert()
        .success()
        .stdout("4\n");
}

// ============================================================================
// Part Command Tests
// ============================================================================

#[test]
fn test_part_list_in_stock() {
    aerocode_as("operador")
        .args(["part", "list", "--status", "in-stock", "-f", "id"])
        .assert()
        .success()
        .stdout("101\n105\n107\n110\n");
}

#[test]
fn test_part_new_registers() {
    aerocode_as("engenheiro")
        .args([
            "part",
            "new",
            "--code",
            "PC-900",
            "--name",
            "Flap",
            "--kind",
            "wing",
            "--supplier",
            "Embraer",
            "--aircraft",
            "e175",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered part"))
        .stdout(predicate::str::contains("E175"));
}

#[test]
fn test_part_new_rejects_unknown_aircraft() {
    aerocode_as("engenheiro")
        .args([
            "part", "new", "--code", "PC-901", "--name", "Flap", "--supplier", "X",
            "--aircraft", "ZZZ",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_part_edit_blank_aircraft_detaches() {
    aerocode_as("engenheiro")
        .args(["part", "edit", "102", "--aircraft", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated part 102"))
        .stdout(predicate::str::contains("no aircraft"));
}

#[test]
fn test_part_show_unknown_carries_diagnostic_code() {
    aerocode_as("operador")
        .args(["part", "show", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("part '999' not found"))
        .stderr(predicate::str::contains("store::not_found"));
}

#[test]
fn test_part_delete_with_yes() {
    aerocode_as("engenheiro")
        .args(["part", "delete", "101", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted part 101"));
}

#[test]
fn test_part_delete_needs_confirmation_when_piped() {
    aerocode_as("engenheiro")
        .args(["part", "delete", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmation required"));
}

#[test]
fn test_part_csv_output() {
    aerocode_as("operador")
        .args(["part", "list", "--kind", "engine", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Motor Esquerdo"))
        .stdout(predicate::str::contains("Motor Direito"));
}

// ============================================================================
// Test Command Tests
// ============================================================================

#[test]
fn test_test_record_pending() {
    aerocode_as("engenheiro")
        .args(["test", "record", "3", "--result", "approved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded test 3"))
        .stdout(predicate::str::contains("APROVADO"));
}

#[test]
fn test_test_record_already_recorded() {
    aerocode_as("engenheiro")
        .args(["test", "record", "1", "--result", "rejected"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already recorded"));
}

#[test]
fn test_test_list_pending_count() {
    aerocode_as("engenheiro")
        .args(["test", "list", "--result", "pending", "--count"])
        .assert()
        .success()
        .stdout("5\n");
}

// ============================================================================
// User Command Tests
// ============================================================================

#[test]
fn test_user_list_admin_only() {
    aerocode_as("engenheiro")
        .args(["user", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not allowed to"));

    aerocode_as("admin")
        .args(["user", "list", "--count"])
        .assert()
        .success()
        .stdout("12\n");
}

// ============================================================================
// Report Command Tests
// ============================================================================

#[test]
fn test_report_generate_wait() {
    aerocode_as("engenheiro")
        .args([
            "report",
            "generate",
            "--name",
            "Inventário",
            "--kind",
            "part-logistics",
            "--param",
            "month=10",
            "--wait",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GERADO"))
        .stdout(predicate::str::contains("/downloads"));
}

#[test]
fn test_report_generate_without_wait_is_pending() {
    aerocode_as("engenheiro")
        .env("AEROCODE_REPORT_DELAY_MS", "60000")
        .args(["report", "generate", "--name", "Q4", "--kind", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PENDENTE"));
}

#[test]
fn test_report_param_requires_equals() {
    aerocode_as("engenheiro")
        .args([
            "report", "generate", "--name", "Q4", "--kind", "production", "--param", "month",
        ])
        .assert()
        .failure();
}

// ============================================================================
// Status Command Tests
// ============================================================================

#[test]
fn test_status_hides_restricted_sections() {
    aerocode_as("operador")
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PARTS"))
        .stdout(predicate::str::contains("REPORTS").not());
}

// ============================================================================
// Shell Tests
// ============================================================================

#[test]
fn test_shell_keeps_changes_between_commands() {
    aerocode()
        .args(["shell", "--password", "123"])
        .write_stdin("login engenheiro\npart delete 102 --yes\npart list --count\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted part 102"))
        .stdout(predicate::str::contains("9\n"));
}

#[test]
fn test_shell_survives_errors() {
    aerocode()
        .args(["shell", "--password", "123"])
        .write_stdin("part list\nfly E175\nlogin operador\nwhoami\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("not logged in"))
        .stdout(predicate::str::contains("Op. Produção"));
}

#[test]
fn test_shell_announces_generated_reports() {
    aerocode_as("engenheiro")
        .arg("shell")
        .write_stdin("report generate --name Q4 --kind production\nstatus --section reports\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Report \d+ generated").unwrap());
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_show_reads_explicit_file() {
    let tmp = isolated_config();
    let path = tmp.path().join("aerocode.yaml");
    fs::write(&path, "download_prefix: /files\n").unwrap();

    aerocode()
        .env("XDG_CONFIG_HOME", tmp.path())
        .env("AEROCODE_CONFIG", &path)
        .args(["config", "show", "download_prefix"])
        .assert()
        .success()
        .stdout("/files\n");
}

#[test]
fn test_config_show_unknown_key() {
    let tmp = isolated_config();
    aerocode()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown configuration key"));
}

#[test]
fn test_config_path() {
    let tmp = isolated_config();
    aerocode()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"))
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn test_completions_bash() {
    aerocode()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aerocode"));
}
