use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let config = r#"{ "hashing": { "memory_cost": 256, "time_cost": 1, "parallelism": 1 } }"#;
    fs::write(temp.path().join("config.json"), config).unwrap();
    temp
}

fn finance(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("finance").unwrap();
    cmd.env("FINANCE_TRACKER_DATA_DIR", dir);
    cmd
}

#[test]
fn shell_alice_scenario() {
    let temp = data_dir();

    finance(temp.path())
        .write_stdin(
            "register alice pw123\n\
             register alice other\n\
             login alice pw123\n\
             expense Food 42\n\
             logout\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 'alice'"))
        .stdout(predicate::str::contains("Username already exists"))
        .stdout(predicate::str::contains("Added expense: Food $42.00"))
        .stdout(predicate::str::contains("Saved and logged out 'alice'."));

    finance(temp.path())
        .arg("shell")
        .write_stdin("login alice pw123\nshow expenses\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("$42.00"));

    let store = fs::read_to_string(temp.path().join("data").join("users.json")).unwrap();
    assert!(store.contains("\"schema_version\": 1"));
    assert!(!store.contains("pw123"));
}

#[test]
fn shell_rejects_bad_login_without_saying_why() {
    let temp = data_dir();

    finance(temp.path())
        .write_stdin("register alice pw123\nlogin alice wrong\nlogin bob pw123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid username or password").count(2));
}

#[test]
fn shell_negative_amount_is_an_error_line() {
    let temp = data_dir();

    finance(temp.path())
        .write_stdin("register a pw\nlogin a pw\nbudget -10\nshow budget\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget cannot be negative"))
        .stdout(predicate::str::contains("Budget: $0.00"));
}

#[test]
fn shell_chart_groups_labels() {
    let temp = data_dir();

    finance(temp.path())
        .write_stdin("register a pw\nlogin a pw\nexpense Food 10\nexpense Food 15\nchart expenses\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense Distribution"))
        .stdout(predicate::str::contains("$25.00"));
}

#[test]
fn shell_exports_csv() {
    let temp = data_dir();
    let out = temp.path().join("export");

    finance(temp.path())
        .write_stdin(format!(
            "register a pw\nlogin a pw\nbudget 1500\nincome Salary 3000.5\nexport csv \"{}\"\n",
            out.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 CSV files"));

    assert_eq!(fs::read_to_string(out.join("budget.csv")).unwrap(), "Budget\n1500.00\n");
    assert_eq!(
        fs::read_to_string(out.join("income_sources.csv")).unwrap(),
        "source,amount\nSalary,3000.50\n"
    );
}

#[test]
fn register_subcommand_with_password_stdin() {
    let temp = data_dir();

    finance(temp.path())
        .args(["register", "carol", "--password-stdin"])
        .write_stdin("s3cret\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 'carol'."));

    finance(temp.path())
        .args(["register", "carol", "--password-stdin"])
        .write_stdin("again\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Username already exists"));

    finance(temp.path())
        .write_stdin("login carol s3cret\nwhoami\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as carol"));
}

#[test]
fn users_subcommand_lists_registered_names() {
    let temp = data_dir();

    finance(temp.path())
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("No users registered."));

    finance(temp.path())
        .write_stdin("register bob pw
register alice pw
")
        .assert()
        .success();

    finance(temp.path())
        .arg("users")
        .assert()
        .success()
        .stdout("alice\nbob\n");
}

#[test]
fn shell_rejects_amount_that_overflows_total() {
    let temp = data_dir();

    finance(temp.path())
        .write_stdin(
            "register alice pw123\n\
             login alice pw123\n\
             expense Food 92233720368547758\n\
             expense Food 92233720368547758\n\
             show budget\n\
             chart expenses\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Validation error: Expense amount would overflow the total"))
        .stdout(predicate::str::contains("Budget: $0.00"))
        .stdout(predicate::str::contains("Saved and logged out 'alice'."));
}

#[test]
fn corrupt_store_is_quarantined() {
    let temp = data_dir();
    fs::create_dir_all(temp.path().join("data")).unwrap();
    fs::write(temp.path().join("data").join("users.json"), "\u{80}garbage").unwrap();

    finance(temp.path())
        .write_stdin("register a pw\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("could not be read"))
        .stdout(predicate::str::contains("Registered 'a'"));

    let quarantined: Vec<_> = fs::read_dir(temp.path().join("backups"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
}

#[test]
fn backup_create_list_restore() {
    let temp = data_dir();

    finance(temp.path())
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to back up"));

    finance(temp.path())
        .write_stdin("register alice pw123\n")
        .assert()
        .success();

    finance(temp.path())
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created"));

    finance(temp.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup-"));

    finance(temp.path())
        .write_stdin("register bob pw\n")
        .assert()
        .success();

    finance(temp.path())
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    finance(temp.path())
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 1 user(s)"));

    finance(temp.path())
        .write_stdin("login bob pw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid username or password"));
}

#[test]
fn config_prints_paths() {
    let temp = data_dir();

    finance(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("users.json"))
        .stdout(predicate::str::contains("argon2id m=256 t=1 p=1"));
}
