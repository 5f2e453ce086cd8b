use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "\
EXTRATO PREVIDENCIÁRIO
NIT: 123.456.789-0 CPF: 111.222.333-44 Nome: JOAO DA SILVA Data de nascimento: 01/01/1980
Relações Previdenciárias
1 12.345.678/0001-99 EMPRESA EXEMPLO LTDA
01/03/2010 28/02/2015

2 98.765.432/0001-10 OUTRA EMPRESA S/A
01/04/2015 03/2018
";

/// `cnis` with its config lookup confined to `home`.
fn cnis(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cnis").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn write_statement(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn missing_file_exits_with_error() {
    let dir = TempDir::new().unwrap();

    cnis(dir.path())
        .arg("process")
        .arg(dir.path().join("nao-existe.pdf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Arquivo não encontrado"));
}

#[test]
fn text_input_prints_json() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "cnis.txt", STATEMENT);

    let output = cnis(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["client_name"], "Joao Da Silva");
    assert_eq!(json["data"]["client_cpf"], "111.222.333-44");

    let records = json["data"]["vinculos_empregaticios"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["empregador"], "Empresa Exemplo Ltda");
    assert_eq!(records[1]["data_fim"], "31/03/2018");
}

#[test]
fn empty_text_is_a_failure_result() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "vazio.txt", "   \n");

    cnis(dir.path())
        .args(["process", "--compact"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"success":false,"error":"Não foi possível extrair texto do PDF"}"#,
        ));
}

#[test]
fn unreadable_pdf_is_a_failure_result() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "quebrado.pdf", "isto não é um PDF");

    cnis(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn failure_result_written_to_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "vazio.txt", "");
    let output = dir.path().join("resultado.json");

    cnis(dir.path())
        .args(["process", "--output"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Não foi possível extrair texto do PDF");
}

#[test]
fn missing_file_reported_before_broken_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();

    cnis(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(dir.path().join("nao-existe.pdf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Arquivo não encontrado"));
}

#[test]
fn csv_output_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "cnis.txt", STATEMENT);
    let output = dir.path().join("vinculos.csv");

    cnis(dir.path())
        .args(["process", "--format", "csv", "--output"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resultado salvo em"));

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Outra Empresa S/A,98.765.432/0001-10,01/04/2015,31/03/2018"));
}

#[test]
fn config_file_changes_extraction() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir, "cnis.txt", STATEMENT);
    let config = dir.path().join("config.json");

    cnis(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();

    cnis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.validate_cpf", "true"])
        .assert()
        .success();

    cnis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.validate_cpf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    // 111.222.333-44 has wrong check digits
    cnis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["process", "--compact"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""client_cpf":"""#));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    cnis(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    cnis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
