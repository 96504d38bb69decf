use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "0a1b2c3d_123456_0a1b2c3d4e5f6a.20230131.pdf";

/// One-page statement: two transactions, the first wrapped over two lines,
/// followed by the "Uznania" summary row.
const STATEMENT_LINES: &[(i64, i64, &str)] = &[
    (20, 700, "Wyciag z rachunku"),
    (20, 500, "2023.01.05"),
    (100, 500, "2023.01.06"),
    (200, 500, "Przelew"),
    (460, 500, "-12,00"),
    (530, 500, "988,00"),
    (200, 490, "czynsz"),
    (20, 480, "2023.01.07"),
    (100, 480, "2023.01.08"),
    (200, 480, "Wplata"),
    (460, 480, "100,00"),
    (530, 480, "1088,00"),
    (200, 470, "Uznania"),
    (460, 470, "100,00"),
];

fn getin(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("getin").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

/// Write a Courier PDF with the given text lines to `dir/name`.
fn write_statement(dir: &Path, name: &str, lines: &[(i64, i64, &str)]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let operations: Vec<Operation> = lines
        .iter()
        .flat_map(|&(x, y, text)| {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 8.into()]),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ]
        })
        .collect();
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();

    getin(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"first_page_area\": \"0,580,567,75\""))
        .stdout(predicate::str::contains("Assets:PL:GetinBank"));
}

#[test]
fn config_init_set_get() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("getin.json");
    let path = path.to_str().unwrap();

    getin(&home)
        .args(["-c", path, "config", "init"])
        .assert()
        .success();
    getin(&home)
        .args(["-c", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    getin(&home)
        .args(["-c", path, "config", "set", "ledger.currency", "EUR"])
        .assert()
        .success();
    getin(&home)
        .args(["-c", path, "config", "get", "ledger.currency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"EUR\""));
}

#[test]
fn config_set_rejects_invalid_columns() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("getin.json");
    let path = path.to_str().unwrap();

    getin(&home)
        .args(["-c", path, "config", "set", "layout.columns", "[157, 95]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("column boundaries"));
}

#[test]
fn process_missing_file_fails() {
    let home = TempDir::new().unwrap();

    getin(&home)
        .args(["process", "/nonexistent/statement.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_refuses_unrecognized_name() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("invoice.pdf");
    std::fs::write(&file, b"%PDF-1.5").unwrap();

    getin(&home)
        .arg("process")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn process_statement_as_json() {
    let home = TempDir::new().unwrap();
    let file = write_statement(home.path(), STATEMENT, STATEMENT_LINES);

    let output = getin(&home)
        .args(["process", "-f", "json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(json["status"], "");
    assert_eq!(json["skipped"].as_array().map(Vec::len), Some(0));

    assert_eq!(transactions[0]["transaction_date"], "2023-01-05");
    assert_eq!(transactions[0]["posting_date"], "2023-01-06");
    assert_eq!(transactions[0]["amount"], "-12.00");
    assert_eq!(transactions[0]["balance"], "988.00");
    assert_eq!(transactions[0]["narration"], "Przelew^^^czynsz");
    assert_eq!(transactions[0]["source_file"], STATEMENT);
    assert_eq!(transactions[1]["narration"], "Wplata");
    assert_eq!(transactions[1]["amount"], "100.00");
}

#[test]
fn process_statement_as_csv_to_file() {
    let home = TempDir::new().unwrap();
    let file = write_statement(home.path(), STATEMENT, STATEMENT_LINES);
    let out = home.path().join("statement.csv");

    getin(&home)
        .args(["process", "-f", "csv", "-o"])
        .arg(&out)
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transactions written"));

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    let expected = vec![
        "transaction_date,posting_date,amount,balance,narration,status,source_file".to_string(),
        format!("2023-01-05,2023-01-06,-12.00,988.00,Przelew^^^czynsz,,{STATEMENT}"),
        format!("2023-01-07,2023-01-08,100.00,1088.00,Wplata,,{STATEMENT}"),
    ];
    assert_eq!(lines, expected);
}

#[test]
fn process_broken_statement_reports_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join(STATEMENT);
    std::fs::write(&file, b"not a pdf").unwrap();

    getin(&home)
        .arg("process")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn batch_continues_past_broken_statements() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in");
    let output = home.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join(STATEMENT), b"not a pdf").unwrap();
    std::fs::write(
        input.join("1a1b2c3d_123456_0a1b2c3d4e5f6a.20230228.pdf"),
        b"also not a pdf",
    )
    .unwrap();
    std::fs::write(input.join("notes.pdf"), b"ignored").unwrap();

    getin(&home)
        .arg("batch")
        .arg(format!("{}/*.pdf", input.display()))
        .arg("-o")
        .arg(&output)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 statements"))
        .stdout(predicate::str::contains("Failed files:"));

    let summary = std::fs::read_to_string(output.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.starts_with("filename,status,transactions,skipped_rows"));
    assert!(summary.contains(&format!("{},error,0,0", STATEMENT)));
}

#[test]
fn batch_without_matches_fails() {
    let home = TempDir::new().unwrap();

    getin(&home)
        .arg("batch")
        .arg(format!("{}/*.pdf", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching statement files"));
}
