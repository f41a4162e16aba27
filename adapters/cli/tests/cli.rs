use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REFERENCE: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn skirmish() -> Command {
    let mut cmd = Command::cargo_bin("skirmish").expect("binary is built");
    let _ = cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_fixed_and_boosted_scores() {
    let dir = TempDir::new().expect("temp dir");
    let layout = write(&dir, "reference.txt", REFERENCE);

    skirmish()
        .arg(&layout)
        .assert()
        .success()
        .stdout("27730\n4988\n");
}

#[test]
fn modes_select_a_single_score() {
    let dir = TempDir::new().expect("temp dir");
    let layout = write(&dir, "reference.txt", REFERENCE);

    skirmish()
        .arg(&layout)
        .args(["--mode", "fixed"])
        .assert()
        .success()
        .stdout("27730\n");
    skirmish()
        .arg(&layout)
        .args(["--mode", "boost"])
        .assert()
        .success()
        .stdout("4988\n");
}

#[test]
fn render_draws_survivors_with_hit_points() {
    let dir = TempDir::new().expect("temp dir");
    let layout = write(&dir, "reference.txt", REFERENCE);

    skirmish()
        .arg(&layout)
        .args(["--mode", "fixed", "--render"])
        .assert()
        .success()
        .stdout(
            "27730\n\
             #######\n\
             #G....#   G(200)\n\
             #.G...#   G(131)\n\
             #.#.#G#   G(59)\n\
             #...#.#\n\
             #....G#   G(200)\n\
             #######\n",
        );
}

#[test]
fn config_overrides_boosted_faction_and_ceiling() {
    let dir = TempDir::new().expect("temp dir");
    let layout = write(&dir, "reference.txt", REFERENCE);
    let config = write(
        &dir,
        "skirmish.toml",
        "boosted_faction = \"elf\"\nboost_ceiling = 5\n",
    );

    skirmish()
        .arg(&layout)
        .args(["--mode", "boost", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no boost up to 5"));

    skirmish()
        .arg(&layout)
        .args(["--mode", "boost", "--faction", "goblin", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout("27730\n");
}

#[test]
fn unknown_glyphs_are_reported() {
    let dir = TempDir::new().expect("temp dir");
    let layout = write(&dir, "broken.txt", "#####\n#E?G#\n#####\n");

    skirmish()
        .arg(&layout)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown glyph '?' at line 2, column 3"));
}

#[test]
fn missing_layout_fails() {
    skirmish()
        .arg(Path::new("/nonexistent/layout.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read layout"));
}
