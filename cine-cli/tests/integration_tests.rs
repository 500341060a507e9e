//! Integration tests for the CineGraph CLI
//!
//! Runs the built binary against the bundled sample data with the offline
//! hash provider, each test in its own temp directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

const ENV_VARS: &[&str] = &[
    "CINEGRAPH_CONFIG",
    "CINEGRAPH_DB",
    "CINEGRAPH_DATA",
    "CINEGRAPH_PROVIDER",
    "CINEGRAPH_MODEL",
    "CINEGRAPH_ENDPOINT",
    "CINEGRAPH_DIMENSION",
    "OPENAI_API_KEY",
    "RUST_LOG",
];

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../data")
        .canonicalize()
        .expect("sample data directory")
}

/// Get the cinegraph binary with a clean environment
fn cinegraph(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cinegraph"));
    cmd.current_dir(dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Run cinegraph offline against `dir/db` and the sample data
fn run_offline(dir: &Path, args: &[&str]) -> Output {
    let db = dir.join("db");
    cinegraph(dir)
        .args(["--provider", "hash", "--dimension", "32"])
        .arg("--db")
        .arg(&db)
        .arg("--data")
        .arg(data_dir())
        .args(args)
        .output()
        .expect("Failed to execute cinegraph")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Temp dir with the graph already built
fn built_graph() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_offline(dir.path(), &["run"]);
    assert!(output.status.success(), "run failed: {}", stderr(&output));
    dir
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = cinegraph(dir.path()).arg("--help").output().unwrap();
    assert!(output.status.success());

    let out = stdout(&output);
    for command in ["run", "search", "cast", "stats", "eda"] {
        assert!(out.contains(command), "help should list {}", command);
    }
}

// ============================================================================
// Workflow
// ============================================================================

#[test]
fn test_default_command_runs_workflow() {
    let dir = TempDir::new().unwrap();
    let output = run_offline(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Finished creating node and relationship tables"));
    assert!(out.contains("Running: COPY Actor FROM"));
    assert!(out.contains("Running: COPY WROTE FROM"));
    assert!(out.contains("---\nFinished ingesting data"));
    assert!(out.contains("Added a new column `vector` to the Movie table"));
    assert!(out.contains("Inserted the embedding data into the graph!"));
    assert!(out.contains("---\nHere are the actors and the characters they played in Interstellar:"));
    assert!(out.contains("Matthew McConaughey -> Cooper"));
    assert!(out.contains("Michael Caine -> Professor Brand"));
    assert!(!out.contains("Matt Damon ->"));
    assert!(out.contains("---\nMovies that are closest to the query 'space opera':"));

    // Column announcement comes between ingest and the cast listing
    let column = out.find("Added a new column").unwrap();
    let inserted = out.find("Inserted the embedding data").unwrap();
    let cast = out.find("Here are the actors").unwrap();
    assert!(column < inserted && inserted < cast);

    // COPY statements come out in manifest order
    let actor = out.find("COPY Actor").unwrap();
    let acted_in = out.find("COPY ACTED_IN").unwrap();
    let wrote = out.find("COPY WROTE").unwrap();
    assert!(actor < acted_in && acted_in < wrote);
}

#[test]
fn test_run_json_report() {
    let dir = TempDir::new().unwrap();
    let output = run_offline(dir.path(), &["run", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("run should print only JSON");
    assert_eq!(report["load"]["tables"].as_array().unwrap().len(), 11);
    assert_eq!(report["load"]["tables"][0], "Actor");
    assert_eq!(report["enrich"]["matched"], 10);
    assert_eq!(report["enrich"]["dimension"], 32);
    assert_eq!(report["cast"]["title"], "Interstellar");
    assert_eq!(report["cast"]["cast"].as_array().unwrap().len(), 6);

    let similar = report["similar"]["results"].as_array().unwrap();
    assert!(!similar.is_empty() && similar.len() <= 3);
    let scores: Vec<f64> = similar
        .iter()
        .map(|r| r["similarity"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_run_twice_starts_from_empty_graph() {
    let dir = built_graph();
    let output = run_offline(dir.path(), &["run", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stats = run_offline(dir.path(), &["stats", "--format", "csv"]);
    assert!(stdout(&stats).contains("Movie,node,10"));
}

#[test]
fn test_missing_input_file_fails_before_loading() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty");
    std::fs::create_dir_all(&empty).unwrap();

    let output = cinegraph(dir.path())
        .args(["--provider", "hash", "--dimension", "8", "--data"])
        .arg(&empty)
        .arg("--db")
        .arg(dir.path().join("db"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Missing input files"));
    assert!(err.contains("actor.csv"));
    assert!(err.contains("wrote.csv"));
}

#[test]
fn test_openai_without_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = cinegraph(dir.path())
        .args(["--provider", "openai", "--data"])
        .arg(data_dir())
        .arg("--db")
        .arg(dir.path().join("db"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Missing API key"));
}

// ============================================================================
// Queries on a built graph
// ============================================================================

#[test]
fn test_cast_command() {
    let dir = built_graph();

    let output = run_offline(dir.path(), &["cast", "--title", "Dune", "--format", "csv"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("actor,character"));
    assert!(out.contains("Timothee Chalamet,Paul Atreides"));
    assert!(out.contains("Zendaya,Chani"));

    let output = run_offline(dir.path(), &["cast"]);
    assert!(stdout(&output).contains("Jessica Chastain -> Murph"));
}

#[test]
fn test_search_command() {
    let dir = built_graph();

    let output = run_offline(
        dir.path(),
        &["search", "dream heist", "-n", "2", "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let results: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(results["query"], "dream heist");
    assert_eq!(results["model"], "hash-32");
    let rows = results["results"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert!(!row["writers"].as_array().unwrap().is_empty());
    }
}

#[test]
fn test_search_with_other_dimension_fails_clearly() {
    let dir = built_graph();
    let output = cinegraph(dir.path())
        .args(["--provider", "hash", "--dimension", "16", "--db"])
        .arg(dir.path().join("db"))
        .args(["search", "heist"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("16 dimensions but Movie.vector stores 32"));
}

#[test]
fn test_search_rejects_empty_query() {
    let dir = built_graph();
    let output = run_offline(dir.path(), &["search", "  "]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot be empty"));
}

#[test]
fn test_stats_command() {
    let dir = built_graph();
    let output = run_offline(dir.path(), &["stats", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stats: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["tables"].as_array().unwrap().len(), 11);
    assert_eq!(stats["movies_with_vectors"], 10);
}

#[test]
fn test_queries_need_a_built_graph() {
    let dir = TempDir::new().unwrap();
    let output = run_offline(dir.path(), &["cast"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cinegraph run"));
}

// ============================================================================
// EDA and config
// ============================================================================

#[test]
fn test_eda_filters_by_year() {
    let dir = TempDir::new().unwrap();
    let output = run_offline(dir.path(), &["eda", "--before", "2010", "--format", "csv"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], "title,year,summary");
    // The Dark Knight, The Prestige, Star Wars
    assert_eq!(lines.len(), 4);
    assert!(!out.contains("Inception"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("cinegraph.toml"),
        format!(
            "[data]\ndir = {:?}\n\n[output]\nformat = \"csv\"\n",
            data_dir().display().to_string()
        ),
    )
    .unwrap();

    let output = cinegraph(dir.path()).args(["eda"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("title,year,summary"));
}

#[test]
fn test_explicit_config_must_parse() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[data\n").unwrap();

    let output = cinegraph(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("eda")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to parse config file"));
}
