//! Hygiene: source-level budgets for patterns the crate avoids.
//!
//! Scans production `.rs` files under `src/` (sibling `_test.rs` files are
//! skipped). Every budget is zero. Printing is reserved for the binary, so
//! the library side also has no stdout/stderr writes.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

struct Budget {
    label: &'static str,
    pattern: &'static str,
    max: usize,
}

/// Crash paths.
const PANICS: [Budget; 6] = [
    Budget { label: ".unwrap()", pattern: ".unwrap()", max: 0 },
    Budget { label: ".expect()", pattern: ".expect(", max: 0 },
    Budget { label: "panic!()", pattern: "panic!(", max: 0 },
    Budget { label: "unreachable!()", pattern: "unreachable!(", max: 0 },
    Budget { label: "todo!()", pattern: "todo!(", max: 0 },
    Budget { label: "unimplemented!()", pattern: "unimplemented!(", max: 0 },
];

/// Errors dropped without a look.
const DISCARDS: [Budget; 2] = [
    Budget { label: "let _ =", pattern: "let _ =", max: 0 },
    Budget { label: ".ok()", pattern: ".ok()", max: 0 },
];

const STYLE: [Budget; 2] = [
    Budget { label: "#[allow(dead_code)]", pattern: "#[allow(dead_code)]", max: 0 },
    Budget { label: "dbg!()", pattern: "dbg!(", max: 0 },
];

/// Library code logs through `tracing` instead.
const LIBRARY_OUTPUT: [Budget; 2] = [
    Budget { label: "println!()", pattern: "println!(", max: 0 },
    Budget { label: "eprintln!()", pattern: "eprintln!(", max: 0 },
];

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn enforce(files: &[SourceFile], budgets: &[Budget]) {
    let mut failures = Vec::new();
    for budget in budgets {
        let found = hits(files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect::<Vec<_>>().join("\n");
            failures.push(format!("  {} budget exceeded: found {count}, max {}\n{detail}", budget.label, budget.max));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn sources_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")), "run from the crate root");
}

#[test]
fn panic_budget() {
    enforce(&source_files(), &PANICS);
}

#[test]
fn discard_budget() {
    enforce(&source_files(), &DISCARDS);
}

#[test]
fn style_budget() {
    enforce(&source_files(), &STYLE);
}

#[test]
fn library_output_budget() {
    let library: Vec<SourceFile> = source_files().into_iter().filter(|f| !f.path.ends_with("main.rs")).collect();
    enforce(&library, &LIBRARY_OUTPUT);
}
