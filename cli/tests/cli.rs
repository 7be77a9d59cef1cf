//! Integration tests for the repoexport CLI

use assert_cmd::Command;
use predicates::prelude::*;
use repoexport_core::DEFAULT_PREAMBLE;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    project: PathBuf,
    out_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        let out_dir = dir.path().join("out");
        fs::create_dir_all(&project).unwrap();
        Self {
            _dir: dir,
            project,
            out_dir,
        }
    }

    fn file(&self, rel: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.project.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn output(&self) -> PathBuf {
        self.out_dir.join("output.txt")
    }

    fn large(&self) -> PathBuf {
        self.out_dir.join("large.txt")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("repoexport").unwrap();
        cmd.arg(&self.project)
            .arg("--output")
            .arg(self.output())
            .arg("--large-files")
            .arg(self.large());
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJECT_PATH"));
}

#[test]
fn test_exports_text_and_skips_media() {
    let fx = Fixture::new();
    fx.file("a.txt", "hello").file("b.png", b"\x89PNG");

    fx.cmd().assert().success();

    assert_eq!(
        read(&fx.output()),
        format!("{}\n----\na.txt\nhello\n--END--", DEFAULT_PREAMBLE)
    );
    assert_eq!(read(&fx.large()), "");
}

#[test]
fn test_gitignore_prefix_excludes_directory() {
    let fx = Fixture::new();
    fx.file(".gitignore", "build/\n")
        .file("build/out.txt", "artifact")
        .file("src/main.txt", "fn main");

    fx.cmd().assert().success();

    let out = read(&fx.output());
    assert!(out.contains("----\nsrc/main.txt\nfn main\n"));
    assert!(!out.contains("build/out.txt"));
    assert!(!out.contains("artifact"));
}

#[test]
fn test_svg_block_is_removed() {
    let fx = Fixture::new();
    fx.file(
        "notes.txt",
        "Intro line\n<svg>\n<rect width=\"5\"/>\n</svg>\nClosing line",
    );

    fx.cmd().assert().success();

    let out = read(&fx.output());
    assert!(out.contains("Intro line\n\nClosing line"));
    assert!(!out.contains("rect width"));
}

#[test]
fn test_unreadable_file_aborts_run() {
    let fx = Fixture::new();
    fx.file("a.txt", "first")
        .file("b.dat", b"\xff\xfe\xfd")
        .file("c.txt", "third");

    fx.cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("b.dat"));

    let partial = read(&fx.output());
    assert!(!partial.ends_with("--END--"));
    assert!(!partial.contains("third"));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let fx = Fixture::new();
    fx.file("z.md", "# Title")
        .file("lib/a.rs", "pub fn a() {}")
        .file(".hidden/config", "k=v");

    fx.cmd().assert().success();
    let first = fs::read(fx.output()).unwrap();
    fx.cmd().assert().success();
    let second = fs::read(fx.output()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_inside_project_is_not_exported() {
    let fx = Fixture::new();
    fx.file("a.txt", "hello");

    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.current_dir(&fx.project).arg(".").assert().success();
    let first = read(&fx.project.join("output.txt"));

    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.current_dir(&fx.project).arg(".").assert().success();
    let second = read(&fx.project.join("output.txt"));

    assert_eq!(first, second);
    assert!(!first.contains("----\noutput.txt\n"));
    assert!(!first.contains("large_files_output.txt"));
}

#[test]
fn test_large_files_are_reported() {
    let fx = Fixture::new();
    fx.file("big.txt", "y".repeat(2501)).file("small.txt", "ok");

    fx.cmd().assert().success();

    assert_eq!(read(&fx.large()), "big.txt\n");
    assert!(read(&fx.output()).contains("----\nbig.txt\n"));
}

#[test]
fn test_custom_and_missing_preamble() {
    let fx = Fixture::new();
    fx.file("a.txt", "hello");
    let preamble = fx.project.parent().unwrap().join("preamble.txt");
    fs::write(&preamble, "CUSTOM HEADER").unwrap();

    fx.cmd().arg("--preamble").arg(&preamble).assert().success();
    assert!(read(&fx.output()).starts_with("CUSTOM HEADER\n----\na.txt\n"));

    fx.cmd()
        .arg("-p")
        .arg(fx.project.join("no-such-preamble.txt"))
        .assert()
        .success();
    assert!(read(&fx.output()).starts_with(DEFAULT_PREAMBLE));
}

#[test]
fn test_all_pattern_sources_are_merged() {
    let fx = Fixture::new();
    fx.file(".gitignore", "ignored.txt\n")
        .file(".exclusionListConfig", "# vcs and config\n.git\n.exclusionListConfig\n")
        .file(".git/HEAD", "ref: refs/heads/main")
        .file("ignored.txt", "nope")
        .file("gen/schema.min.js", "minified")
        .file("keep.txt", "kept");
    let extra = fx.project.parent().unwrap().join("extra_patterns.txt");
    fs::write(&extra, "*.min.js\n").unwrap();

    fx.cmd()
        .arg("--exclusionPatterns")
        .arg(&extra)
        .assert()
        .success();

    let out = read(&fx.output());
    assert!(out.contains("----\nkeep.txt\nkept\n"));
    // ".git" also prefix-matches ".gitignore"
    assert!(!out.contains("----\n.gitignore\n"));
    assert!(!out.contains("ignored.txt\nnope"));
    assert!(!out.contains("schema.min.js"));
    assert!(!out.contains(".git/HEAD"));
    assert!(!out.contains("----\n.exclusionListConfig\n"));
}

#[test]
fn test_config_file_supplies_patterns() {
    let fx = Fixture::new();
    fx.file(
        ".repoexport.toml",
        "[exclude]\npatterns = [\".repoexport.toml\", \"docs/\"]\n",
    )
    .file("docs/guide.md", "guide")
    .file("src/lib.rs", "lib");

    fx.cmd().assert().success();
    let out = read(&fx.output());
    assert!(out.contains("----\nsrc/lib.rs\nlib\n"));
    assert!(!out.contains("guide"));

    fx.cmd().arg("--no-config").assert().success();
    assert!(read(&fx.output()).contains("----\ndocs/guide.md\nguide\n"));
}

#[test]
fn test_invalid_config_fails_with_config_error() {
    let fx = Fixture::new();
    fx.file(".repoexport.toml", "[output]\nunknown_key = 1\n");

    fx.cmd()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TOML"));
}

#[test]
fn test_missing_project_fails() {
    let fx = Fixture::new();
    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.arg(fx.project.join("does-not-exist"))
        .arg("--output")
        .arg(fx.output())
        .assert()
        .failure()
        .code(2);
    assert!(!fx.output().exists());
}

#[test]
fn test_plan_reports_without_writing() {
    let fx = Fixture::new();
    fx.file(".gitignore", "target\n")
        .file("target/app.bin", [0u8, 1, 2])
        .file("logo.png", [0u8])
        .file("main.rs", "fn main() {}");

    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.arg("plan")
        .arg(&fx.project)
        .arg("--output")
        .arg(fx.output())
        .args(["-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"class\": \"excluded\""))
        .stdout(predicate::str::contains("\"matchedBy\": \"prefix\""))
        .stdout(predicate::str::contains("\"class\": \"special\""))
        .stdout(predicate::str::contains("\"path\": \"main.rs\""));

    assert!(!fx.output().exists());
}

#[test]
fn test_completion_script() {
    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repoexport"));

    let mut cmd = Command::cargo_bin("repoexport").unwrap();
    cmd.args(["completion", "--shell", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported shell"));
}
