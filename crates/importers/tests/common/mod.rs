//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::json;
use tempfile::TempDir;

/// Stand-in for the `go` binary.
///
/// Answers `go list <spec>` and `go list -e -json <packages>` from
/// `pkgs/<import path>/package.json` files next to the script, and appends
/// every argument list to `calls.log`.
const FAKE_GO: &str = r#"#!/bin/sh
here=$(dirname "$0")
pkgs="$here/pkgs"
echo "$*" >> "$here/calls.log"
if [ "$1" != list ]; then
  echo "go $1: unknown command" >&2
  exit 2
fi
shift
json=
operands=
for arg in "$@"; do
  case "$arg" in
    -json) json=1 ;;
    -*) ;;
    *) operands="$operands $arg" ;;
  esac
done
for op in $operands; do
  if [ -n "$json" ]; then
    if [ -f "$pkgs/$op/package.json" ]; then
      cat "$pkgs/$op/package.json"
    else
      printf '{"ImportPath": "%s", "Error": {"Err": "package %s is not in std"}}\n' "$op" "$op"
    fi
  else
    case "$op" in
      */...)
        prefix=${op%/...}
        if [ -d "$pkgs/$prefix" ]; then
          find "$pkgs/$prefix" -name package.json | sed -e "s|^$pkgs/||" -e 's|/package.json$||' | sort
        fi
        ;;
      *)
        if [ -f "$pkgs/$op/package.json" ]; then
          echo "$op"
        else
          echo "cannot find package \"$op\"" >&2
          exit 1
        fi
        ;;
    esac
  fi
done
"#;

/// A scratch directory holding a fake `go` and its package table.
pub struct FakeGo {
    dir: TempDir,
}

impl FakeGo {
    /// Create the fake toolchain with an empty package table.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let script = dir.path().join("go");
        fs::write(&script, FAKE_GO).expect("Failed to write fake go");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
                .expect("Failed to make fake go executable");
        }

        Self { dir }
    }

    /// Add a package with ordinary, test and external-test imports.
    pub fn package(self, path: &str, imports: &[&str], test: &[&str], xtest: &[&str]) -> Self {
        let pkg_dir = self.dir.path().join("pkgs").join(path);
        fs::create_dir_all(&pkg_dir).expect("Failed to create package directory");
        let record = json!({
            "ImportPath": path,
            "Imports": imports,
            "TestImports": test,
            "XTestImports": xtest,
        });
        let text = serde_json::to_string_pretty(&record).expect("Failed to encode record");
        fs::write(pkg_dir.join("package.json"), text).expect("Failed to write record");
        self
    }

    /// Path to the fake `go` executable.
    pub fn program(&self) -> PathBuf {
        self.dir.path().join("go")
    }

    /// Every argument list the fake toolchain was called with.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run the importers binary against this toolchain.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut full_args: Vec<OsString> = vec!["--go".into(), self.program().into_os_string()];
        full_args.extend(args.iter().map(OsString::from));
        run_importers(self.dir.path(), &full_args)
    }
}

/// Run the importers binary in `dir` with a clean logging environment.
pub fn run_importers<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_importers"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute importers binary")
}

/// Stdout of a run, as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a run, as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
