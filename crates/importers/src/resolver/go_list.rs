//! Decoding of `go list -json` output.
//!
//! `go list -json` prints one JSON object per package, back to back, with no
//! separator or enclosing array. Only the fields the import graph needs are
//! decoded; everything else is ignored.

use serde::Deserialize;

use importers_graph::{ImportSet, PackageId};

use crate::error::ResolutionError;

/// One package record from `go list -json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoPackage {
    /// Canonical import path of the package.
    pub import_path: PackageId,

    /// Imports of the package's non-test files.
    #[serde(default)]
    pub imports: Vec<PackageId>,

    /// Imports of the package's in-package test files.
    #[serde(default)]
    pub test_imports: Vec<PackageId>,

    /// Imports of the package's external (`_test` package) test files.
    #[serde(default, rename = "XTestImports")]
    pub external_test_imports: Vec<PackageId>,

    /// Whether the package is part of the standard library.
    #[serde(default)]
    pub standard: bool,

    /// Set when the package could not be loaded (only reported with `-e`).
    #[serde(default)]
    pub error: Option<GoPackageError>,
}

/// Load error attached to a package record.
#[derive(Debug, Clone, Deserialize)]
pub struct GoPackageError {
    /// The error text as `go` would print it.
    #[serde(rename = "Err")]
    pub message: String,
}

impl GoPackage {
    /// Convert the record into the package's import set.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::LoadFailed`] if the record carries a load
    /// error.
    pub fn into_import_set(self) -> Result<(PackageId, ImportSet), ResolutionError> {
        if let Some(error) = self.error {
            return Err(ResolutionError::load_failed(self.import_path, error.message));
        }
        let imports = ImportSet::new(self.imports)
            .with_test_imports(self.test_imports)
            .with_external_test_imports(self.external_test_imports);
        Ok((self.import_path, imports))
    }
}

/// Decode a concatenated stream of `go list -json` records.
///
/// # Errors
///
/// Returns [`ResolutionError::MalformedListing`] if any record is not valid
/// JSON or lacks an import path.
pub fn parse_package_stream(bytes: &[u8]) -> Result<Vec<GoPackage>, ResolutionError> {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<GoPackage>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(ResolutionError::MalformedListing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
	"Dir": "/src/example.com/app",
	"ImportPath": "example.com/app",
	"Name": "app",
	"Imports": [
		"example.com/app/internal/db",
		"fmt"
	],
	"TestImports": [
		"testing"
	],
	"XTestImports": [
		"example.com/app",
		"example.com/app/internal/fixtures"
	]
}
{
	"Dir": "/usr/local/go/src/fmt",
	"ImportPath": "fmt",
	"Name": "fmt",
	"Standard": true,
	"Imports": [
		"errors",
		"io"
	]
}
{
	"ImportPath": "example.com/missing",
	"Error": {
		"ImportStack": [
			"example.com/missing"
		],
		"Pos": "",
		"Err": "cannot find module providing package example.com/missing"
	}
}
"#;

    #[test]
    fn parses_concatenated_records() {
        let packages = parse_package_stream(LISTING.as_bytes()).expect("valid listing");

        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0].import_path.as_str(), "example.com/app");
        assert_eq!(packages[0].test_imports, vec![PackageId::from("testing")]);
        assert_eq!(packages[0].external_test_imports.len(), 2);
        assert!(packages[1].standard);
        assert!(packages[1].test_imports.is_empty());
    }

    #[test]
    fn record_converts_to_import_set() {
        let mut packages = parse_package_stream(LISTING.as_bytes()).expect("valid listing");
        let (id, imports) = packages.remove(0).into_import_set().expect("no load error");

        assert_eq!(id.as_str(), "example.com/app");
        assert_eq!(
            imports.imports,
            vec![
                PackageId::from("example.com/app/internal/db"),
                PackageId::from("fmt"),
            ]
        );
        assert_eq!(
            imports.external_test_imports,
            vec![
                PackageId::from("example.com/app"),
                PackageId::from("example.com/app/internal/fixtures"),
            ]
        );
    }

    #[test]
    fn record_with_error_fails_to_convert() {
        let packages = parse_package_stream(LISTING.as_bytes()).expect("valid listing");
        let err = packages[2]
            .clone()
            .into_import_set()
            .expect_err("package has a load error");

        assert_eq!(
            err.to_string(),
            "example.com/missing: cannot find module providing package example.com/missing"
        );
    }

    #[test]
    fn empty_output_is_no_packages() {
        assert!(parse_package_stream(b"").expect("empty is valid").is_empty());
    }

    #[test]
    fn truncated_output_is_malformed() {
        let err = parse_package_stream(br#"{"ImportPath": "a", "Imports": ["#)
            .expect_err("truncated record");
        assert!(matches!(err, ResolutionError::MalformedListing(_)));
    }
}
