//! Source file locations and loading.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::info;

use crate::table::read_wide_table;
use crate::error::{IngestError, Result};

/// Real GRP export of the source workbook.
pub const DEFAULT_GRP_FILE: &str = "China_COVID_measures_cost.xlsx - GRB (Real 2019 Billion RMB).csv";
/// OxCGRT stringency export of the source workbook.
pub const DEFAULT_STRINGENCY_FILE: &str =
    "China_COVID_measures_cost.xlsx - OxCGRT Stringency Index.csv";
/// Case-rate export of the source workbook.
pub const DEFAULT_CASES_FILE: &str =
    "China_COVID_measures_cost.xlsx - COVID-19 New Confirmed PC Cases.csv";

/// Which wide tables a run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSet {
    /// GRP only (trend chart).
    Grp,
    /// GRP and stringency (cost estimate).
    GrpStringency,
    /// GRP, stringency and case rates (regressions).
    All,
}

/// File locations of the wide source tables.
///
/// Relative file names are resolved against `data_dir`; absolute ones are
/// used as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub data_dir: PathBuf,
    pub grp_file: PathBuf,
    pub stringency_file: PathBuf,
    pub cases_file: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            grp_file: PathBuf::from(DEFAULT_GRP_FILE),
            stringency_file: PathBuf::from(DEFAULT_STRINGENCY_FILE),
            cases_file: PathBuf::from(DEFAULT_CASES_FILE),
        }
    }
}

impl DataSources {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_grp_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.grp_file = path.into();
        self
    }

    #[must_use]
    pub fn with_stringency_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stringency_file = path.into();
        self
    }

    #[must_use]
    pub fn with_cases_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cases_file = path.into();
        self
    }

    pub fn grp_path(&self) -> PathBuf {
        self.data_dir.join(&self.grp_file)
    }

    pub fn stringency_path(&self) -> PathBuf {
        self.data_dir.join(&self.stringency_file)
    }

    pub fn cases_path(&self) -> PathBuf {
        self.data_dir.join(&self.cases_file)
    }

    /// Load the tables of `set`, failing on the first missing file.
    pub fn load(&self, set: SourceSet) -> Result<SourceTables> {
        if !self.data_dir.is_dir() {
            return Err(IngestError::DirectoryNotFound {
                path: self.data_dir.clone(),
            });
        }
        let grp = load_table("grp", &self.grp_path())?;
        let stringency = match set {
            SourceSet::Grp => None,
            SourceSet::GrpStringency | SourceSet::All => {
                Some(load_table("stringency", &self.stringency_path())?)
            }
        };
        let cases = match set {
            SourceSet::All => Some(load_table("cases", &self.cases_path())?),
            SourceSet::Grp | SourceSet::GrpStringency => None,
        };
        Ok(SourceTables {
            grp,
            stringency,
            cases,
        })
    }
}

/// Wide tables as loaded from disk.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub grp: DataFrame,
    pub stringency: Option<DataFrame>,
    pub cases: Option<DataFrame>,
}

fn load_table(source: &str, path: &Path) -> Result<DataFrame> {
    let df = read_wide_table(path)?;
    info!(
        source,
        path = %path.display(),
        provinces = df.height(),
        columns = df.width(),
        "source loaded"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WIDE: &str = "GbProv,ProvEN,2020Q1\n110000,Beijing,1.0\n";

    #[test]
    fn resolves_relative_names_against_data_dir() {
        let sources = DataSources::new("/data").with_cases_file("cases.csv");
        assert_eq!(sources.cases_path(), PathBuf::from("/data/cases.csv"));
        assert_eq!(sources.grp_path(), PathBuf::from("/data").join(DEFAULT_GRP_FILE));

        let absolute = DataSources::new("/data").with_grp_file("/elsewhere/grp.csv");
        assert_eq!(absolute.grp_path(), PathBuf::from("/elsewhere/grp.csv"));
    }

    #[test]
    fn loads_only_requested_tables() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_GRP_FILE), WIDE).unwrap();
        let tables = DataSources::new(dir.path()).load(SourceSet::Grp).unwrap();

        assert_eq!(tables.grp.height(), 1);
        assert!(tables.stringency.is_none());
        assert!(tables.cases.is_none());
    }

    #[test]
    fn reports_the_missing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_GRP_FILE), WIDE).unwrap();
        let err = DataSources::new(dir.path())
            .load(SourceSet::GrpStringency)
            .unwrap_err();

        match err {
            IngestError::FileNotFound { path } => {
                assert!(path.ends_with(DEFAULT_STRINGENCY_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
