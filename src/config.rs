// ⚙️ Pipeline configuration - where the sources live and where reports go

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_SQLITE_FILE: &str = "anyname.sqlite";
pub const DEFAULT_PRODUCTS_FILE: &str = "products.csv";
pub const DEFAULT_SALES_FILE: &str = "sales.csv";
pub const DEFAULT_DISCOUNTS_FILE: &str = "discounts.txt";
pub const DEFAULT_EMPLOYEES_URL: &str = "https://dummy.restapiexample.com/api/v1/employees";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sqlite_path: PathBuf,
    pub products_path: PathBuf,
    pub sales_path: PathBuf,
    pub discounts_path: PathBuf,
    pub employees_url: String,
    pub api_timeout_secs: u64,
    pub report_dir: PathBuf,
}

impl PipelineConfig {
    /// Source files under `data_dir` using the default file names.
    pub fn from_data_dir(data_dir: impl AsRef<Path>, report_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        PipelineConfig {
            sqlite_path: data_dir.join(DEFAULT_SQLITE_FILE),
            products_path: data_dir.join(DEFAULT_PRODUCTS_FILE),
            sales_path: data_dir.join(DEFAULT_SALES_FILE),
            discounts_path: data_dir.join(DEFAULT_DISCOUNTS_FILE),
            employees_url: DEFAULT_EMPLOYEES_URL.to_string(),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            report_dir: report_dir.as_ref().to_path_buf(),
        }
    }

    pub fn with_employees_url(mut self, url: impl Into<String>) -> Self {
        self.employees_url = url.into();
        self
    }

    pub fn with_api_timeout_secs(mut self, secs: u64) -> Self {
        self.api_timeout_secs = secs;
        self
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_data_dir(DEFAULT_DATA_DIR, DEFAULT_REPORT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();

        assert_eq!(config.sqlite_path, Path::new("data").join("anyname.sqlite"));
        assert_eq!(config.discounts_path, Path::new("data").join("discounts.txt"));
        assert_eq!(config.report_dir, PathBuf::from("reports"));
        assert_eq!(config.api_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::from_data_dir("/tmp/in", "/tmp/out")
            .with_employees_url("http://localhost:9/employees")
            .with_api_timeout_secs(1);

        assert_eq!(config.products_path, PathBuf::from("/tmp/in/products.csv"));
        assert_eq!(config.employees_url, "http://localhost:9/employees");
        assert_eq!(config.api_timeout_secs, 1);
    }
}
