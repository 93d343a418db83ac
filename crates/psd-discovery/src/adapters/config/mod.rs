//! Configuration file adapters.

mod toml_file;

pub use toml_file::{
    load_config_file, DiagnosticsSection, FileConfig, LogSection, MetricsSection, ScanSection,
    SourcesSection,
};
