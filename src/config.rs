//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::{parse_separator, DatasetSource, LoadOptions};

/// Interactive exploratory data analysis dashboard.
#[derive(Debug, Parser)]
#[command(name = "rusty-eda", version, about)]
pub struct Cli {
    /// Dataset offered by the "Use default dataset" button.
    #[arg(long, value_name = "PATH", env = "RUSTY_EDA_DEFAULT_DATASET")]
    pub default_dataset: Option<PathBuf>,

    /// Field separator of the default dataset (delimited text only).
    #[arg(
        long,
        value_name = "SEP",
        default_value = ",",
        value_parser = parse_separator,
        env = "RUSTY_EDA_DEFAULT_SEPARATOR"
    )]
    pub default_separator: u8,

    /// Initial field separator for opened delimited files.
    #[arg(long, value_name = "SEP", default_value = ",", value_parser = parse_separator)]
    pub separator: u8,
}

impl Cli {
    /// The injected default dataset, if one was configured.
    pub fn default_source(&self) -> Option<DatasetSource> {
        self.default_dataset.as_ref().map(|path| {
            DatasetSource::new(
                path.clone(),
                LoadOptions {
                    separator: self.default_separator,
                },
            )
        })
    }

    /// The separator as the side panel shows it.
    pub fn separator_text(&self) -> String {
        match self.separator {
            b'\t' => "\\t".to_string(),
            other => char::from(other).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_default_dataset() {
        let cli = Cli::try_parse_from(["rusty-eda"]).unwrap();
        assert_eq!(cli.separator, b',');
        assert_eq!(cli.separator_text(), ",");
        // env fallbacks are only consulted when set
        if std::env::var_os("RUSTY_EDA_DEFAULT_SEPARATOR").is_none() {
            assert_eq!(cli.default_separator, b',');
        }
        if std::env::var_os("RUSTY_EDA_DEFAULT_DATASET").is_none() {
            assert!(cli.default_source().is_none());
        }
    }

    #[test]
    fn default_dataset_is_injected() {
        let cli = Cli::try_parse_from([
            "rusty-eda",
            "--default-dataset",
            "data/bank.csv",
            "--default-separator",
            ";",
            "--separator",
            "\\t",
        ])
        .unwrap();
        let source = cli.default_source().unwrap();
        assert_eq!(source.path, PathBuf::from("data/bank.csv"));
        assert_eq!(source.options.separator, b';');
        assert_eq!(cli.separator_text(), "\\t");
    }

    #[test]
    fn rejects_multi_character_separators() {
        assert!(Cli::try_parse_from(["rusty-eda", "--separator", ";;"]).is_err());
    }
}
