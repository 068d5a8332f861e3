use crate::cli::CliArgs;
use crate::filters::FilterCriteria;
use crate::loader::{DataSource, DEFAULT_SOURCE};
use crate::state::Action;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "videotable";

/// On-disk settings. Every key is optional; the command line wins over all of them.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub language: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_DIR).join("config.yml"))
}

pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("videotable.log")
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .with_context(|| format!("failed to parse config '{}'", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!("config file not found '{}'", path.display())
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to read config '{}'", path.display()))
        }
    }
}

/// Explicit `--config` must exist; the default location may be absent.
pub fn load_for(args: &CliArgs) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => load_config(path, false),
        None => match default_config_path() {
            Some(path) => load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: DataSource,
    pub language: Option<String>,
    pub log_filter: String,
    pub log_file: PathBuf,
    pub export_html: Option<PathBuf>,
    pub criteria: FilterCriteria,
    pub page: usize,
}

impl Settings {
    pub fn resolve(args: &CliArgs, config: ConfigFile) -> Self {
        let data = args
            .data
            .clone()
            .or(config.data)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let log_filter = match args.verbose {
            0 => config.log_level.unwrap_or_else(|| "warn".to_string()),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        Self {
            source: DataSource::parse(&data),
            language: args.language.clone().or(config.language),
            log_filter,
            log_file: args
                .log_file
                .clone()
                .or(config.log_file)
                .unwrap_or_else(default_log_path),
            export_html: args.export_html.clone(),
            criteria: FilterCriteria {
                years: args.years.iter().cloned().collect(),
                formats: args.formats.iter().cloned().collect(),
                search: args.search.clone().unwrap_or_default(),
            },
            page: args.page.max(1),
        }
    }

    /// Actions that bring a freshly loaded view to the requested filters and page.
    pub fn initial_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.criteria.years.is_empty() {
            actions.push(Action::SetYears(self.criteria.years.clone()));
        }
        if !self.criteria.formats.is_empty() {
            actions.push(Action::SetFormats(self.criteria.formats.clone()));
        }
        if !self.criteria.search.is_empty() {
            actions.push(Action::SetSearch(self.criteria.search.clone()));
        }
        if self.page > 1 {
            actions.push(Action::GoToPage(self.page));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dataset;
    use crate::record::sample;
    use crate::state::{reduce, ViewState};
    use clap::Parser;
    use std::io::Write;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("videotable").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn parses_yaml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data: https://example.com/videos.json").unwrap();
        writeln!(file, "language: pt-br").unwrap();
        writeln!(file, "log_level: debug").unwrap();

        let config = load_config(file.path(), false).unwrap();
        assert_eq!(config.data.as_deref(), Some("https://example.com/videos.json"));
        assert_eq!(config.language.as_deref(), Some("pt-br"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn missing_config_is_only_fine_when_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data: [unterminated").unwrap();
        let err = load_config(file.path(), false).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn cli_overrides_config() {
        let config = ConfigFile {
            data: Some("from-config.json".to_string()),
            language: Some("pt-br".to_string()),
            log_level: Some("debug".to_string()),
            log_file: Some(PathBuf::from("/tmp/from-config.log")),
        };
        let settings = Settings::resolve(&args(&["cli.json", "--lang", "en", "-v"]), config);

        assert_eq!(settings.source, DataSource::File(PathBuf::from("cli.json")));
        assert_eq!(settings.language.as_deref(), Some("en"));
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.log_file, PathBuf::from("/tmp/from-config.log"));
    }

    #[test]
    fn falls_back_to_defaults() {
        let settings = Settings::resolve(&args(&[]), ConfigFile::default());
        assert_eq!(settings.source, DataSource::default());
        assert_eq!(settings.log_filter, "warn");
        assert!(settings.language.is_none());
        assert!(settings.criteria.is_empty());
        assert!(settings.initial_actions().is_empty());
    }

    #[test]
    fn initial_actions_follow_cli_filters() {
        let settings = Settings::resolve(
            &args(&["--year", "2020", "--search", "mario", "--page", "3"]),
            ConfigFile::default(),
        );
        let actions = settings.initial_actions();

        assert_eq!(actions.len(), 3);
        assert!(matches!(&actions[0], Action::SetYears(years) if years.contains("2020")));
        assert!(matches!(&actions[1], Action::SetSearch(s) if s == "mario"));
        assert!(matches!(actions[2], Action::GoToPage(3)));
    }

    #[test]
    fn huge_page_lands_on_last_page() {
        let page = usize::MAX.to_string();
        let settings = Settings::resolve(&args(&["--format", "Essay", "--page", page.as_str()]), ConfigFile::default());
        let actions = settings.initial_actions();
        assert_eq!(actions.len(), 2);

        let records = (1..=45).map(|i| sample(2020, i, &format!("Video {}", i), "Essay")).collect();
        let state = actions.into_iter().fold(
            reduce(ViewState::loading(), Action::Loaded(Dataset::from_records(records))),
            reduce,
        );
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.page_records().len(), 5);
    }
}
