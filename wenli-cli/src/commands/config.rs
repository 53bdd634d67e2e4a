//! Config command - show or change settings.json

use anyhow::{bail, Result};
use serde_json::json;
use wenli_core::config::Config;
use wenli_core::domain::statistics::MAX_TREND_DAYS;
use wenli_core::services::LogEvent;

use super::{get_data_dir, get_logger, log_event};
use crate::output;

pub struct ConfigArgs {
    pub namespace: Option<String>,
    pub strict_storage: Option<bool>,
    pub trend_days: Option<u32>,
    pub json: bool,
}

/// Apply the requested changes; returns whether anything was set
fn apply(config: &mut Config, args: &ConfigArgs) -> Result<bool> {
    let mut changed = false;

    if let Some(namespace) = &args.namespace {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            bail!("Namespace must not be empty");
        }
        config.namespace = namespace.to_string();
        changed = true;
    }
    if let Some(strict) = args.strict_storage {
        config.strict_storage = strict;
        changed = true;
    }
    if let Some(days) = args.trend_days {
        if !(1..=MAX_TREND_DAYS).contains(&days) {
            bail!("Trend days must be between 1 and {}", MAX_TREND_DAYS);
        }
        config.trend_days = days;
        changed = true;
    }

    Ok(changed)
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    if apply(&mut config, &args)? {
        config.save(&data_dir)?;
        log_event(&get_logger(), LogEvent::new("config_updated").with_command("config"));
        if !args.json {
            output::success("Settings saved");
        }
    }

    if args.json {
        return output::print_json(json!({
            "namespace": config.namespace,
            "strictStorage": config.strict_storage,
            "trendDays": config.trend_days,
        }));
    }

    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["namespace".to_string(), config.namespace.clone()]);
    table.add_row(vec!["strictStorage".to_string(), config.strict_storage.to_string()]);
    table.add_row(vec!["trendDays".to_string(), config.trend_days.to_string()]);
    println!("{}", table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ConfigArgs {
        ConfigArgs {
            namespace: None,
            strict_storage: None,
            trend_days: None,
            json: true,
        }
    }

    #[test]
    fn test_apply_nothing() {
        let mut config = Config::default();
        assert!(!apply(&mut config, &args()).unwrap());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_apply_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        let changes = ConfigArgs {
            namespace: Some(" sandbox ".to_string()),
            strict_storage: Some(false),
            trend_days: Some(30),
            ..args()
        };
        assert!(apply(&mut config, &changes).unwrap());
        assert_eq!(config.namespace, "sandbox");
        assert!(!config.strict_storage);

        config.save(dir.path()).unwrap();
        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(wenli_core::config::SETTINGS_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["app"]["trendDays"], 30);
        assert_eq!(saved["app"]["namespace"], "sandbox");
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();
        for days in [0, MAX_TREND_DAYS + 1] {
            let bad = ConfigArgs {
                trend_days: Some(days),
                ..args()
            };
            assert!(apply(&mut config, &bad).is_err());
        }
        let blank = ConfigArgs {
            namespace: Some("  ".to_string()),
            ..args()
        };
        assert!(apply(&mut config, &blank).is_err());
        assert_eq!(config, Config::default());
    }
}
