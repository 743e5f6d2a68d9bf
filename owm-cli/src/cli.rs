use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use owm_core::{
    Alert, Config, ImageType, TimeInput, Trigger, WeatherParameter, alerting::load_trigger,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::logging;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "OpenWeatherMap alerting CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store settings. Without flags, prompts for each value.
    Configure {
        /// Directory holding trigger documents.
        #[arg(long)]
        trigger_dir: Option<PathBuf>,

        /// Default log filter, e.g. "info" or "owm_core=debug".
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Look up supported image types. Lists all of them without a filter.
    ImageType {
        /// Exact MIME type, e.g. "image/png".
        #[arg(long, conflicts_with = "name")]
        mime: Option<String>,

        /// Exact symbolic name, e.g. "GEOTIFF".
        #[arg(long)]
        name: Option<String>,
    },

    /// Inspect a local trigger document.
    Trigger {
        #[command(subcommand)]
        command: TriggerCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TriggerCommand {
    /// Print a trigger with its conditions, area and channels.
    Show {
        /// Path to a trigger file, or a name inside the configured trigger directory.
        trigger: String,
    },

    /// List the alerts of a trigger.
    Alerts {
        trigger: String,

        /// Only alerts updated at or after this time (epoch seconds or ISO-8601).
        #[arg(long)]
        since: Option<String>,

        /// Only alerts with a met condition on this weather parameter.
        #[arg(long, value_parser = parse_weather_param)]
        param: Option<WeatherParameter>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print a single alert of a trigger.
    Alert {
        trigger: String,

        alert_id: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self, config: Config) -> Result<()> {
        match self.command {
            Command::Configure { trigger_dir, log_level } => {
                let path = Config::config_file_path()?;
                configure(config, &path, trigger_dir, log_level)?;
                println!("Configuration saved to {}", path.display());
                Ok(())
            }
            Command::ImageType { mime, name } => {
                print!("{}", render_image_types(mime.as_deref(), name.as_deref())?);
                Ok(())
            }
            Command::Trigger { command } => {
                print!("{}", command.run(&config)?);
                Ok(())
            }
        }
    }
}

/// Load the config file, falling back to defaults when it cannot be read.
///
/// An unreadable file must not block `configure`, which overwrites it, nor
/// commands that never look at the configuration.
pub fn load_config() -> (Config, Option<anyhow::Error>) {
    or_default(Config::load())
}

fn or_default(loaded: Result<Config>) -> (Config, Option<anyhow::Error>) {
    match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}

impl TriggerCommand {
    fn trigger_arg(&self) -> &str {
        match self {
            TriggerCommand::Show { trigger }
            | TriggerCommand::Alerts { trigger, .. }
            | TriggerCommand::Alert { trigger, .. } => trigger,
        }
    }

    /// Load the trigger and render the requested view.
    fn run(&self, config: &Config) -> Result<String> {
        let path = config.resolve_trigger_path(self.trigger_arg())?;
        debug!(path = %path.display(), "loading trigger");
        let trigger = load_trigger(&path)?;

        match self {
            TriggerCommand::Show { .. } => Ok(describe_trigger(&trigger)),
            TriggerCommand::Alerts { since, param, json, .. } => {
                let alerts = select_alerts(&trigger, since.as_deref(), *param)?;
                if *json {
                    let mut out = serde_json::to_string_pretty(&alerts)
                        .context("Failed to serialize alerts to JSON")?;
                    out.push('\n');
                    Ok(out)
                } else {
                    Ok(alerts.iter().map(|a| format!("{a}\n")).collect())
                }
            }
            TriggerCommand::Alert { alert_id, json, .. } => {
                let alert = trigger.alert(alert_id).ok_or_else(|| {
                    anyhow!(
                        "No alert '{alert_id}' in trigger {}",
                        trigger.id().unwrap_or("without id")
                    )
                })?;
                if *json {
                    let mut out = serde_json::to_string_pretty(alert)
                        .context("Failed to serialize alert to JSON")?;
                    out.push('\n');
                    Ok(out)
                } else {
                    Ok(describe_alert(alert))
                }
            }
        }
    }
}

fn parse_weather_param(value: &str) -> Result<WeatherParameter, String> {
    WeatherParameter::try_from(value).map_err(|e| e.to_string())
}

/// Epoch seconds when the argument is an integer, ISO-8601 otherwise.
fn time_arg(value: &str) -> TimeInput {
    value
        .trim()
        .parse::<i64>()
        .map(TimeInput::Unix)
        .unwrap_or_else(|_| TimeInput::Iso8601(value.to_owned()))
}

fn select_alerts<'a>(
    trigger: &'a Trigger,
    since: Option<&str>,
    param: Option<WeatherParameter>,
) -> Result<Vec<&'a Alert>> {
    let mut alerts = match since {
        Some(since) => trigger.alerts_since(time_arg(since))?,
        None => trigger.alerts().iter().collect(),
    };

    if let Some(param) = param {
        alerts.retain(|a| a.refers_to(param));
    }

    Ok(alerts)
}

fn describe_trigger(trigger: &Trigger) -> String {
    let mut out = format!("{trigger}\n");

    out.push_str("conditions:\n");
    for c in trigger.conditions() {
        out.push_str(&format!("  - {c}\n"));
    }

    out.push_str("area:\n");
    for g in trigger.area() {
        out.push_str(&format!("  - {}\n", g.type_name()));
    }

    out.push_str("alert channels:\n");
    for ch in trigger.alert_channels() {
        out.push_str(&format!("  - {ch}\n"));
    }

    out
}

fn describe_alert(alert: &Alert) -> String {
    let mut out = format!("{alert}\n");
    let point = alert.coordinates();
    out.push_str(&format!("coordinates: lon={} lat={}\n", point.lon(), point.lat()));

    for m in alert.met_conditions() {
        let values: Vec<String> =
            m.current_value.iter().map(|(k, v)| format!("{k}={v}")).collect();
        out.push_str(&format!("  - {} (observed {})\n", m.condition, values.join(", ")));
    }

    out
}

fn render_image_types(mime: Option<&str>, name: Option<&str>) -> Result<String> {
    let found = match (mime, name) {
        (Some(mime), _) => vec![
            ImageType::lookup_by_mime_type(mime)
                .ok_or_else(|| anyhow!("No image type with MIME type '{mime}'"))?,
        ],
        (None, Some(name)) => vec![
            ImageType::lookup_by_name(name)
                .ok_or_else(|| anyhow!("No image type named '{name}'"))?,
        ],
        (None, None) => ImageType::all().iter().collect(),
    };

    Ok(found
        .into_iter()
        .map(|t| format!("{:<8} {:<11} .{}\n", t.name, t.mime_type, t.file_extension))
        .collect())
}

/// Apply the given (or prompted) settings and write them to `path`.
fn configure(
    mut config: Config,
    path: &Path,
    trigger_dir: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    let interactive = trigger_dir.is_none() && log_level.is_none();

    let trigger_dir = match trigger_dir {
        Some(dir) => Some(dir),
        None if interactive => {
            let current = config.trigger_dir.as_ref().map(|p| p.display().to_string());
            prompt_optional("Trigger directory:", current)?.map(PathBuf::from)
        }
        None => None,
    };

    let log_level = match log_level {
        Some(level) => Some(level),
        None if interactive => prompt_optional("Log level:", config.log_level.clone())?,
        None => None,
    };

    if let Some(dir) = trigger_dir {
        if !dir.is_dir() {
            return Err(anyhow!("Trigger directory does not exist: {}", dir.display()));
        }
        config.set_trigger_dir(dir);
    }

    if let Some(level) = log_level {
        logging::validate_filter(&level)?;
        config.set_log_level(level);
    }

    config.save_to(path)?;
    info!(path = %path.display(), "configuration saved");

    Ok(())
}

/// Ask for a value; an empty answer keeps the current one.
fn prompt_optional(message: &str, current: Option<String>) -> Result<Option<String>> {
    let current = current.unwrap_or_default();

    let mut prompt =
        inquire::Text::new(message).with_help_message("Leave empty to keep the current value");
    if !current.is_empty() {
        prompt = prompt.with_default(&current);
    }

    let answer = prompt.prompt().context("Failed to read answer")?;
    let answer = answer.trim();

    Ok((!answer.is_empty() && answer != current).then(|| answer.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owm_core::alerting::parse_trigger;
    use std::fs;

    const DOCUMENT: &str = r#"
id = "t-1"
start = 100
end = 1000

[[conditions]]
weather_param = "temp"
operator = "$gt"
amount = 300.0

[[area]]
type = "Point"
coordinates = [10.0, 20.0]

[[alerts]]
id = "a-1"
last_update = 100
coordinates = { lon = 10.0, lat = 20.0 }

[[alerts.met_conditions]]
current_value = { max = 301.5 }
condition = { weather_param = "temp", operator = "$gt", amount = 300.0 }

[[alerts]]
id = "a-2"
last_update = 200
coordinates = { lon = 10.0, lat = 20.0 }

[[alerts.met_conditions]]
current_value = { max = 95.0 }
condition = { weather_param = "humidity", operator = "$gt", amount = 90.0 }
"#;

    fn trigger() -> Trigger {
        parse_trigger(DOCUMENT).expect("test document is valid")
    }

    fn ids(alerts: &[&Alert]) -> Vec<String> {
        alerts.iter().map(|a| a.id().to_string()).collect()
    }

    #[test]
    fn parses_trigger_alerts_flags() {
        let cli = Cli::try_parse_from([
            "owm", "trigger", "alerts", "storm", "--since", "150", "--param", "TEMP", "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Trigger {
                command: TriggerCommand::Alerts { trigger, since, param, json },
            } => {
                assert_eq!(trigger, "storm");
                assert_eq!(since.as_deref(), Some("150"));
                assert_eq!(param, Some(WeatherParameter::Temperature));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_weather_param() {
        let res = Cli::try_parse_from(["owm", "trigger", "alerts", "storm", "--param", "fog"]);
        assert!(res.is_err());
    }

    #[test]
    fn image_type_filters_conflict() {
        let res =
            Cli::try_parse_from(["owm", "image-type", "--mime", "image/png", "--name", "PNG"]);
        assert!(res.is_err());
    }

    #[test]
    fn time_arg_accepts_epoch_and_iso() {
        assert_eq!(time_arg("42"), TimeInput::Unix(42));
        assert_eq!(
            time_arg("2017-09-01 10:00:00+00:00"),
            TimeInput::Iso8601("2017-09-01 10:00:00+00:00".into())
        );
    }

    #[test]
    fn select_alerts_combines_filters() {
        let t = trigger();

        assert_eq!(ids(&select_alerts(&t, None, None).unwrap()), ["a-1", "a-2"]);
        assert_eq!(ids(&select_alerts(&t, Some("200"), None).unwrap()), ["a-2"]);
        assert_eq!(
            ids(&select_alerts(&t, None, Some(WeatherParameter::Temperature)).unwrap()),
            ["a-1"]
        );
        assert!(
            select_alerts(&t, Some("150"), Some(WeatherParameter::Temperature))
                .unwrap()
                .is_empty()
        );
        assert!(select_alerts(&t, Some("soon"), None).is_err());
    }

    #[test]
    fn describe_trigger_lists_everything() {
        let out = describe_trigger(&trigger());

        assert!(out.starts_with("Trigger(id=t-1, "));
        assert!(out.contains("  - temp $gt 300\n"));
        assert!(out.contains("  - Point\n"));
        assert!(out.contains("  - OWM API POLLING\n"));
    }

    #[test]
    fn describe_alert_shows_observed_values() {
        let t = trigger();
        let out = describe_alert(t.alert("a-2").unwrap());

        assert!(out.contains("coordinates: lon=10 lat=20"));
        assert!(out.contains("humidity $gt 90 (observed max=95)"));
    }

    #[test]
    fn image_types_render() {
        let all = render_image_types(None, None).unwrap();
        assert_eq!(all.lines().count(), 2);

        let png = render_image_types(Some("image/png"), None).unwrap();
        assert!(png.starts_with("PNG"));

        let err = render_image_types(Some("unexistent/xyz"), None).unwrap_err();
        assert!(err.to_string().contains("No image type with MIME type"));

        let err = render_image_types(None, Some("ZOOMOOO")).unwrap_err();
        assert!(err.to_string().contains("No image type named"));
    }

    #[test]
    fn trigger_command_reads_file_and_finds_alert() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("storm.toml"), DOCUMENT).unwrap();

        let mut config = Config::default();
        config.set_trigger_dir(dir.path().to_path_buf());

        let cmd =
            TriggerCommand::Alert { trigger: "storm".into(), alert_id: "a-1".into(), json: true };
        let out = cmd.run(&config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["id"], "a-1");
        assert_eq!(json["trigger_id"], "t-1");

        let cmd =
            TriggerCommand::Alert { trigger: "storm".into(), alert_id: "zzz".into(), json: false };
        let err = cmd.run(&config).unwrap_err();
        assert!(err.to_string().contains("No alert 'zzz' in trigger t-1"));
    }

    #[test]
    fn corrupt_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "trigger_dir = [").unwrap();

        let (config, err) = or_default(Config::load_from(&path));

        assert_eq!(config, Config::default());
        assert!(err.unwrap().to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn configure_repairs_corrupt_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "trigger_dir = [").unwrap();

        let (config, _) = or_default(Config::load_from(&path));
        configure(config, &path, None, Some("debug".into())).expect("configure should save");

        let saved = Config::load_from(&path).expect("saved config should parse");
        assert_eq!(saved.log_level.as_deref(), Some("debug"));
        assert_eq!(saved.trigger_dir, None);
    }

    #[test]
    fn configure_rejects_missing_trigger_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = configure(Config::default(), &path, Some(dir.path().join("nope")), None)
            .unwrap_err();

        assert!(err.to_string().contains("Trigger directory does not exist"));
        assert!(!path.exists());
    }
}
