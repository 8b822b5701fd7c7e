use clap::{Parser, Subcommand};
use day_core::config::ConfigOverrides;
use day_core::model::DayContext;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Day being viewed: today, past or upcoming
    #[arg(long, value_name = "CONTEXT", global = true)]
    pub context: Option<String>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the day's tasks
    ///
    /// Example: day_tasks list
    List,
    /// Show the next pending task
    ///
    /// Example: day_tasks current
    Current,
    /// Run a proximity check now
    ///
    /// Example: day_tasks check
    Check,
    /// Change a task's status
    ///
    /// Example: day_tasks status 2 skipped
    /// Example: day_tasks status 3 reached
    Status { id: String, status: String },
    /// Replace a task's notes
    ///
    /// Example: day_tasks notes 2 "Pre-booked tickets"
    Notes { id: String, text: String },
    /// Save pending notes edits immediately
    ///
    /// Example: save
    Save,
    /// Remove a task from the day
    ///
    /// Example: day_tasks delete 4
    Delete { id: String },
    /// Feed a simulated distance in meters
    ///
    /// Example: day_tasks distance 2 30
    Distance { id: String, meters: u32 },
    /// Insert a task next to an existing one (after it unless --before)
    ///
    /// Example: day_tasks add 2 "Tuileries stroll" --time "11:30 AM"
    /// Example: day_tasks add 1 "Pack day bag" --before
    Add {
        reference: String,
        title: String,
        #[arg(long)]
        before: bool,
        #[arg(long, value_name = "TIME", default_value = "")]
        time: String,
        /// Defaults to the title
        #[arg(long, value_name = "NAME")]
        place: Option<String>,
        /// Defaults to the reference task's coordinates
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
        #[arg(long, value_name = "METERS", default_value_t = 1000)]
        distance: u32,
    },
    /// Open a task's location on the map
    ///
    /// Example: day_tasks map 2
    Map { id: String },
    /// Copy a task's location link
    ///
    /// Example: day_tasks share 2
    Share { id: String },
    /// Count tasks per status
    ///
    /// Example: day_tasks summary
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    PollInterval,
    ReachThreshold,
    AutosaveDelay,
    DayContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "poll_interval_secs" | "poll_interval" => ConfigOverrideTarget::PollInterval,
        "reach_threshold_meters" | "reach_threshold" => ConfigOverrideTarget::ReachThreshold,
        "autosave_delay_millis" | "autosave_delay" => ConfigOverrideTarget::AutosaveDelay,
        "day_context" | "context" => ConfigOverrideTarget::DayContext,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds parsed overrides into [`ConfigOverrides`]; later entries win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::PollInterval => {
                let secs = parse_number::<u64>(&parsed.value, "poll_interval_secs")?;
                if secs == 0 {
                    return Err("poll_interval_secs must be positive".to_string());
                }
                overrides.poll_interval_secs = Some(secs);
            }
            ConfigOverrideTarget::ReachThreshold => {
                overrides.reach_threshold_meters =
                    Some(parse_number(&parsed.value, "reach_threshold_meters")?);
            }
            ConfigOverrideTarget::AutosaveDelay => {
                overrides.autosave_delay_millis =
                    Some(parse_number(&parsed.value, "autosave_delay_millis")?);
            }
            ConfigOverrideTarget::DayContext => {
                let context = parsed
                    .value
                    .parse::<DayContext>()
                    .map_err(|err| err.message().to_string())?;
                overrides.day_context = Some(context);
            }
        }
    }
    Ok(overrides)
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{field} expects a whole number, got '{value}'"))
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrideTarget, collect_overrides, parse_config_override};
    use day_core::model::DayContext;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Poll-Interval = 5 ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::PollInterval);
        assert_eq!(parsed.value, "5");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("reach_threshold").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_empty_key() {
        let err = parse_config_override(" = 4").unwrap_err();
        assert!(err.contains("cannot be empty"));
    }

    #[test]
    fn collect_overrides_applies_typed_values() {
        let raw = vec![
            "reach_threshold=120".to_string(),
            "context=upcoming".to_string(),
            "autosave_delay_millis=500".to_string(),
            "reach_threshold=150".to_string(),
        ];

        let overrides = collect_overrides(&raw).unwrap();

        assert_eq!(overrides.reach_threshold_meters, Some(150));
        assert_eq!(overrides.day_context, Some(DayContext::Upcoming));
        assert_eq!(overrides.autosave_delay_millis, Some(500));
        assert_eq!(overrides.poll_interval_secs, None);
    }

    #[test]
    fn collect_overrides_rejects_bad_numbers_and_zero_interval() {
        let err = collect_overrides(&["reach_threshold=near".to_string()]).unwrap_err();
        assert!(err.contains("whole number"));

        let err = collect_overrides(&["poll_interval=0".to_string()]).unwrap_err();
        assert!(err.contains("positive"));
    }

    #[test]
    fn collect_overrides_rejects_unknown_context() {
        let err = collect_overrides(&["day_context=yesterday".to_string()]).unwrap_err();
        assert!(err.contains("unknown day context"));
    }
}
