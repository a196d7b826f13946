use crate::config::types::{
    Config, HttpConfig, ListingConfig, RenderConfig, SinkConfig, DEFAULT_USER_AGENT,
};
use crate::config::validation::validate;
use crate::extract::ExtractionRules;
use crate::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Loads configuration from the environment
///
/// Calls `dotenvy::dotenv().ok()` first so a `.env` file in the working
/// directory can supply any of the variables.
///
/// # Errors
///
/// Returns `ConfigError` if a variable has an unparseable value or the
/// combination of values fails validation.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Loads configuration from variables already present in the process
///
/// Unlike [`load_config`], this does NOT read `.env` files.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    build_config(|key| std::env::var(key).ok())
}

/// Builds configuration using the provided lookup function
///
/// The lookup is decoupled from the real environment so the parsing rules
/// can be tested with a plain `HashMap`.
///
/// # Variables
///
/// | Variable | Default |
/// |----------|---------|
/// | `SCRAPE_DATA_DIR` | `./scrape-data` |
/// | `NEXT_PUBLIC_SUPABASE_URL`, then `SUPABASE_URL` | none |
/// | `SUPABASE_SERVICE_ROLE_KEY`, then `NEXT_PUBLIC_SUPABASE_ANON_KEY` | none |
/// | `SINK_TABLE` | `content` |
/// | `SINK_BATCH_SIZE` | `50` |
/// | `LISTING_BASE_URL` | `https://theporndude.com` |
/// | `RESOLVE_REDIRECTS` | `true` |
/// | `SCRAPER_USER_AGENT` | desktop Chrome |
/// | `PAGE_TIMEOUT_SECS` / `RESOLVE_TIMEOUT_SECS` | `30` / `10` |
/// | `SINK_TIMEOUT_SECS` | `30` |
/// | `SETTLE_TIMEOUT_MS` / `SCROLL_WAIT_MS` | `3000` / `500` |
/// | `SCROLL_PASSES` / `SCROLL_STEP_PX` | `3` / `1000` |
/// | `SCRAPER_RULES_PATH` | none |
pub fn build_config<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let or_default = |var: &str, default: &str| get(var).unwrap_or_else(|| default.to_string());

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match get(var) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    };

    let parse_url = |var: &str, raw: &str| -> Result<Url, ConfigError> {
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{} '{}': {}", var, raw, e)))
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match get(var).map(|v| v.to_lowercase()) {
            None => Ok(default),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(v) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{}'", v),
            }),
        }
    };

    let sink_url = match get("NEXT_PUBLIC_SUPABASE_URL").or_else(|| get("SUPABASE_URL")) {
        Some(raw) => Some(parse_url("NEXT_PUBLIC_SUPABASE_URL", &raw)?),
        None => None,
    };
    let credential =
        get("SUPABASE_SERVICE_ROLE_KEY").or_else(|| get("NEXT_PUBLIC_SUPABASE_ANON_KEY"));

    let listing_raw = or_default("LISTING_BASE_URL", "https://theporndude.com");

    let config = Config {
        data_dir: PathBuf::from(or_default("SCRAPE_DATA_DIR", "./scrape-data")),
        sink: SinkConfig {
            base_url: sink_url,
            credential,
            table: or_default("SINK_TABLE", "content"),
            batch_size: parse_u64("SINK_BATCH_SIZE", 50)? as usize,
            timeout: Duration::from_secs(parse_u64("SINK_TIMEOUT_SECS", 30)?),
        },
        http: HttpConfig {
            user_agent: or_default("SCRAPER_USER_AGENT", DEFAULT_USER_AGENT),
            page_timeout: Duration::from_secs(parse_u64("PAGE_TIMEOUT_SECS", 30)?),
            resolve_timeout: Duration::from_secs(parse_u64("RESOLVE_TIMEOUT_SECS", 10)?),
        },
        listing: ListingConfig {
            base_url: parse_url("LISTING_BASE_URL", &listing_raw)?,
            resolve_redirects: parse_bool("RESOLVE_REDIRECTS", true)?,
        },
        render: RenderConfig {
            settle_timeout: Duration::from_millis(parse_u64("SETTLE_TIMEOUT_MS", 3000)?),
            scroll_passes: parse_u64("SCROLL_PASSES", 3)? as u32,
            scroll_step_px: parse_u64("SCROLL_STEP_PX", 1000)? as u32,
            scroll_wait: Duration::from_millis(parse_u64("SCROLL_WAIT_MS", 500)?),
        },
        rules_path: get("SCRAPER_RULES_PATH").map(PathBuf::from),
    };

    validate(&config)?;
    Ok(config)
}

/// Loads extraction rules from a TOML file
///
/// Keys missing from the file keep their built-in defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML rules file
pub fn load_rules(path: &Path) -> Result<ExtractionRules, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let rules: ExtractionRules = toml::from_str(&content)?;

    if rules.anchor.href_patterns.is_empty() {
        return Err(ConfigError::Validation(
            "anchor.href-patterns cannot be empty".to_string(),
        ));
    }

    if rules.min_title_chars > rules.max_title_chars {
        return Err(ConfigError::Validation(format!(
            "min-title-chars ({}) exceeds max-title-chars ({})",
            rules.min_title_chars, rules.max_title_chars
        )));
    }

    Ok(rules)
}
