use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::emotion::model::{EmotionStylePatch, EmotionStyleTable};
use crate::foundation::error::{MoodError, MoodResult};
use crate::settings::model::RenderSettings;

pub const APP_VERSION: &str = "1.008";

/// Keys an imported file must carry to be applied at all.
pub const REQUIRED_KEYS: [&str; 4] = [
    "emotions",
    "animationSpeed",
    "gradientMaxSize",
    "fontFamily",
];

const ENVELOPE_KEYS: [&str; 3] = ["appVersion", "timestamp", "emotions"];

/// A parsed and validated config file, not yet applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDocument {
    pub app_version: Option<String>,
    pub timestamp: Option<String>,
    pub emotions: BTreeMap<String, EmotionStylePatch>,
    pub settings: Map<String, Value>,
}

impl ConfigDocument {
    pub fn parse(json: &str) -> MoodResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| MoodError::validation(format!("config is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> MoodResult<Self> {
        let Value::Object(mut obj) = value else {
            return Err(MoodError::validation("config must be a JSON object"));
        };

        let missing: Vec<&'static str> = REQUIRED_KEYS
            .into_iter()
            .filter(|k| !obj.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(MoodError::MissingConfigKeys(missing));
        }

        let emotions = obj.remove("emotions").unwrap_or(Value::Null);
        let emotions: BTreeMap<String, EmotionStylePatch> = serde_json::from_value(emotions)
            .map_err(|e| MoodError::validation(format!("invalid emotions table: {e}")))?;
        let app_version = obj
            .remove("appVersion")
            .and_then(|v| v.as_str().map(str::to_owned));
        let timestamp = obj
            .remove("timestamp")
            .and_then(|v| v.as_str().map(str::to_owned));
        obj.retain(|k, _| !ENVELOPE_KEYS.contains(&k.as_str()));

        Ok(Self {
            app_version,
            timestamp,
            emotions,
            settings: obj,
        })
    }

    /// Produces the styles and settings this document would yield, without touching the inputs.
    pub fn resolve(
        &self,
        styles: &EmotionStyleTable,
        settings: &RenderSettings,
    ) -> MoodResult<(EmotionStyleTable, RenderSettings)> {
        let mut next_styles = styles.clone();
        next_styles.merge_patches(&self.emotions);
        let mut next_settings = settings.clone();
        next_settings.merge(&self.settings)?;
        Ok((next_styles, next_settings))
    }
}

/// Serializes `{appVersion, timestamp, emotions, ...settings}` as pretty JSON.
pub fn to_config_json(styles: &EmotionStyleTable, settings: &RenderSettings) -> MoodResult<String> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| MoodError::serde(format!("timestamp formatting failed: {e}")))?;

    let mut obj = Map::new();
    obj.insert("appVersion".to_owned(), Value::from(APP_VERSION));
    obj.insert("timestamp".to_owned(), Value::from(timestamp));
    obj.insert("emotions".to_owned(), serde_json::to_value(styles)?);
    match serde_json::to_value(settings)? {
        Value::Object(fields) => obj.extend(fields),
        _ => return Err(MoodError::serde("settings did not serialize to an object")),
    }
    Ok(serde_json::to_string_pretty(&Value::Object(obj))?)
}

/// `emotion-config-YYYY-MM-DD.json` for today's UTC date.
pub fn suggested_file_name() -> String {
    let date = OffsetDateTime::now_utc().date();
    format!(
        "emotion-config-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn save_config_file(
    path: &Path,
    styles: &EmotionStyleTable,
    settings: &RenderSettings,
) -> MoodResult<()> {
    let json = to_config_json(styles, settings)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}

pub fn read_config_file(path: &Path) -> MoodResult<ConfigDocument> {
    let json = std::fs::read_to_string(path)?;
    ConfigDocument::parse(&json)
}

#[cfg(test)]
#[path = "../../tests/unit/settings/config_file.rs"]
mod tests;
