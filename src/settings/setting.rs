use std::str::FromStr;

use serde_json::{Map, Value};

use crate::foundation::error::{MoodError, MoodResult};
use crate::settings::model::RenderSettings;

macro_rules! setting_keys {
    ($($variant:ident => $name:literal,)+) => {
        /// Name of one editable field of [`RenderSettings`], as used by UI controls and config
        /// files.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum SettingKey {
            $($variant,)+
        }

        impl SettingKey {
            pub const ALL: &'static [SettingKey] = &[$(SettingKey::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(SettingKey::$variant => $name,)+
                }
            }
        }

        impl FromStr for SettingKey {
            type Err = MoodError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(SettingKey::$variant),)+
                    other => Err(MoodError::validation(format!("unknown setting \"{other}\""))),
                }
            }
        }
    };
}

setting_keys! {
    AnimationSpeed => "animationSpeed",
    GradientMaxSize => "gradientMaxSize",
    GradientMinSize => "gradientMinSize",
    GradientFeatherSize => "gradientFeatherSize",
    GradientTiltH => "gradientTiltH",
    GradientTiltV => "gradientTiltV",
    FontSize => "fontSize",
    FontKerning => "fontKerning",
    LineHeight => "lineHeight",
    FontWeight => "fontWeight",
    FontStyle => "fontStyle",
    FontFamily => "fontFamily",
    TransitionSpeed => "transitionSpeed",
    BackgroundTransitionSpeed => "backgroundTransitionSpeed",
    GradientColorTransitionSpeed => "gradientColorTransitionSpeed",
    TextColorTransitionSpeed => "textColorTransitionSpeed",
    TextOpacity => "textOpacity",
    TextBlendMode => "textBlendMode",
    GradientOpacity => "gradientOpacity",
    GradientBlendMode => "gradientBlendMode",
    BackgroundOpacity => "backgroundOpacity",
    BackgroundBlendMode => "backgroundBlendMode",
    TextLayerVisible => "textLayerVisible",
    GradientLayerVisible => "gradientLayerVisible",
    BackgroundLayerVisible => "backgroundLayerVisible",
    DistortionLayerVisible => "distortionLayerVisible",
    DistortionEffect => "distortionEffect",
    DistortionIntensity => "distortionIntensity",
    DistortText => "distortText",
    DistortGradient => "distortGradient",
    DistortBackground => "distortBackground",
    AdvancedGradient => "advancedGradient",
}

impl RenderSettings {
    pub fn get(&self, key: SettingKey) -> MoodResult<Value> {
        let mut obj = self.to_object()?;
        Ok(obj.remove(key.as_str()).unwrap_or(Value::Null))
    }

    /// Writes one field and clamps. Returns whether anything changed.
    ///
    /// A value of the wrong shape is rejected and leaves `self` untouched.
    pub fn set(&mut self, key: SettingKey, value: Value) -> MoodResult<bool> {
        let mut patch = Map::new();
        patch.insert(key.as_str().to_owned(), value);
        self.merge(&patch)
    }

    /// Overlays every recognised key of `patch`; unrecognised keys are ignored.
    ///
    /// All-or-nothing: on error `self` is unchanged.
    pub fn merge(&mut self, patch: &Map<String, Value>) -> MoodResult<bool> {
        let mut obj = self.to_object()?;
        for (name, value) in patch {
            if SettingKey::from_str(name).is_err() {
                tracing::debug!(setting = %name, "ignoring unknown setting key");
                continue;
            }
            obj.insert(name.clone(), value.clone());
        }
        let mut next: RenderSettings = serde_json::from_value(Value::Object(obj))
            .map_err(|e| MoodError::validation(format!("invalid setting value: {e}")))?;
        next.clamp_in_place();
        let changed = next != *self;
        *self = next;
        Ok(changed)
    }

    pub fn default_value(key: SettingKey) -> MoodResult<Value> {
        Self::default().get(key)
    }

    fn to_object(&self) -> MoodResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(obj) => Ok(obj),
            _ => Err(MoodError::serde("settings did not serialize to an object")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/setting.rs"]
mod tests;
