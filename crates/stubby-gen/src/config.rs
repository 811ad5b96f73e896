//! Naming conventions used by the generator.
//!
//! Every name the generator invents comes from [`MockConfig`], so a project
//! whose runtime spells things differently can override them in the
//! `[mock]` table of `stubby.toml`.

use serde::{Deserialize, Serialize};
use stubby_common::effect::EffectKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockConfig {
    /// Attribute that marks a type for expansion, without the `@`.
    pub attribute: String,
    /// Appended to the type name to name the companion type.
    pub companion_suffix: String,
    /// Name of the handle field added to the mocked type.
    pub handle_name: String,
    /// Appended to a method name to name its recorder field.
    pub calls_suffix: String,
    /// Written for an empty argument list and a missing return type.
    pub unit_type: String,
    /// Property stand-in type.
    pub variable_type: String,
    pub recorders: RecorderNames,
}

/// Type names of the four recorder variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecorderNames {
    pub plain: String,
    #[serde(rename = "async")]
    pub async_: String,
    pub failable: String,
    pub async_failable: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            attribute: "Mock".to_string(),
            companion_suffix: "Mock".to_string(),
            handle_name: "mock".to_string(),
            calls_suffix: "Calls".to_string(),
            unit_type: "Void".to_string(),
            variable_type: "MockVariable".to_string(),
            recorders: RecorderNames::default(),
        }
    }
}

impl Default for RecorderNames {
    fn default() -> Self {
        Self {
            plain: EffectKind::Plain.recorder_name().to_string(),
            async_: EffectKind::Async.recorder_name().to_string(),
            failable: EffectKind::Failable.recorder_name().to_string(),
            async_failable: EffectKind::AsyncFailable.recorder_name().to_string(),
        }
    }
}

impl MockConfig {
    pub fn recorder_name(&self, kind: EffectKind) -> &str {
        match kind {
            EffectKind::Plain => &self.recorders.plain,
            EffectKind::Async => &self.recorders.async_,
            EffectKind::Failable => &self.recorders.failable,
            EffectKind::AsyncFailable => &self.recorders.async_failable,
        }
    }

    /// `<Type>Mock`
    pub fn companion_name(&self, type_name: &str) -> String {
        format!("{type_name}{}", self.companion_suffix)
    }

    /// `<method>Calls`
    pub fn calls_field(&self, method: &str) -> String {
        format!("{method}{}", self.calls_suffix)
    }
}
