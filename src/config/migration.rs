// Settings migration
// Renames keys written by the earlier web build of the timer

use serde_json::{Map, Value};

/// Legacy top-level keys and their current names
const RENAMED_KEYS: [(&str, &str); 2] = [("times", "repeatCountPerStep"), ("repeatEnabled", "loopEnabled")];

/// Legacy phase names inside the timing map
const RENAMED_PHASES: [(&str, &str); 2] = [("in", "inhale"), ("out", "exhale")];

/// Keys that were persisted but are no longer settings
const DROPPED_KEYS: [&str; 2] = ["audioLoaded", "audioLoadError"];

/// Migration result
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// Migrated settings object
    pub settings: Map<String, Value>,
    /// Whether any key was rewritten
    pub migrated: bool,
    /// One message per rewritten key
    pub messages: Vec<String>,
}

/// Settings format migrator
pub struct SettingsMigrator;

impl SettingsMigrator {
    /// Bring a stored settings object up to the current key names
    ///
    /// Current keys win over legacy ones when both are present.
    pub fn migrate_to_current(mut settings: Map<String, Value>) -> MigrationResult {
        let mut messages = Vec::new();

        for (old, new) in RENAMED_KEYS {
            if let Some(value) = settings.remove(old) {
                if settings.contains_key(new) {
                    messages.push(format!("Dropped legacy key '{}' ('{}' present)", old, new));
                } else {
                    settings.insert(new.to_string(), value);
                    messages.push(format!("Renamed '{}' to '{}'", old, new));
                }
            }
        }

        for key in DROPPED_KEYS {
            if settings.remove(key).is_some() {
                messages.push(format!("Dropped runtime key '{}'", key));
            }
        }

        if let Some(Value::Object(timing)) = settings.get_mut("timing") {
            for (old, new) in RENAMED_PHASES {
                if let Some(value) = timing.remove(old) {
                    if !timing.contains_key(new) {
                        timing.insert(new.to_string(), value);
                        messages.push(format!("Renamed timing '{}' to '{}'", old, new));
                    }
                }
            }
        }

        MigrationResult {
            migrated: !messages.is_empty(),
            settings,
            messages,
        }
    }
}
