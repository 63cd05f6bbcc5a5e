use crate::config::BundleConfig;
use crate::error::{ConfigError, Result};
use satchel_bundler::OxcCompiler;

impl BundleConfig {
    /// Validate configuration for logical consistency.
    ///
    /// Returns the entry, which is guaranteed to be present afterwards.
    pub fn validate(&self) -> Result<&str> {
        let entry = match self.entry.as_deref().map(str::trim) {
            Some(entry) if !entry.is_empty() => entry,
            _ => {
                return Err(ConfigError::MissingField {
                    field: "entry".to_string(),
                    hint: "Pass an ENTRY argument or set \"entry\" in satchel.config.json"
                        .to_string(),
                }
                .into());
            }
        };

        if self.max_modules == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_modules".to_string(),
                value: "0".to_string(),
                hint: "The module limit must be at least 1".to_string(),
            }
            .into());
        }

        let filename = &self.output.filename;
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\'])
        {
            return Err(ConfigError::InvalidValue {
                field: "output.filename".to_string(),
                value: filename.clone(),
                hint: "Use a plain file name; put directories in output.path".to_string(),
            }
            .into());
        }

        if let Err(err) = OxcCompiler::with_target(self.target.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "target".to_string(),
                value: self.target.clone(),
                hint: format!("{err}. Use an ECMAScript version such as es2015 or esnext"),
            }
            .into());
        }

        Ok(entry)
    }
}
