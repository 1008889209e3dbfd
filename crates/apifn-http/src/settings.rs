use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SettingsError;
use crate::request::Auth;

/// Connection settings shared by every function of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpSettings {
    pub base_uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
}

impl HttpSettings {
    /// Credentials to pass through to the transport, if any are configured.
    pub fn auth(&self) -> Option<Auth> {
        if self.user.is_none() && self.access_token.is_none() {
            return None;
        }
        Some(Auth {
            user: self.user.clone(),
            password: self.password.clone(),
            access_token: self.access_token.clone(),
        })
    }

    /// Fill every unset field from `other`.
    pub fn or(self, other: HttpSettings) -> HttpSettings {
        HttpSettings {
            base_uri: self.base_uri.or(other.base_uri),
            user: self.user.or(other.user),
            password: self.password.or(other.password),
            access_token: self.access_token.or(other.access_token),
        }
    }
}

/// Default settings file name.
pub const SETTINGS_FILE_NAME: &str = ".apifn.yaml";

/// Load settings from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_settings(path: &Path) -> Result<Option<HttpSettings>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let settings: HttpSettings =
        serde_yaml_ng::from_str(&content).map_err(|source| SettingsError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(settings))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_settings_yaml() {
        let yaml = r#"
baseUri: https://api.example.com
user: octocat
password: hunter2
"#;
        let settings: HttpSettings = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("https://api.example.com"));
        assert_eq!(settings.user.as_deref(), Some("octocat"));
        assert!(settings.access_token.is_none());

        let auth = settings.auth().unwrap();
        assert_eq!(auth.user.as_deref(), Some("octocat"));
        assert_eq!(auth.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_no_credentials_no_auth() {
        let settings = HttpSettings {
            base_uri: Some("http://localhost".to_string()),
            ..HttpSettings::default()
        };
        assert!(settings.auth().is_none());

        let token_only = HttpSettings {
            access_token: Some("t".to_string()),
            ..HttpSettings::default()
        };
        assert_eq!(token_only.auth().unwrap().access_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_or_prefers_self() {
        let flags = HttpSettings {
            base_uri: Some("http://flag".to_string()),
            ..HttpSettings::default()
        };
        let file = HttpSettings {
            base_uri: Some("http://file".to_string()),
            user: Some("u".to_string()),
            ..HttpSettings::default()
        };
        let merged = flags.or(file);
        assert_eq!(merged.base_uri.as_deref(), Some("http://flag"));
        assert_eq!(merged.user.as_deref(), Some("u"));
    }

    #[test]
    fn test_load_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"accessToken: abc\n").unwrap();
        let settings = load_settings(file.path()).unwrap().unwrap();
        assert_eq!(settings.access_token.as_deref(), Some("abc"));

        assert!(load_settings(Path::new("/nonexistent/.apifn.yaml")).unwrap().is_none());
    }
}
