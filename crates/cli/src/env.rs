use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;

pub const DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable lookup over the process environment, optionally
/// overlaid with a `.env` style file.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file. File entries win over the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// The explicit URL if given, otherwise `DATABASE_URL`.
    pub fn database_url(&self, explicit: Option<String>) -> Result<String, CliError> {
        explicit
            .or_else(|| self.get(DATABASE_URL).map(str::to_string))
            .filter(|url| !url.trim().is_empty())
            .ok_or(CliError::MissingUrl)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the connection URL from `--url`, then an optional env file, then
/// the process environment.
pub fn resolve_database_url(
    url: Option<String>,
    env_file: Option<&str>,
) -> Result<String, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }
    env.database_url(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> EnvManager {
        EnvManager {
            vars: HashMap::new(),
        }
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
DATABASE_URL=postgres://localhost/app
KEY2=value2
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get(DATABASE_URL), Some("postgres://localhost/app"));
        assert_eq!(env.get("KEY2"), Some("value2"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="host=localhost user=app"
SINGLE='single quoted'
EQUALS=a=b
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("host=localhost user=app"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("EQUALS"), Some("a=b"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_database_url_precedence() {
        let mut env = empty();
        assert!(matches!(env.database_url(None), Err(CliError::MissingUrl)));

        env.parse_env_content("DATABASE_URL=postgres://env/db").unwrap();
        assert_eq!(env.database_url(None).unwrap(), "postgres://env/db");
        assert_eq!(
            env.database_url(Some("postgres://flag/db".into())).unwrap(),
            "postgres://flag/db"
        );
    }
}
