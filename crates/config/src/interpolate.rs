//! Substitution of `<%= environ['..'] %>` and `<%= file['..'] %>` markers.
//!
//! Markers must make up the whole scalar. Anything else is left untouched, so a
//! password that merely contains `<%=` is passed through as written.

use std::path::Path;

use regex::Regex;
use serde_yaml::Value;

use crate::ConfigError;

const ENVIRONMENT_VARIABLE_PATTERN: &str = r"^<%=\s*environ\['(.*)'\]\s*%>$";
const FILE_PATTERN: &str = r"^<%=\s*file\['(.*)'\]\s*%>$";

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Resolves interpolation markers inside a parsed YAML document.
///
/// Environment lookups go through the closure handed to [`Interpolator::new`],
/// which keeps tests away from the process environment.
pub struct Interpolator {
    env_pattern: Regex,
    file_pattern: Regex,
    env: EnvLookup,
}

impl Interpolator {
    pub fn new<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        Ok(Self {
            env_pattern: Regex::new(ENVIRONMENT_VARIABLE_PATTERN)?,
            file_pattern: Regex::new(FILE_PATTERN)?,
            env: Box::new(env),
        })
    }

    pub fn from_process_env() -> Result<Self, ConfigError> {
        Self::new(|name| std::env::var(name).ok())
    }

    /// Walks `value` and replaces every marker scalar in place.
    pub fn resolve(&self, value: &mut Value) -> Result<(), ConfigError> {
        match value {
            Value::String(raw) => {
                if let Some(resolved) = self.resolve_scalar(raw)? {
                    *value = resolved;
                }
            }
            Value::Sequence(items) => {
                for item in items.iter_mut() {
                    self.resolve(item)?;
                }
            }
            Value::Mapping(map) => {
                for (_, item) in map.iter_mut() {
                    self.resolve(item)?;
                }
            }
            Value::Tagged(tagged) => self.resolve(&mut tagged.value)?,
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }

        Ok(())
    }

    fn resolve_scalar(&self, raw: &str) -> Result<Option<Value>, ConfigError> {
        if let Some(captures) = self.env_pattern.captures(raw) {
            let name = &captures[1];
            let value = (self.env)(name)
                .ok_or_else(|| ConfigError::EnvironmentVariableDoesNotExist(name.to_owned()))?;

            tracing::debug!("interpolated environment variable {name}");
            return Ok(Some(Value::String(value)));
        }

        if let Some(captures) = self.file_pattern.captures(raw) {
            let path = Path::new(&captures[1]);
            return read_file_value(path).map(Some);
        }

        Ok(None)
    }
}

fn read_file_value(path: &Path) -> Result<Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileDoesNotExist {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = content.trim();

    tracing::debug!("interpolated file {}", path.display());

    if content.contains('\n') {
        Ok(Value::Sequence(
            content
                .lines()
                .map(|line| Value::String(line.to_owned()))
                .collect(),
        ))
    } else {
        Ok(Value::String(content.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn interpolator_with(vars: &[(&str, &str)]) -> Interpolator {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Interpolator::new(move |name| vars.get(name).cloned()).unwrap()
    }

    fn resolve_str(interp: &Interpolator, yaml: &str) -> Result<Value, ConfigError> {
        let mut value: Value = serde_yaml::from_str(yaml).unwrap();
        interp.resolve(&mut value)?;
        Ok(value)
    }

    #[test]
    fn test_env_marker_replaced() {
        let interp = interpolator_with(&[("INVENTORY_USER", "admin")]);
        let value = resolve_str(&interp, "user: <%= environ['INVENTORY_USER'] %>").unwrap();
        assert_eq!(value["user"], Value::String("admin".into()));
    }

    #[test]
    fn test_env_marker_without_spaces() {
        let interp = interpolator_with(&[("A", "b")]);
        let value = resolve_str(&interp, "key: \"<%=environ['A']%>\"").unwrap();
        assert_eq!(value["key"], Value::String("b".into()));
    }

    #[test]
    fn test_missing_env_var_is_error() {
        let interp = interpolator_with(&[]);
        let err = resolve_str(&interp, "user: <%= environ['NOPE'] %>").unwrap_err();
        assert!(matches!(err, ConfigError::EnvironmentVariableDoesNotExist(ref n) if n == "NOPE"));
    }

    #[test]
    fn test_marker_must_be_whole_scalar() {
        let interp = interpolator_with(&[]);
        let value = resolve_str(&interp, "pw: \"x<%= environ['NOPE'] %>\"").unwrap();
        assert_eq!(value["pw"], Value::String("x<%= environ['NOPE'] %>".into()));
    }

    #[test]
    fn test_nested_sequences_are_walked() {
        let interp = interpolator_with(&[("FILTER", "Router:ModelX")]);
        let value = resolve_str(
            &interp,
            "report:\n  family_model_list:\n    - <%= environ['FILTER'] %>\n    - \"Switch:\"\n",
        )
        .unwrap();
        assert_eq!(
            value["report"]["family_model_list"],
            Value::Sequence(vec![
                Value::String("Router:ModelX".into()),
                Value::String("Switch:".into()),
            ])
        );
    }

    #[test]
    fn test_file_marker_single_line_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  s3cret  ").unwrap();
        let yaml = format!("pw: <%= file['{}'] %>", file.path().display());

        let value = resolve_str(&interpolator_with(&[]), &yaml).unwrap();
        assert_eq!(value["pw"], Value::String("s3cret".into()));
    }

    #[test]
    fn test_file_marker_multi_line_becomes_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Router:ModelX\nSwitch:\n").unwrap();
        let yaml = format!("filters: <%= file['{}'] %>", file.path().display());

        let value = resolve_str(&interpolator_with(&[]), &yaml).unwrap();
        assert_eq!(
            value["filters"],
            Value::Sequence(vec![
                Value::String("Router:ModelX".into()),
                Value::String("Switch:".into()),
            ])
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let yaml = format!("pw: <%= file['{}'] %>", missing.display());

        let err = resolve_str(&interpolator_with(&[]), &yaml).unwrap_err();
        assert!(matches!(err, ConfigError::FileDoesNotExist { path } if path == missing));
    }
}
