use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{0}' specified in the configuration file does not exist!")]
    EnvironmentVariableDoesNotExist(String),

    #[error("File '{}' specified in the configuration file does not exist!", path.display())]
    FileDoesNotExist { path: PathBuf },

    #[error("reading `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("copying config template `{}` to `{}`: {source}", from.display(), to.display())]
    TemplateCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing YAML `{path}`: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid family/model filter `{raw}`: {reason}")]
    InvalidFilter { raw: String, reason: &'static str },

    #[error("{0}")]
    Pattern(#[from] regex::Error),
}
