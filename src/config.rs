use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "ANNOTATOR";

/// Runtime knobs read from `ANNOTATOR_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Print single-line JSON instead of pretty output.
    pub compact: bool,
    /// Transcripts handed to the thread pool at a time in `batch`.
    pub chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compact: false,
            chunk_size: 500,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Self {
        let settings = Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>());
        match settings {
            Ok(mut s) => {
                s.chunk_size = s.chunk_size.max(1);
                s
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid {}_* settings", ENV_PREFIX);
                Settings::default()
            }
        }
    }
}
