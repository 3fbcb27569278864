use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::corpus::PrepareOptions;

/// Prefix of environment overrides, e.g. `EVAL2000__CORPUS__AUDIO_DIR`
const ENV_PREFIX: &str = "EVAL2000";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub options: OptionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    pub audio_dir: PathBuf,
    pub transcripts_dir: PathBuf,
    #[serde(default)]
    pub sentiment_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    pub omit_silence: bool,
    pub absolute_paths: bool,
    pub relative_path_depth: usize,
}

/// Command-line values that take precedence over the loaded config.
/// `None` leaves the configured value untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub audio_dir: Option<PathBuf>,
    pub transcripts_dir: Option<PathBuf>,
    pub sentiment_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub omit_silence: Option<bool>,
    pub absolute_paths: Option<bool>,
}

impl Config {
    /// Layer built-in defaults, an optional config file and environment
    /// variables, in increasing priority
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: &str, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("corpus.audio_dir", "download/eval2000")?
            .set_default("corpus.transcripts_dir", "download/eval2000_trans")?
            .set_default("corpus.output_dir", "data/manifests")?
            .set_default("options.omit_silence", true)?
            .set_default("options.absolute_paths", false)?
            .set_default("options.relative_path_depth", 3)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(dir) = overrides.audio_dir {
            self.corpus.audio_dir = dir;
        }
        if let Some(dir) = overrides.transcripts_dir {
            self.corpus.transcripts_dir = dir;
        }
        if overrides.sentiment_dir.is_some() {
            self.corpus.sentiment_dir = overrides.sentiment_dir;
        }
        if overrides.output_dir.is_some() {
            self.corpus.output_dir = overrides.output_dir;
        }
        if let Some(omit) = overrides.omit_silence {
            self.options.omit_silence = omit;
        }
        if let Some(absolute) = overrides.absolute_paths {
            self.options.absolute_paths = absolute;
        }
    }

    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            omit_silence: self.options.omit_silence,
            absolute_paths: self.options.absolute_paths,
            relative_path_depth: self.options.relative_path_depth,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}
