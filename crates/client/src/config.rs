//! Simulator configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless skirmish.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub seed: u64,
    /// Rounds after which an undecided match is called a draw.
    pub max_rounds: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/skirmish"),
            seed: 0,
            max_rounds: 50,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SIM_DATA_DIR`
    /// - `SIM_SEED`
    /// - `SIM_MAX_ROUNDS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os("SIM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }

        if let Some(rounds) = read_env::<u32>("SIM_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
