use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Disease and vaccine parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Per-tick probability that an infected agent infects a susceptible neighbor.
    pub prob_infection: f64,
    /// Per-tick probability that an infected agent recovers.
    pub prob_recovery: f64,
    /// Per-tick probability that an unvaccinated infected agent dies.
    pub prob_death: f64,

    /// Transmission resistance of type A vaccinated agents.
    pub efficacy_a: f64,
    /// Transmission resistance of type B vaccinated agents.
    pub efficacy_b: f64,
}

/// Population and network parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Number of agents (nodes of the contact graph).
    pub n_agents: usize,
    /// Expected number of contacts per agent.
    pub avg_degree: f64,

    /// Fraction of agents infected at the start.
    pub frac_infected: f64,

    /// Fraction of agents receiving the type A vaccine.
    pub frac_vaccine_a: f64,
    /// Fraction of agents receiving the type B vaccine.
    pub frac_vaccine_b: f64,
}

/// Output parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of ticks performed by a run.
    pub n_ticks: usize,
}

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                prob_infection: 0.3,
                prob_recovery: 0.1,
                prob_death: 0.002,
                efficacy_a: 0.79,
                efficacy_b: 0.95,
            },
            init: InitConfig {
                n_agents: 100,
                avg_degree: 4.0,
                frac_infected: 0.05,
                frac_vaccine_a: 0.0,
                frac_vaccine_b: 0.0,
            },
            output: OutputConfig { n_ticks: 100 },
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check every parameter against its admissible range.
    pub fn validate(&self) -> Result<()> {
        self.model.validate().context("invalid model parameters")?;
        self.init.validate().context("invalid init parameters")?;

        check_num(self.output.n_ticks, 1..=1_000_000).context("invalid number of ticks")?;

        Ok(())
    }
}

impl ModelConfig {
    fn validate(&self) -> Result<()> {
        check_num(self.prob_infection, 0.0..=1.0).context("invalid infection probability")?;
        check_num(self.prob_recovery, 0.0..=1.0).context("invalid recovery probability")?;
        check_num(self.prob_death, 0.0..=1.0).context("invalid death probability")?;

        check_num(self.efficacy_a, 0.0..=1.0).context("invalid type A efficacy")?;
        check_num(self.efficacy_b, 0.0..=1.0).context("invalid type B efficacy")?;

        Ok(())
    }
}

impl InitConfig {
    fn validate(&self) -> Result<()> {
        check_num(self.n_agents, 1..).context("invalid number of agents")?;
        check_avg_degree(self.avg_degree, self.n_agents).context("invalid average degree")?;

        check_num(self.frac_infected, 0.0..=1.0).context("invalid infected fraction")?;
        check_num(self.frac_vaccine_a, 0.0..=1.0).context("invalid type A coverage")?;
        check_num(self.frac_vaccine_b, 0.0..=1.0).context("invalid type B coverage")?;

        Ok(())
    }
}

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

/// The edge probability `avg_degree / n_agents` must lie in (0, 1).
pub fn check_avg_degree(avg_degree: f64, n_agents: usize) -> Result<()> {
    if !(avg_degree > 0.0) {
        bail!("average degree must be positive, but is {avg_degree}");
    }
    if avg_degree >= n_agents as f64 {
        bail!("average degree must be smaller than {n_agents}, but is {avg_degree}");
    }
    Ok(())
}
