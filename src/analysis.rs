use crate::metrics::{Record, TimeSeries};
use anyhow::{Context, Result};
use rmp_serde::{decode, encode};
use serde::Serialize;
use serde_value::Value;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Observable computed from the records of a single run.
pub trait Obs {
    fn update(&mut self, record: &Record);
    fn report(&self) -> Result<(&'static str, Value)>;
}

fn to_entry<T: Serialize>(name: &'static str, val: T) -> Result<(&'static str, Value)> {
    let val = serde_value::to_value(val).with_context(|| format!("failed to serialize {name}"))?;
    Ok((name, val))
}

#[derive(Default)]
pub struct PeakInfected {
    peak: usize,
    tick: Option<usize>,
}

#[derive(Serialize)]
struct PeakInfectedReport {
    infected: usize,
    tick: Option<usize>,
}

impl Obs for PeakInfected {
    fn update(&mut self, record: &Record) {
        if self.tick.is_none() || record.infected > self.peak {
            self.peak = record.infected;
            self.tick = Some(record.tick);
        }
    }

    fn report(&self) -> Result<(&'static str, Value)> {
        to_entry(
            "peak_infected",
            PeakInfectedReport {
                infected: self.peak,
                tick: self.tick,
            },
        )
    }
}

#[derive(Default)]
pub struct FinalCounts {
    last: Option<Record>,
}

impl Obs for FinalCounts {
    fn update(&mut self, record: &Record) {
        self.last = Some(*record);
    }

    fn report(&self) -> Result<(&'static str, Value)> {
        to_entry("final_counts", self.last)
    }
}

/// Fraction of agents no longer susceptible at the last record.
#[derive(Default)]
pub struct AttackRate {
    rate: f64,
}

impl Obs for AttackRate {
    fn update(&mut self, record: &Record) {
        let n_agents = record.n_agents();
        self.rate = if n_agents > 0 {
            1.0 - record.susceptible as f64 / n_agents as f64
        } else {
            f64::NAN
        };
    }

    fn report(&self) -> Result<(&'static str, Value)> {
        to_entry("attack_rate", self.rate)
    }
}

/// Fraction of resolved cases that ended in death.
#[derive(Default)]
pub struct CaseFatality {
    recovered: usize,
    dead: usize,
}

impl Obs for CaseFatality {
    fn update(&mut self, record: &Record) {
        self.recovered = record.recovered;
        self.dead = record.dead;
    }

    fn report(&self) -> Result<(&'static str, Value)> {
        let n_resolved = self.recovered + self.dead;
        let ratio = if n_resolved > 0 {
            self.dead as f64 / n_resolved as f64
        } else {
            f64::NAN
        };
        to_entry("case_fatality", ratio)
    }
}

/// First tick starting with no infected agents.
#[derive(Default)]
pub struct EpidemicEnd {
    tick: Option<usize>,
}

impl Obs for EpidemicEnd {
    fn update(&mut self, record: &Record) {
        if self.tick.is_none() && record.infected == 0 {
            self.tick = Some(record.tick);
        }
    }

    fn report(&self) -> Result<(&'static str, Value)> {
        to_entry("epidemic_end", self.tick)
    }
}

pub struct Analyzer {
    obs_ptr_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new() -> Self {
        let obs_ptr_vec: Vec<Box<dyn Obs>> = vec![
            Box::new(PeakInfected::default()),
            Box::new(FinalCounts::default()),
            Box::new(AttackRate::default()),
            Box::new(CaseFatality::default()),
            Box::new(EpidemicEnd::default()),
        ];
        Self { obs_ptr_vec }
    }

    pub fn add_time_series(&mut self, time_series: &TimeSeries) {
        for record in time_series.records() {
            for obs in &mut self.obs_ptr_vec {
                obs.update(record);
            }
        }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        let time_series: TimeSeries =
            decode::from_read(&mut reader).context("failed to deserialize time series")?;
        self.add_time_series(&time_series);
        Ok(())
    }

    pub fn report(&self) -> Result<BTreeMap<&'static str, Value>> {
        self.obs_ptr_vec.iter().map(|obs| obs.report()).collect()
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let report = self.report().context("failed to report observables")?;

        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write_named(&mut writer, &report).context("failed to serialize results")?;
        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }
}
