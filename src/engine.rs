use crate::config::{Config, InitConfig, ModelConfig};
use crate::graph::ContactGraph;
use crate::metrics::{Record, TimeSeries};
use crate::model::{Agent, Health, NodeView, Snapshot, Vaccine};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Bernoulli;

/// Death probability of an infected agent holding the type B vaccine.
pub const PROB_DEATH_TYPE_B: f64 = 0.005;

/// Per-vaccine event distributions, derived once from the model parameters.
struct EventDists {
    death: [Bernoulli; 3],
    recovery: Bernoulli,
    infection: [Bernoulli; 3],
}

impl EventDists {
    fn new(cfg: &ModelConfig) -> Result<Self> {
        let death = [
            Bernoulli::new(cfg.prob_death)?,
            Bernoulli::new(0.0)?,
            Bernoulli::new(PROB_DEATH_TYPE_B)?,
        ];
        let recovery = Bernoulli::new(cfg.prob_recovery)?;
        let infection = [
            Bernoulli::new(cfg.prob_infection)?,
            Bernoulli::new(cfg.prob_infection * (1.0 - cfg.efficacy_a))?,
            Bernoulli::new(cfg.prob_infection * (1.0 - cfg.efficacy_b))?,
        ];
        Ok(Self {
            death,
            recovery,
            infection,
        })
    }

    fn death(&self, vaccine: Vaccine) -> &Bernoulli {
        &self.death[vaccine_idx(vaccine)]
    }

    /// Infection distribution for a recipient holding `vaccine`.
    fn infection(&self, vaccine: Vaccine) -> &Bernoulli {
        &self.infection[vaccine_idx(vaccine)]
    }
}

fn vaccine_idx(vaccine: Vaccine) -> usize {
    match vaccine {
        Vaccine::None => 0,
        Vaccine::TypeA => 1,
        Vaccine::TypeB => 2,
    }
}

/// Simulation engine.
///
/// Owns the configuration, contact graph, agents, time series and random number generator,
/// and advances the simulation one tick at a time.
pub struct Engine {
    cfg: Config,
    graph: ContactGraph,
    agt_vec: Vec<Agent>,
    time_series: TimeSeries,
    tick: usize,
    rng: ChaCha12Rng,
    dists: EventDists,
    i_agt_order: Vec<usize>,
}

impl Engine {
    /// Create a new `Engine` from a configuration and a seed.
    ///
    /// Generates the contact graph and the initial population.
    /// The same configuration and seed always produce the same run.
    pub fn new(cfg: Config, seed: u64) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let mut rng = ChaCha12Rng::seed_from_u64(seed);

        let graph = ContactGraph::generate(cfg.init.n_agents, cfg.init.avg_degree, &mut rng)
            .context("failed to generate contact graph")?;

        let agt_vec = populate(&cfg.init, &mut rng);

        let dists = EventDists::new(&cfg.model).context("failed to construct distributions")?;

        let i_agt_order = (0..cfg.init.n_agents).collect();

        Ok(Self {
            cfg,
            graph,
            agt_vec,
            time_series: TimeSeries::new(),
            tick: 0,
            rng,
            dists,
            i_agt_order,
        })
    }

    /// Record the current counts, then give every agent one turn in a random order.
    pub fn advance_tick(&mut self) {
        let record = Record::capture(self.tick, &self.agt_vec);
        log::debug!("{record:?}");
        self.time_series.push(record);

        let mut i_agt_order = std::mem::take(&mut self.i_agt_order);
        i_agt_order.shuffle(&mut self.rng);
        for &i_agt in &i_agt_order {
            self.perform_turn(i_agt);
        }
        self.i_agt_order = i_agt_order;

        self.tick += 1;
    }

    /// Advance the simulation by `n_ticks` ticks, logging progress.
    pub fn run(&mut self, n_ticks: usize) {
        let ticks_per_log = (n_ticks / 10).max(1);
        for i_tick in 0..n_ticks {
            self.advance_tick();

            if (i_tick + 1) % ticks_per_log == 0 || i_tick + 1 == n_ticks {
                let progress = 100.0 * (i_tick + 1) as f64 / n_ticks as f64;
                log::info!("completed {progress:06.2}%");
            }
        }
    }

    fn perform_turn(&mut self, i_agt: usize) {
        let agt = &mut self.agt_vec[i_agt];
        if agt.health() != Health::Infected {
            return;
        }

        agt.count_day_infected();

        if self.dists.death(agt.vaccine()).sample(&mut self.rng) {
            agt.set_health(Health::Dead);
            log::trace!("agent {i_agt} died");
            return;
        }

        if self.dists.recovery.sample(&mut self.rng) {
            agt.set_health(Health::Recovered);
            log::trace!("agent {i_agt} recovered");
            return;
        }

        // State is checked at each attempt since earlier turns may have infected a neighbor.
        for &i_nbr in self.graph.neighbors(i_agt) {
            let nbr = &mut self.agt_vec[i_nbr];
            if nbr.health() != Health::Susceptible {
                continue;
            }
            if self.dists.infection(nbr.vaccine()).sample(&mut self.rng) {
                nbr.set_health(Health::Infected);
                log::trace!("agent {i_agt} infected agent {i_nbr}");
            }
        }
    }

    /// Current state of every node and every edge, for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let nodes = self
            .agt_vec
            .iter()
            .map(|agt| NodeView {
                id: agt.id(),
                health: agt.health(),
                vaccinated: agt.vaccinated(),
                vaccine: agt.vaccine(),
            })
            .collect();
        let edges = self.graph.edges().collect();
        Snapshot {
            tick: self.tick,
            nodes,
            edges,
        }
    }

    /// Records of all completed ticks.
    pub fn time_series(&self) -> &TimeSeries {
        &self.time_series
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agt_vec
    }

    pub fn graph(&self) -> &ContactGraph {
        &self.graph
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    /// Number of ticks performed so far.
    pub fn tick(&self) -> usize {
        self.tick
    }
}

/// Number of agents selected by a coverage fraction, capped at `n_agents`.
fn count_from_frac(frac: f64, n_agents: usize) -> usize {
    ((frac * n_agents as f64).floor() as usize).min(n_agents)
}

/// Create the agents and allocate initial infections and vaccines.
fn populate<R: Rng + ?Sized>(cfg: &InitConfig, rng: &mut R) -> Vec<Agent> {
    let n_agents = cfg.n_agents;
    let mut agt_vec: Vec<_> = (0..n_agents).map(Agent::new).collect();
    let i_agt_all: Vec<_> = (0..n_agents).collect();

    let n_infected = count_from_frac(cfg.frac_infected, n_agents);
    for &i_agt in i_agt_all.choose_multiple(rng, n_infected) {
        agt_vec[i_agt].set_health(Health::Infected);
    }

    let n_vaccine_a = count_from_frac(cfg.frac_vaccine_a, n_agents);
    for &i_agt in i_agt_all.choose_multiple(rng, n_vaccine_a) {
        agt_vec[i_agt].set_vaccine(Vaccine::TypeA);
    }

    // Type B doses go only to agents without type A, as many as remain.
    let i_agt_unvaccinated: Vec<_> = i_agt_all
        .iter()
        .copied()
        .filter(|&i_agt| !agt_vec[i_agt].vaccinated())
        .collect();
    let n_vaccine_b =
        count_from_frac(cfg.frac_vaccine_b, n_agents).min(i_agt_unvaccinated.len());
    for &i_agt in i_agt_unvaccinated.choose_multiple(rng, n_vaccine_b) {
        agt_vec[i_agt].set_vaccine(Vaccine::TypeB);
    }

    log::info!(
        "populated {n_agents} agents: {n_infected} infected, {n_vaccine_a} with type A, {n_vaccine_b} with type B"
    );

    agt_vec
}
