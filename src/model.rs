//! Simulation data types.

use serde::{Deserialize, Serialize};

/// Health state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

/// Vaccine held by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vaccine {
    #[default]
    None,
    TypeA,
    TypeB,
}

/// Agent of the simulation.
///
/// Each agent has a health state, a counter of days spent infected and at most one vaccine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: usize,
    health: Health,
    days_infected: u32,
    vaccine: Vaccine,
}

impl Agent {
    /// Create a new susceptible, unvaccinated agent.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            health: Health::Susceptible,
            days_infected: 0,
            vaccine: Vaccine::None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Number of turns taken while infected.
    pub fn days_infected(&self) -> u32 {
        self.days_infected
    }

    pub fn vaccine(&self) -> Vaccine {
        self.vaccine
    }

    pub fn vaccinated(&self) -> bool {
        self.vaccine != Vaccine::None
    }

    pub(crate) fn set_health(&mut self, health: Health) {
        self.health = health;
    }

    pub(crate) fn set_vaccine(&mut self, vaccine: Vaccine) {
        self.vaccine = vaccine;
    }

    pub(crate) fn count_day_infected(&mut self) {
        self.days_infected += 1;
    }
}

/// Rendering view of a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: usize,
    pub health: Health,
    pub vaccinated: bool,
    pub vaccine: Vaccine,
}

/// Read-only view of the network at a given tick.
///
/// Contains every node with its agent's state and every edge as a pair of node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of ticks performed so far.
    pub tick: usize,

    pub nodes: Vec<NodeView>,

    /// Undirected edges as `(i, j)` with `i < j`.
    pub edges: Vec<(usize, usize)>,
}
