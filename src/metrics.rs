use crate::model::{Agent, Health, Vaccine};
use serde::{Deserialize, Serialize};

/// Labels of the counts held by a [`Record`], in chart order.
pub const LABELS: [&str; 6] = [
    "susceptible",
    "infected",
    "recovered",
    "dead",
    "vaccinated_a",
    "vaccinated_b",
];

/// Population counts at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Tick at whose start the counts were taken.
    pub tick: usize,

    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub dead: usize,

    pub vaccinated_a: usize,
    pub vaccinated_b: usize,
}

impl Record {
    /// Count agents by health state and vaccine in a single pass.
    pub fn capture(tick: usize, agt_vec: &[Agent]) -> Self {
        let mut record = Record {
            tick,
            ..Default::default()
        };
        for agt in agt_vec {
            match agt.health() {
                Health::Susceptible => record.susceptible += 1,
                Health::Infected => record.infected += 1,
                Health::Recovered => record.recovered += 1,
                Health::Dead => record.dead += 1,
            }
            match agt.vaccine() {
                Vaccine::None => {}
                Vaccine::TypeA => record.vaccinated_a += 1,
                Vaccine::TypeB => record.vaccinated_b += 1,
            }
        }
        record
    }

    /// Look up a count by its label (see [`LABELS`]).
    pub fn get(&self, label: &str) -> Option<usize> {
        match label {
            "susceptible" => Some(self.susceptible),
            "infected" => Some(self.infected),
            "recovered" => Some(self.recovered),
            "dead" => Some(self.dead),
            "vaccinated_a" => Some(self.vaccinated_a),
            "vaccinated_b" => Some(self.vaccinated_b),
            _ => None,
        }
    }

    /// Number of agents accounted for by the health counts.
    pub fn n_agents(&self) -> usize {
        self.susceptible + self.infected + self.recovered + self.dead
    }
}

/// Append-only sequence of per-tick records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    records: Vec<Record>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Values of one labelled count over time, or `None` for an unknown label.
    pub fn column(&self, label: &str) -> Option<Vec<usize>> {
        if !LABELS.contains(&label) {
            return None;
        }
        self.records.iter().map(|record| record.get(label)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_counts_every_agent() {
        let mut agt_vec: Vec<_> = (0..6).map(Agent::new).collect();
        agt_vec[1].set_health(Health::Infected);
        agt_vec[2].set_health(Health::Infected);
        agt_vec[3].set_health(Health::Recovered);
        agt_vec[4].set_health(Health::Dead);
        agt_vec[0].set_vaccine(Vaccine::TypeA);
        agt_vec[4].set_vaccine(Vaccine::TypeB);
        agt_vec[5].set_vaccine(Vaccine::TypeB);

        let record = Record::capture(3, &agt_vec);
        assert_eq!(
            record,
            Record {
                tick: 3,
                susceptible: 2,
                infected: 2,
                recovered: 1,
                dead: 1,
                vaccinated_a: 1,
                vaccinated_b: 2,
            }
        );
        assert_eq!(record.n_agents(), 6);
    }

    #[test]
    fn lookup_by_label() {
        let record = Record {
            tick: 0,
            susceptible: 5,
            infected: 4,
            recovered: 3,
            dead: 2,
            vaccinated_a: 1,
            vaccinated_b: 0,
        };
        let values: Vec<_> = LABELS.iter().map(|label| record.get(label)).collect();
        assert_eq!(
            values,
            vec![Some(5), Some(4), Some(3), Some(2), Some(1), Some(0)]
        );
        assert_eq!(record.get("exposed"), None);
    }

    #[test]
    fn column_follows_push_order() {
        let mut time_series = TimeSeries::new();
        for tick in 0..4 {
            time_series.push(Record {
                tick,
                infected: 10 * tick,
                ..Default::default()
            });
        }
        assert_eq!(time_series.len(), 4);
        assert_eq!(time_series.column("infected"), Some(vec![0, 10, 20, 30]));
        assert_eq!(time_series.column("unknown"), None);
        assert_eq!(time_series.last().map(|record| record.tick), Some(3));
    }
}
