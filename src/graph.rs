use crate::config::{check_avg_degree, check_num};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_distr::Bernoulli;

/// Undirected contact graph over agent ids.
///
/// Stored as adjacency lists; fixed once generated.
#[derive(Debug, Clone)]
pub struct ContactGraph {
    adj_vec: Vec<Vec<usize>>,
    n_edges: usize,
}

impl ContactGraph {
    /// Generate a binomial random graph on `n_nodes` nodes.
    ///
    /// Each unordered pair of distinct nodes is connected independently
    /// with probability `avg_degree / n_nodes`.
    pub fn generate<R: Rng + ?Sized>(
        n_nodes: usize,
        avg_degree: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_num(n_nodes, 1..).context("invalid number of nodes")?;
        check_avg_degree(avg_degree, n_nodes).context("invalid average degree")?;

        let edge_dist = Bernoulli::new(avg_degree / n_nodes as f64)?;

        let mut adj_vec = vec![Vec::new(); n_nodes];
        let mut n_edges = 0;
        for i in 0..n_nodes {
            for j in (i + 1)..n_nodes {
                if edge_dist.sample(rng) {
                    adj_vec[i].push(j);
                    adj_vec[j].push(i);
                    n_edges += 1;
                }
            }
        }

        log::debug!("generated graph with {n_nodes} nodes and {n_edges} edges");

        Ok(Self { adj_vec, n_edges })
    }

    pub fn n_nodes(&self) -> usize {
        self.adj_vec.len()
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adj_vec[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adj_vec[node].len()
    }

    /// Iterate over each edge once, as `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj_vec.iter().enumerate().flat_map(|(i, adj)| {
            adj.iter().filter(move |&&j| i < j).map(move |&j| (i, j))
        })
    }
}
