//! Minimum-cost perfect matching on a square cost matrix.
//!
//! The matching is found as a min-cost flow of value N through the network
//!
//! ```text
//! source ──(1, 0)──▶ row i ──(1, cost[i][j])──▶ column j ──(1, 0)──▶ sink
//! ```
//!
//! using successive shortest augmenting paths. Residual arcs carry negative
//! cost, so shortest paths are found with a queue-based Bellman-Ford.

use std::collections::VecDeque;

use crate::error::ArbError;

#[derive(Debug, Clone)]
struct FlowArc {
    to: usize,
    /// Index of the paired arc in `graph[to]`
    rev: usize,
    /// Remaining capacity
    cap: i64,
    cost: i64,
}

/// Handle to an arc added with [`MinCostFlow::add_arc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArcId {
    from: usize,
    index: usize,
}

/// Outcome of [`MinCostFlow::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlowResult {
    pub flow: i64,
    pub cost: i64,
}

/// Residual flow network with integer capacities and costs.
#[derive(Debug, Clone)]
pub(crate) struct MinCostFlow {
    graph: Vec<Vec<FlowArc>>,
}

impl MinCostFlow {
    pub(crate) fn new(nodes: usize) -> Self {
        MinCostFlow {
            graph: vec![Vec::new(); nodes],
        }
    }

    pub(crate) fn add_arc(&mut self, from: usize, to: usize, cap: i64, cost: i64) -> ArcId {
        let index = self.graph[from].len();
        let rev = self.graph[to].len() + usize::from(from == to);
        self.graph[from].push(FlowArc { to, rev, cap, cost });
        self.graph[to].push(FlowArc {
            to: from,
            rev: index,
            cap: 0,
            cost: -cost,
        });
        ArcId { from, index }
    }

    /// Flow currently routed over `id`.
    pub(crate) fn flow_on(&self, id: ArcId) -> i64 {
        let arc = &self.graph[id.from][id.index];
        self.graph[arc.to][arc.rev].cap
    }

    /// Push up to `demand` units from `source` to `sink` at minimum cost.
    ///
    /// Stops early when the sink becomes unreachable; the caller compares
    /// `FlowResult::flow` against what it asked for.
    pub(crate) fn run(&mut self, source: usize, sink: usize, demand: i64) -> FlowResult {
        let n = self.graph.len();
        let mut result = FlowResult { flow: 0, cost: 0 };

        while result.flow < demand {
            let mut dist = vec![i64::MAX; n];
            let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
            let mut queued = vec![false; n];
            let mut queue = VecDeque::new();

            dist[source] = 0;
            queue.push_back(source);
            queued[source] = true;

            while let Some(u) = queue.pop_front() {
                queued[u] = false;
                for (k, arc) in self.graph[u].iter().enumerate() {
                    if arc.cap <= 0 {
                        continue;
                    }
                    let candidate = dist[u] + arc.cost;
                    if candidate < dist[arc.to] {
                        dist[arc.to] = candidate;
                        prev[arc.to] = Some((u, k));
                        if !queued[arc.to] {
                            queued[arc.to] = true;
                            queue.push_back(arc.to);
                        }
                    }
                }
            }

            if dist[sink] == i64::MAX {
                break;
            }

            let mut push = demand - result.flow;
            let mut v = sink;
            while let Some((u, k)) = prev[v] {
                push = push.min(self.graph[u][k].cap);
                v = u;
            }

            let mut v = sink;
            while let Some((u, k)) = prev[v] {
                let (to, rev) = (self.graph[u][k].to, self.graph[u][k].rev);
                self.graph[u][k].cap -= push;
                self.graph[to][rev].cap += push;
                v = u;
            }

            result.flow += push;
            result.cost += push * dist[sink];
        }

        result
    }
}

/// Assign every row of the square matrix `costs` a distinct column so that
/// the summed cost is minimal. `sol[i]` is the column given to row `i`.
pub fn solve_assignment(costs: &[Vec<usize>]) -> Result<Vec<usize>, ArbError> {
    let n = costs.len();
    if let Some(row) = costs.iter().find(|row| row.len() != n) {
        return Err(ArbError::LengthMismatch {
            left: n,
            right: row.len(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let source = 0;
    let sink = 2 * n + 1;
    let row_node = |i: usize| 1 + i;
    let col_node = |j: usize| 1 + n + j;

    let mut network = MinCostFlow::new(2 * n + 2);
    for i in 0..n {
        network.add_arc(source, row_node(i), 1, 0);
    }
    let mut pairs = Vec::with_capacity(n * n);
    for (i, row) in costs.iter().enumerate() {
        for (j, &cost) in row.iter().enumerate() {
            pairs.push(network.add_arc(row_node(i), col_node(j), 1, cost as i64));
        }
    }
    for j in 0..n {
        network.add_arc(col_node(j), sink, 1, 0);
    }

    let result = network.run(source, sink, n as i64);
    if result.flow != n as i64 {
        return Err(ArbError::AssignmentInfeasible {
            required: n,
            achieved: result.flow.max(0) as usize,
        });
    }

    let mut sol = vec![0; n];
    for i in 0..n {
        for j in 0..n {
            if network.flow_on(pairs[i * n + j]) > 0 {
                sol[i] = j;
            }
        }
    }
    Ok(sol)
}

/// Summed cost of an assignment.
pub fn assignment_cost(costs: &[Vec<usize>], sol: &[usize]) -> usize {
    sol.iter().enumerate().map(|(i, &j)| costs[i][j]).sum()
}
