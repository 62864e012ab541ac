use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

use log::{debug, trace, warn};

use crate::autograd::BackwardOp;
use crate::error::TensorGradError;
use crate::ops::linalg::MatmulConfig;
use crate::tensor::broadcast_utils::read_pair;
use crate::tensor::{ones_like, Tensor, TensorId};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Integer handle of a node in a [`Graph`] arena.
///
/// A tensor's `creator` is one of these: it names the node without owning
/// it. The graph id makes handles from another (or a reset) graph detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    pub fn graph_id(&self) -> u64 {
        self.graph
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// One recorded operator invocation.
struct Node {
    op: Box<dyn BackwardOp>,
    inputs: Vec<Tensor>,
    output: Tensor,
}

/// Settings shared by every operator recorded in a graph.
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    pub matmul: MatmulConfig,
}

/// Arena of the nodes recorded during one forward pass.
///
/// Operators append nodes as they run; [`Graph::backward`] replays the part
/// reachable from a terminal tensor in reverse topological order. The arena
/// owns every node (and through them every intermediate tensor), so the
/// whole graph stays alive until the `Graph` is dropped or reset.
pub struct Graph {
    id: u64,
    config: GraphConfig,
    nodes: RwLock<Vec<Node>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Graph {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            config,
            nodes: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.read_nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every node and takes a fresh id, so creator handles recorded
    /// before the reset are rejected instead of aliasing new nodes.
    pub fn reset(&mut self) {
        self.nodes.get_mut().expect("RwLock poisoned").clear();
        self.id = NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed);
    }

    /// Operator name of a node, if the handle belongs to this graph.
    pub fn op_name(&self, id: NodeId) -> Option<&'static str> {
        if id.graph != self.id {
            return None;
        }
        self.read_nodes().get(id.index).map(|node| node.op.name())
    }

    fn read_nodes(&self) -> RwLockReadGuard<'_, Vec<Node>> {
        self.nodes.read().expect("RwLock poisoned")
    }

    /// Attaches a node producing `output` from `inputs`.
    ///
    /// Nothing is recorded (and `make_op` is not called) unless at least one
    /// input requires grad. When a node is recorded, `output` becomes a
    /// tracked internal tensor whose creator is the new node.
    pub(crate) fn record<B, F>(&self, output: &Tensor, inputs: &[&Tensor], make_op: F) -> Option<NodeId>
    where
        B: BackwardOp + 'static,
        F: FnOnce() -> B,
    {
        if !inputs.iter().any(|t| t.requires_grad()) {
            return None;
        }
        let op = make_op();
        let mut nodes = self.nodes.write().expect("RwLock poisoned");
        let id = NodeId {
            graph: self.id,
            index: nodes.len(),
        };
        trace!("record node {} ({}) with {} inputs", id.index, op.name(), inputs.len());
        {
            let mut out = output.write_data();
            out.requires_grad = true;
            out.creator = Some(id);
        }
        nodes.push(Node {
            op: Box::new(op),
            inputs: inputs.iter().map(|&t| t.clone()).collect(),
            output: output.clone(),
        });
        Some(id)
    }

    fn check_owned(&self, id: NodeId, len: usize) -> Result<(), TensorGradError> {
        if id.graph != self.id || id.index >= len {
            return Err(TensorGradError::GraphMismatch {
                expected: self.id,
                actual: id.graph,
            });
        }
        Ok(())
    }

    /// Every node reachable from `root` through creator links, ordered so
    /// that each node comes after the nodes producing its inputs.
    ///
    /// Depth-first post-order with a visited set keyed by node handle: a
    /// node shared by several consumers is listed once.
    ///
    /// # Errors
    /// `GraphMismatch` if a creator handle on the path belongs to another graph.
    pub fn topological_order(&self, root: &Tensor) -> Result<Vec<NodeId>, TensorGradError> {
        let root_id = match root.creator() {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };
        let nodes = self.read_nodes();
        self.check_owned(root_id, nodes.len())?;

        let mut visited: HashSet<usize> = HashSet::new();
        let mut order = Vec::new();
        // (index, children already pushed)
        let mut stack: Vec<(usize, bool)> = vec![(root_id.index, false)];

        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                order.push(NodeId { graph: self.id, index });
                continue;
            }
            if !visited.insert(index) {
                continue;
            }
            stack.push((index, true));
            for input in nodes[index].inputs.iter().rev() {
                if let Some(child) = input.creator() {
                    self.check_owned(child, nodes.len())?;
                    if !visited.contains(&child.index) {
                        stack.push((child.index, false));
                    }
                }
            }
        }
        Ok(order)
    }

    /// Backpropagates from `root`.
    ///
    /// If `root` has no gradient yet its slot is seeded with ones of its own
    /// shape; the slot's content is what this call propagates. Each call adds
    /// its own contribution to every tracked tensor on the way, including
    /// tensors that already hold one; clearing them between steps is the
    /// optimizer's job.
    pub fn backward(&self, root: &Tensor) -> Result<(), TensorGradError> {
        if !root.requires_grad() {
            warn!("backward() on a tensor that does not require grad; nothing to do");
            return Ok(());
        }
        let seed = match root.grad() {
            Some(existing) => existing.detach(),
            None => {
                let ones = ones_like(root)?;
                root.acc_grad(&ones)?;
                ones
            }
        };
        self.replay(root, seed)
    }

    /// Backpropagates `gradient` from `root`, adding it to the root's slot.
    ///
    /// # Errors
    /// `GradientAccumulationShapeMismatch` if `gradient` does not have the
    /// shape of `root`.
    pub fn backward_with_grad(&self, root: &Tensor, gradient: &Tensor) -> Result<(), TensorGradError> {
        if !root.requires_grad() {
            warn!("backward_with_grad() on a tensor that does not require grad; nothing to do");
            return Ok(());
        }
        root.acc_grad(gradient)?;
        self.replay(root, gradient.detach())
    }

    /// Replays the nodes under `root` in reverse topological order.
    ///
    /// Upstream gradients for this call live in `pending`, keyed by the
    /// output tensor; persistent slots are only written to, never read back.
    fn replay(&self, root: &Tensor, seed: Tensor) -> Result<(), TensorGradError> {
        let order = self.topological_order(root)?;
        debug!("graph {}: backward over {} of {} nodes", self.id, order.len(), self.len());

        let mut pending: HashMap<TensorId, Tensor> = HashMap::new();
        pending.insert(root.id(), seed);

        let nodes = self.read_nodes();
        for id in order.iter().rev() {
            let node = &nodes[id.index];
            let grad_output = match pending.remove(&node.output.id()) {
                Some(g) => g,
                None => {
                    trace!("node {} ({}) received no gradient", id.index, node.op.name());
                    continue;
                }
            };
            trace!("replay node {} ({})", id.index, node.op.name());

            let input_grads = node.op.backward(&grad_output)?;
            if input_grads.len() != node.inputs.len() {
                return Err(TensorGradError::InternalError(format!(
                    "{} returned {} gradients for {} inputs",
                    node.op.name(),
                    input_grads.len(),
                    node.inputs.len()
                )));
            }
            for (input, grad) in node.inputs.iter().zip(input_grads.iter()) {
                if !input.requires_grad() {
                    continue;
                }
                input.acc_grad(grad)?;
                if input.creator().is_some() {
                    merge_pending(&mut pending, input, grad)?;
                }
            }
        }
        Ok(())
    }
}

/// Adds `grad` to the gradient `input` has collected so far in this replay.
fn merge_pending(
    pending: &mut HashMap<TensorId, Tensor>,
    input: &Tensor,
    grad: &Tensor,
) -> Result<(), TensorGradError> {
    match pending.entry(input.id()) {
        Entry::Occupied(mut slot) => {
            let summed: Vec<f64> = read_pair(slot.get(), grad, |acc, add| {
                acc.data.iter().zip(add.data.iter()).map(|(a, b)| a + b).collect()
            });
            let shape = slot.get().shape();
            slot.insert(Tensor::new(summed, shape)?);
        }
        Entry::Vacant(slot) => {
            slot.insert(grad.detach());
        }
    }
    Ok(())
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nodes.read() {
            Ok(nodes) => {
                let names: Vec<&'static str> = nodes.iter().map(|n| n.op.name()).collect();
                write!(f, "Graph(id={}, nodes={:?})", self.id, names)
            }
            Err(_) => write!(f, "Graph(id={}, Error: RwLock poisoned)", self.id),
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
