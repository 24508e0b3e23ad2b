//! Request (pairwise communication demand) model.
//!
//! Requests are produced upstream by the batch generator, one list per
//! round, and are read-only to the schedulers.

use serde::{Deserialize, Serialize};

/// Opaque node identifier (e.g. `"n12"`).
pub type NodeId = String;

/// A pairwise entanglement-distribution request between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Request identifier, unique within its round.
    pub id: String,
    /// Round number the request was issued in.
    pub round: usize,
    /// Source node.
    pub source: NodeId,
    /// Destination node.
    pub destination: NodeId,
    /// Base scheduling priority (higher = more important).
    #[serde(default)]
    pub priority: i32,
}

impl Request {
    /// Creates a request with base priority 0.
    pub fn new(
        id: impl Into<String>,
        round: usize,
        source: impl Into<NodeId>,
        destination: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            round,
            source: source.into(),
            destination: destination.into(),
            priority: 0,
        }
    }

    /// Sets the base priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether `node` is one of this request's endpoints.
    pub fn touches(&self, node: &str) -> bool {
        self.source == node || self.destination == node
    }

    /// Whether two requests share a source or destination node.
    pub fn shares_endpoint(&self, other: &Request) -> bool {
        self.touches(&other.source) || self.touches(&other.destination)
    }
}

/// One round of requests, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number.
    pub number: usize,
    /// Requests in arrival order.
    pub requests: Vec<Request>,
}

impl Round {
    /// Creates an empty round.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            requests: Vec::new(),
        }
    }

    /// Builds a round from `(id, source, destination)` tuples.
    pub fn from_tuples<I, S>(number: usize, tuples: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        let requests = tuples
            .into_iter()
            .map(|(id, src, dst)| Request::new(id, number, src, dst))
            .collect();
        Self { number, requests }
    }

    /// Appends a request, stamping it with this round's number.
    pub fn with_request(mut self, mut request: Request) -> Self {
        request.round = self.number;
        self.requests.push(request);
        self
    }

    /// Finds a request by ID.
    pub fn get(&self, request_id: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Arrival index of a request within this round.
    pub fn position(&self, request_id: &str) -> Option<usize> {
        self.requests.iter().position(|r| r.id == request_id)
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the round has no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Ordered collection of rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBatch {
    /// Rounds in ascending order.
    pub rounds: Vec<Round>,
}

impl RequestBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a round.
    pub fn with_round(mut self, round: Round) -> Self {
        self.rounds.push(round);
        self
    }

    /// Total number of requests across all rounds.
    pub fn total_requests(&self) -> usize {
        self.rounds.iter().map(Round::len).sum()
    }

    /// Finds a round by its number.
    pub fn round(&self, number: usize) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }
}
