//! # headsweep-types: Core types for `headsweep`
//!
//! This crate contains the value types shared across the workspace:
//! - Positions and identities ([`Track`], [`RequestId`])
//! - Head movement ([`Direction`])
//! - Algorithm selection ([`Algorithm`], [`UnknownAlgorithm`])
//! - Request input ([`DiskRequest`], [`RequestSpec`], [`ParseRequestError`])
//! - Simulation input ([`Scenario`])
//! - Trace output ([`Step`], [`StepKind`], [`AlgorithmResult`])

use std::{
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Upper track bound used when a scenario does not name one.
pub const DEFAULT_MAX_TRACK: i64 = 999;

/// Lower track bound used when a scenario does not name one.
pub const DEFAULT_MIN_TRACK: i64 = 0;

/// Batch size for SCAN-N and LOOK-N when a scenario does not name one.
pub const DEFAULT_N_STEP: usize = 2;

/// Cost of moving the head across one track.
pub const DEFAULT_TIME_PER_TRACK: f64 = 1.0;

// ============================================================================
// Positions and identities - All Copy
// ============================================================================

/// A concentric addressable position on the disk surface.
///
/// Tracks are signed: the core never clamps requests against the domain
/// bounds, so out-of-range positions are representable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Track(i64);

impl Track {
    pub const ZERO: Track = Track(0);

    pub fn new(track: i64) -> Self {
        Self(track)
    }

    /// Returns the track number as an `i64`.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Number of tracks the head crosses moving from `self` to `other`.
    pub fn distance_to(self, other: Track) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Track {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Track> for i64 {
    fn from(track: Track) -> Self {
        track.0
    }
}

/// Stable identity of a request within one simulation.
///
/// Requests are stored in an arena in input order; the id is the arena
/// index. Two requests with identical track and arrival time have distinct
/// ids and are serviced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(usize);

impl RequestId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Direction of head travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards higher track numbers.
    #[default]
    Asc,
    /// Towards lower track numbers.
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Asc)
    }

    /// Direction of a move from `from` to `to`.
    ///
    /// A move that goes nowhere counts as descending.
    pub fn of_move(from: Track, to: Track) -> Self {
        if to > from {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }

    /// Returns true if `track` lies strictly ahead of `head` in this direction.
    pub fn is_ahead(self, head: Track, track: Track) -> bool {
        match self {
            Direction::Asc => track > head,
            Direction::Desc => track < head,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (expected asc or desc)")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "up" | "ascending" => Ok(Direction::Asc),
            "desc" | "down" | "descending" => Ok(Direction::Desc),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

// ============================================================================
// Algorithm
// ============================================================================

/// Disk scheduling algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Shortest seek time first.
    #[serde(rename = "SSTF")]
    Sstf,
    /// Elevator sweep that bounces off the physical edges.
    #[serde(rename = "SCAN")]
    Scan,
    /// Elevator sweep that turns around at the last request.
    #[serde(rename = "LOOK")]
    Look,
    /// Circular SCAN: sweeps one way, jumps back edge to edge.
    #[serde(rename = "C-SCAN")]
    CScan,
    /// Circular LOOK: sweeps one way, jumps back request to request.
    #[serde(rename = "C-LOOK")]
    CLook,
    /// SCAN over frozen batches of N requests.
    #[serde(rename = "SCAN-N")]
    ScanN,
    /// LOOK over frozen batches of N requests.
    #[serde(rename = "LOOK-N")]
    LookN,
    /// SCAN over a frozen queue with a second queue collecting arrivals.
    #[serde(rename = "F-SCAN")]
    FScan,
    /// LOOK over a frozen queue with a second queue collecting arrivals.
    #[serde(rename = "F-LOOK")]
    FLook,
}

impl Algorithm {
    /// Every algorithm, in presentation order.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Sstf,
        Algorithm::Scan,
        Algorithm::Look,
        Algorithm::CScan,
        Algorithm::CLook,
        Algorithm::ScanN,
        Algorithm::LookN,
        Algorithm::FScan,
        Algorithm::FLook,
    ];

    /// Returns the canonical tag (`"C-SCAN"`, `"LOOK-N"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sstf => "SSTF",
            Algorithm::Scan => "SCAN",
            Algorithm::Look => "LOOK",
            Algorithm::CScan => "C-SCAN",
            Algorithm::CLook => "C-LOOK",
            Algorithm::ScanN => "SCAN-N",
            Algorithm::LookN => "LOOK-N",
            Algorithm::FScan => "F-SCAN",
            Algorithm::FLook => "F-LOOK",
        }
    }

    /// Circular algorithms keep their direction for the whole run.
    pub fn is_circular(self) -> bool {
        matches!(self, Algorithm::CScan | Algorithm::CLook)
    }

    /// Algorithms that travel to the physical edge of the domain.
    pub fn visits_edges(self) -> bool {
        matches!(self, Algorithm::Scan | Algorithm::CScan | Algorithm::ScanN | Algorithm::FScan)
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an algorithm tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Parses a tag case-insensitively; `_` is accepted in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == normalized)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

// ============================================================================
// Requests
// ============================================================================

/// One pending I/O operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestSpec", rename_all = "camelCase")]
pub struct DiskRequest {
    pub track: Track,
    /// Simulated time at which the request becomes known to the scheduler.
    pub arrival_time: f64,
}

impl DiskRequest {
    pub fn new(track: impl Into<Track>, arrival_time: f64) -> Self {
        Self {
            track: track.into(),
            arrival_time,
        }
    }

    /// A request that is already waiting when the simulation starts.
    pub fn immediate(track: impl Into<Track>) -> Self {
        Self::new(track, 0.0)
    }
}

impl From<i64> for DiskRequest {
    fn from(track: i64) -> Self {
        Self::immediate(track)
    }
}

impl From<(i64, f64)> for DiskRequest {
    fn from((track, arrival_time): (i64, f64)) -> Self {
        Self::new(track, arrival_time)
    }
}

/// Request as written by a user: a bare track number or a full record.
///
/// Bare numbers are normalized to requests arriving at time 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestSpec {
    Track(i64),
    Request {
        track: i64,
        #[serde(default, rename = "arrivalTime", alias = "arrival_time")]
        arrival_time: f64,
    },
}

impl From<RequestSpec> for DiskRequest {
    fn from(spec: RequestSpec) -> Self {
        match spec {
            RequestSpec::Track(track) => DiskRequest::immediate(track),
            RequestSpec::Request {
                track,
                arrival_time,
            } => DiskRequest::new(track, arrival_time),
        }
    }
}

/// Error returned when a `TRACK[@ARRIVAL]` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRequestError {
    #[error("invalid track '{0}'")]
    Track(String),

    #[error("invalid arrival time '{0}'")]
    Arrival(String),
}

impl FromStr for RequestSpec {
    type Err = ParseRequestError;

    /// Parses `50` or `50@3.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('@') {
            None => s
                .parse::<i64>()
                .map(RequestSpec::Track)
                .map_err(|_| ParseRequestError::Track(s.to_string())),
            Some((track, arrival)) => {
                let track = track
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ParseRequestError::Track(track.to_string()))?;
                let arrival_time = arrival
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ParseRequestError::Arrival(arrival.to_string()))?;
                Ok(RequestSpec::Request {
                    track,
                    arrival_time,
                })
            }
        }
    }
}

/// Parses a comma or whitespace separated list of `TRACK[@ARRIVAL]` items.
pub fn parse_request_list(input: &str) -> Result<Vec<DiskRequest>, ParseRequestError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<RequestSpec>().map(DiskRequest::from))
        .collect()
}

// ============================================================================
// Scenario
// ============================================================================

/// Everything a calculator needs to run one simulation.
///
/// Each calculator reads only the fields relevant to its algorithm; SSTF,
/// for instance, ignores the geometry and the direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    pub initial_track: Track,
    pub requests: Vec<DiskRequest>,
    /// Upper domain bound; [`DEFAULT_MAX_TRACK`] when omitted.
    pub max_track: Option<Track>,
    pub min_track: Track,
    pub direction: Direction,
    pub time_per_track: f64,
    pub time_per_request: f64,
    pub n_step: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            initial_track: Track::ZERO,
            requests: Vec::new(),
            max_track: None,
            min_track: Track::new(DEFAULT_MIN_TRACK),
            direction: Direction::Asc,
            time_per_track: DEFAULT_TIME_PER_TRACK,
            time_per_request: 0.0,
            n_step: DEFAULT_N_STEP,
        }
    }
}

impl Scenario {
    pub fn new(initial_track: impl Into<Track>) -> Self {
        Self {
            initial_track: initial_track.into(),
            ..Self::default()
        }
    }

    /// Replaces the request list with bare tracks arriving at time 0.
    pub fn with_tracks(mut self, tracks: impl IntoIterator<Item = i64>) -> Self {
        self.requests = tracks.into_iter().map(DiskRequest::from).collect();
        self
    }

    pub fn with_requests(mut self, requests: impl IntoIterator<Item = DiskRequest>) -> Self {
        self.requests = requests.into_iter().collect();
        self
    }

    pub fn with_initial_track(mut self, track: impl Into<Track>) -> Self {
        self.initial_track = track.into();
        self
    }

    pub fn with_max_track(mut self, track: impl Into<Track>) -> Self {
        self.max_track = Some(track.into());
        self
    }

    pub fn with_min_track(mut self, track: impl Into<Track>) -> Self {
        self.min_track = track.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_time_per_track(mut self, time: f64) -> Self {
        self.time_per_track = time;
        self
    }

    pub fn with_time_per_request(mut self, time: f64) -> Self {
        self.time_per_request = time;
        self
    }

    pub fn with_n_step(mut self, n_step: usize) -> Self {
        self.n_step = n_step;
        self
    }

    /// Upper domain bound with the default applied.
    pub fn effective_max_track(&self) -> Track {
        self.max_track.unwrap_or(Track::new(DEFAULT_MAX_TRACK))
    }

    /// Returns true if every request lies inside `[min_track, max_track]`.
    pub fn requests_in_domain(&self) -> bool {
        let max = self.effective_max_track();
        self.requests
            .iter()
            .all(|r| r.track >= self.min_track && r.track <= max)
    }
}

// ============================================================================
// Trace
// ============================================================================

/// What a recorded head movement accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// The move ends by servicing a request (possibly without moving).
    Service,
    /// Non-service move to a physical edge of the domain.
    Edge,
    /// Non-service circular jump to the opposite edge.
    Wrap,
    /// Circular jump that lands on and services the far extreme request.
    WrapService,
}

impl StepKind {
    /// Returns true if this step serviced a request.
    pub fn is_service(self) -> bool {
        matches!(self, StepKind::Service | StepKind::WrapService)
    }

    /// Returns true for circular jumps.
    pub fn is_wrap(self) -> bool {
        matches!(self, StepKind::Wrap | StepKind::WrapService)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Service => "service",
            StepKind::Edge => "edge",
            StepKind::Wrap => "wrap",
            StepKind::WrapService => "wrap-service",
        }
    }
}

impl Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded head movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub from: Track,
    pub to: Track,
    pub distance: u64,
    /// Tracks in the active queue when the move began.
    pub remaining: Vec<Track>,
    /// Tracks held back for the next batch, for algorithms that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<Vec<Track>>,
    /// Simulated time at which the move began.
    pub instant: f64,
    /// Arrival time of the serviced request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_instant: Option<f64>,
    pub kind: StepKind,
}

/// Complete output of one calculator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    /// Tracks visited for service, in order.
    pub sequence: Vec<Track>,
    /// Sum of every step distance, edge and wrap moves included.
    pub total_tracks: u64,
    pub steps: Vec<Step>,
    /// Final simulated clock value.
    pub total_time: f64,
}

impl AlgorithmResult {
    /// Result of a run with no requests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Steps that serviced a request.
    pub fn service_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.kind.is_service())
    }

    /// Number of non-service moves (edge and wrap).
    pub fn overhead_moves(&self) -> usize {
        self.steps.iter().filter(|step| !step.kind.is_service()).count()
    }

    /// Mean seek distance per serviced request.
    pub fn average_seek(&self) -> f64 {
        if self.sequence.is_empty() {
            0.0
        } else {
            self.total_tracks as f64 / self.sequence.len() as f64
        }
    }
}
