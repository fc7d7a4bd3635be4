//! The sweep state machine shared by every scheduling algorithm.
//!
//! One engine run is a loop over [`Phase`]:
//!
//! - `Idle`: admit arrived requests according to the [`Admission`] policy,
//!   then pick the next phase.
//! - `Waiting`: nothing is eligible; advance the clock to the next arrival
//!   (SCAN-N first finishes its sweep to the edge).
//! - `Sweeping`: perform exactly one action, either a service, an edge move,
//!   or a turnaround, then return to `Idle`.
//! - `Wrapping`: C-SCAN's non-servicing jump to the opposite edge.
//! - `Done`: every queue is empty.
//!
//! Every `Sweeping` action is followed by admission, so requests that arrive
//! mid-run become visible at the next decision point.

use headsweep_types::{AlgorithmResult, Direction, RequestId, Scenario, Step, StepKind, Track};
use tracing::{debug, trace};

use crate::intercept::{Interception, find_interception};
use crate::kernel::KernelError;
use crate::policy::{Admission, Bound, Policy, Selection, Turnaround};
use crate::queues::RequestQueues;

/// Engine loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Waiting,
    Sweeping,
    Wrapping,
    Done,
}

/// Where a serviced request is taken from.
#[derive(Debug, Clone, Copy)]
enum Source {
    Active(usize),
    Archive(RequestId),
}

/// A single simulation in progress.
#[derive(Debug)]
pub struct Engine {
    policy: Policy,
    queues: RequestQueues,
    head: Track,
    heading: Direction,
    clock: f64,
    min_track: Track,
    max_track: Track,
    time_per_track: f64,
    time_per_request: f64,
    wraps_without_service: u32,

    steps: Vec<Step>,
    sequence: Vec<Track>,
    total_tracks: u64,
}

impl Engine {
    /// Sets up a run of `scenario` under `policy`.
    ///
    /// Timing and arrival values are expected to be validated already.
    pub fn new(policy: Policy, scenario: &Scenario) -> Self {
        Self {
            policy,
            queues: RequestQueues::new(&scenario.requests),
            head: scenario.initial_track,
            heading: scenario.direction,
            clock: 0.0,
            min_track: scenario.min_track,
            max_track: scenario.effective_max_track(),
            time_per_track: scenario.time_per_track,
            time_per_request: scenario.time_per_request,
            wraps_without_service: 0,
            steps: Vec::with_capacity(scenario.requests.len()),
            sequence: Vec::with_capacity(scenario.requests.len()),
            total_tracks: 0,
        }
    }

    /// Runs the simulation until every request is serviced.
    pub fn run(mut self) -> Result<AlgorithmResult, KernelError> {
        let mut phase = Phase::Idle;
        loop {
            phase = match phase {
                Phase::Idle => self.admit(),
                Phase::Waiting => self.wait()?,
                Phase::Sweeping => self.sweep()?,
                Phase::Wrapping => self.wrap()?,
                Phase::Done => break,
            };
        }

        // Postcondition: every request serviced exactly once
        debug_assert!(self.queues.is_drained());
        debug_assert_eq!(self.sequence.len(), self.queues.request_count());
        // Postcondition: distance is conserved across steps
        debug_assert_eq!(
            self.total_tracks,
            self.steps.iter().map(|step| step.distance).sum::<u64>()
        );

        Ok(AlgorithmResult {
            sequence: self.sequence,
            total_tracks: self.total_tracks,
            steps: self.steps,
            total_time: self.clock,
        })
    }

    // ========================================================================
    // Phases
    // ========================================================================

    fn admit(&mut self) -> Phase {
        let now = self.clock;
        match self.policy.admission {
            Admission::Immediate => {
                self.queues.admit_arrived(now);
            }
            Admission::Batched { size } => {
                if self.queues.active().is_empty() {
                    let admitted = self.queues.admit_batch(now, size);
                    if admitted > 0 {
                        debug!(admitted, clock = now, "batch frozen");
                    }
                }
            }
            Admission::DoubleBuffered => {
                self.queues.buffer_arrived(now);
                if self.queues.active().is_empty() && !self.queues.buffer().is_empty() {
                    let promoted = self.queues.promote_buffer();
                    debug!(promoted, clock = now, "buffer promoted");
                }
            }
        }

        if !self.queues.active().is_empty() {
            Phase::Sweeping
        } else if self.queues.is_drained() {
            Phase::Done
        } else {
            Phase::Waiting
        }
    }

    fn wait(&mut self) -> Result<Phase, KernelError> {
        if self.policy.idle_sweep {
            self.finish_idle_sweep()?;
        }

        let Some(next) = self.queues.next_arrival() else {
            debug_assert!(self.queues.is_drained(), "waiting with nothing to wait for");
            return Ok(Phase::Done);
        };
        if next > self.clock {
            debug!(from = self.clock, until = next, "head idle until next arrival");
            self.clock = next;
        }
        Ok(Phase::Idle)
    }

    fn sweep(&mut self) -> Result<Phase, KernelError> {
        match self.policy.selection {
            Selection::Nearest => self.step_nearest(),
            Selection::Sweep { bound, turnaround } => self.step_sweep(bound, turnaround),
        }
    }

    fn wrap(&mut self) -> Result<Phase, KernelError> {
        // A second wrap with no service in between means nothing is reachable.
        if self.wraps_without_service > 0 {
            return Err(KernelError::UnreachableRequests {
                remaining: self.pending(),
            });
        }
        let opposite = self.edge(self.heading.reversed());
        self.record_move(opposite, StepKind::Wrap)?;
        self.wraps_without_service += 1;
        Ok(Phase::Idle)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    fn step_nearest(&mut self) -> Result<Phase, KernelError> {
        let Some(position) = self.queues.nearest_active(self.head) else {
            return Ok(Phase::Idle);
        };
        let target = self.queues.track(self.queues.active()[position]);
        let direction = Direction::of_move(self.head, target);
        let source = self
            .intercept(target, direction)
            .map_or(Source::Active(position), |hit| Source::Archive(hit.id));
        self.service(source, StepKind::Service)?;
        Ok(Phase::Idle)
    }

    fn step_sweep(&mut self, bound: Bound, turnaround: Turnaround) -> Result<Phase, KernelError> {
        // A request under the head is serviced before anything else.
        if let Some(position) = self.queues.active_at(self.head) {
            self.service(Source::Active(position), StepKind::Service)?;
            return Ok(Phase::Idle);
        }

        let (head, heading) = (self.head, self.heading);
        if let Some(position) = self
            .queues
            .nearest_active_where(head, |track| heading.is_ahead(head, track))
        {
            let target = self.queues.track(self.queues.active()[position]);
            let source = self
                .intercept(target, heading)
                .map_or(Source::Active(position), |hit| Source::Archive(hit.id));
            self.service(source, StepKind::Service)?;
            return Ok(Phase::Idle);
        }

        match (bound, turnaround) {
            (Bound::Edge, _) => {
                let edge = self.edge(heading);
                if head != edge {
                    if let Some(hit) = self.intercept(edge, heading) {
                        self.service(Source::Archive(hit.id), StepKind::Service)?;
                        return Ok(Phase::Idle);
                    }
                    self.record_move(edge, StepKind::Edge)?;
                }
                Ok(self.turn_around(turnaround))
            }
            (Bound::Request, Turnaround::Reverse) => Ok(self.turn_around(turnaround)),
            (Bound::Request, Turnaround::Wrap) => {
                let lowest = heading.is_ascending();
                if let Some(position) = self.queues.extreme_active(lowest) {
                    self.service(Source::Active(position), StepKind::WrapService)?;
                }
                Ok(Phase::Idle)
            }
        }
    }

    fn turn_around(&mut self, turnaround: Turnaround) -> Phase {
        match turnaround {
            Turnaround::Reverse => {
                self.heading = self.heading.reversed();
                debug!(head = %self.head, heading = %self.heading, clock = self.clock, "reversed");
                Phase::Idle
            }
            Turnaround::Wrap => Phase::Wrapping,
        }
    }

    /// Moves an idle head to the edge in its heading, then reverses.
    fn finish_idle_sweep(&mut self) -> Result<(), KernelError> {
        let edge = self.edge(self.heading);
        if self.head != edge {
            self.record_move(edge, StepKind::Edge)?;
        }
        self.heading = self.heading.reversed();
        Ok(())
    }

    fn intercept(&self, target: Track, direction: Direction) -> Option<Interception> {
        if !self.policy.intercept {
            return None;
        }
        let hit = find_interception(
            self.head,
            target,
            self.clock,
            self.time_per_track,
            self.queues.archive_requests(),
            direction,
        )?;
        debug!(
            planned = %target,
            intercepted = %hit.track,
            arrival = hit.arrival_time,
            clock = self.clock,
            "move intercepted"
        );
        Some(hit)
    }

    // ========================================================================
    // Recording
    // ========================================================================

    fn service(&mut self, source: Source, kind: StepKind) -> Result<(), KernelError> {
        let remaining = self.queues.active_tracks();
        let buffer = self.buffer_snapshot();

        let id = match source {
            Source::Active(position) => self.queues.take_active(position),
            Source::Archive(id) => {
                let taken = self.queues.take_archived(id);
                debug_assert_eq!(taken, Some(id), "intercepted request not in archive");
                id
            }
        };
        let request = *self.queues.request(id);

        let from = self.head;
        let to = request.track;
        let distance = from.distance_to(to);
        let instant = self.clock;

        self.add_distance(distance)?;
        self.clock += distance as f64 * self.time_per_track + self.time_per_request;
        self.head = to;
        self.sequence.push(to);
        self.wraps_without_service = 0;

        trace!(%from, %to, distance, instant, ?kind, request = %id, "serviced");
        self.steps.push(Step {
            from,
            to,
            distance,
            remaining,
            buffer,
            instant,
            arrival_instant: Some(request.arrival_time),
            kind,
        });
        Ok(())
    }

    fn record_move(&mut self, to: Track, kind: StepKind) -> Result<(), KernelError> {
        let from = self.head;
        let distance = from.distance_to(to);
        let instant = self.clock;

        self.add_distance(distance)?;
        self.clock += distance as f64 * self.time_per_track;
        self.head = to;

        trace!(%from, %to, distance, instant, ?kind, "moved");
        self.steps.push(Step {
            from,
            to,
            distance,
            remaining: self.queues.active_tracks(),
            buffer: self.buffer_snapshot_at(instant),
            instant,
            arrival_instant: None,
            kind,
        });
        Ok(())
    }

    fn add_distance(&mut self, distance: u64) -> Result<(), KernelError> {
        self.total_tracks = self
            .total_tracks
            .checked_add(distance)
            .ok_or(KernelError::DistanceOverflow {
                total: self.total_tracks,
                distance,
            })?;
        Ok(())
    }

    fn buffer_snapshot(&self) -> Option<Vec<Track>> {
        self.buffer_snapshot_at(self.clock)
    }

    fn buffer_snapshot_at(&self, now: f64) -> Option<Vec<Track>> {
        match self.policy.admission {
            Admission::Immediate => None,
            Admission::Batched { .. } => Some(self.queues.arrived_tracks(now)),
            Admission::DoubleBuffered => Some(self.queues.buffer_tracks()),
        }
    }

    fn edge(&self, direction: Direction) -> Track {
        match direction {
            Direction::Asc => self.max_track,
            Direction::Desc => self.min_track,
        }
    }

    fn pending(&self) -> usize {
        self.queues.archive().len() + self.queues.active().len() + self.queues.buffer().len()
    }
}
