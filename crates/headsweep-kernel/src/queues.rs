//! Request storage for one simulation.
//!
//! Requests live in an arena indexed by [`RequestId`]. Every id sits in
//! exactly one of three queues at any instant:
//!
//! - **archive**: not yet admitted, ordered by arrival time (stable, so equal
//!   arrival times keep input order). Because of that ordering the requests
//!   that have arrived by a given instant always form a prefix.
//! - **active**: admitted and eligible for service, in admission order.
//! - **buffer**: arrived while a frozen batch was being drained.
//!
//! Once serviced an id leaves all queues for good.

use headsweep_types::{DiskRequest, RequestId, Track};

/// The arena plus the archive, active and buffer queues.
#[derive(Debug, Clone)]
pub struct RequestQueues {
    arena: Vec<DiskRequest>,
    archive: Vec<RequestId>,
    active: Vec<RequestId>,
    buffer: Vec<RequestId>,
}

impl RequestQueues {
    /// Builds the arena in input order and files every request in the archive.
    pub fn new(requests: &[DiskRequest]) -> Self {
        let arena = requests.to_vec();
        let mut archive: Vec<RequestId> = (0..arena.len()).map(RequestId::new).collect();
        // Stable: ties keep input order.
        archive.sort_by(|a, b| {
            arena[a.as_usize()]
                .arrival_time
                .total_cmp(&arena[b.as_usize()].arrival_time)
        });

        Self {
            arena,
            archive,
            active: Vec::new(),
            buffer: Vec::new(),
        }
    }

    pub fn request(&self, id: RequestId) -> &DiskRequest {
        &self.arena[id.as_usize()]
    }

    pub fn track(&self, id: RequestId) -> Track {
        self.request(id).track
    }

    pub fn arrival(&self, id: RequestId) -> f64 {
        self.request(id).arrival_time
    }

    /// Total number of requests in the simulation.
    pub fn request_count(&self) -> usize {
        self.arena.len()
    }

    // ========================================================================
    // Queue views
    // ========================================================================

    pub fn archive(&self) -> &[RequestId] {
        &self.archive
    }

    pub fn active(&self) -> &[RequestId] {
        &self.active
    }

    pub fn buffer(&self) -> &[RequestId] {
        &self.buffer
    }

    /// Archive entries paired with their requests, in arrival order.
    pub fn archive_requests(&self) -> impl Iterator<Item = (RequestId, &DiskRequest)> {
        self.archive.iter().map(|&id| (id, self.request(id)))
    }

    /// Number of archived requests that have arrived by `now`.
    pub fn arrived_len(&self, now: f64) -> usize {
        self.archive.partition_point(|&id| self.arrival(id) <= now)
    }

    /// Arrival time of the earliest archived request.
    pub fn next_arrival(&self) -> Option<f64> {
        self.archive.first().map(|&id| self.arrival(id))
    }

    /// True once every request has been serviced.
    pub fn is_drained(&self) -> bool {
        self.archive.is_empty() && self.active.is_empty() && self.buffer.is_empty()
    }

    pub fn active_tracks(&self) -> Vec<Track> {
        self.active.iter().map(|&id| self.track(id)).collect()
    }

    pub fn buffer_tracks(&self) -> Vec<Track> {
        self.buffer.iter().map(|&id| self.track(id)).collect()
    }

    /// Tracks of archived requests that have arrived by `now`.
    pub fn arrived_tracks(&self, now: f64) -> Vec<Track> {
        self.archive[..self.arrived_len(now)]
            .iter()
            .map(|&id| self.track(id))
            .collect()
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Moves every request that has arrived by `now` into the active queue.
    ///
    /// Returns the number of requests admitted.
    pub fn admit_arrived(&mut self, now: f64) -> usize {
        let count = self.arrived_len(now);
        self.active.extend(self.archive.drain(..count));
        count
    }

    /// Moves up to `limit` arrived requests into the active queue.
    pub fn admit_batch(&mut self, now: f64, limit: usize) -> usize {
        let count = self.arrived_len(now).min(limit);
        self.active.extend(self.archive.drain(..count));
        count
    }

    /// Moves every request that has arrived by `now` into the buffer.
    pub fn buffer_arrived(&mut self, now: f64) -> usize {
        let count = self.arrived_len(now);
        self.buffer.extend(self.archive.drain(..count));
        count
    }

    /// Promotes the whole buffer to be the new active batch.
    ///
    /// Only valid when the active queue is empty.
    pub fn promote_buffer(&mut self) -> usize {
        debug_assert!(
            self.active.is_empty(),
            "buffer promoted over a non-empty active batch"
        );
        std::mem::swap(&mut self.active, &mut self.buffer);
        self.active.len()
    }

    // ========================================================================
    // Service
    // ========================================================================

    /// Removes the active request at `position`.
    pub fn take_active(&mut self, position: usize) -> RequestId {
        self.active.remove(position)
    }

    /// Removes `id` from the archive if it is still there.
    pub fn take_archived(&mut self, id: RequestId) -> Option<RequestId> {
        let position = self.archive.iter().position(|&candidate| candidate == id)?;
        Some(self.archive.remove(position))
    }

    /// Position of the first active request at `track`.
    pub fn active_at(&self, track: Track) -> Option<usize> {
        self.active.iter().position(|&id| self.track(id) == track)
    }

    /// Position of the active request nearest to `head`; earliest admitted wins ties.
    pub fn nearest_active(&self, head: Track) -> Option<usize> {
        self.nearest_active_where(head, |_| true)
    }

    /// Position of the nearest active request satisfying `filter`.
    pub fn nearest_active_where(
        &self,
        head: Track,
        filter: impl Fn(Track) -> bool,
    ) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (position, &id) in self.active.iter().enumerate() {
            let track = self.track(id);
            if !filter(track) {
                continue;
            }
            let distance = head.distance_to(track);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((position, distance));
            }
        }
        best.map(|(position, _)| position)
    }

    /// Position of the lowest (or highest) active track; earliest admitted wins ties.
    pub fn extreme_active(&self, lowest: bool) -> Option<usize> {
        let mut best: Option<(usize, Track)> = None;
        for (position, &id) in self.active.iter().enumerate() {
            let track = self.track(id);
            let better = match best {
                None => true,
                Some((_, current)) if lowest => track < current,
                Some((_, current)) => track > current,
            };
            if better {
                best = Some((position, track));
            }
        }
        best.map(|(position, _)| position)
    }
}
