//! Look-ahead interception.
//!
//! While the head travels from `from` to `to`, a request that has not been
//! admitted yet may arrive and sit on a track the head is about to cross.
//! If the head would reach that track no earlier than the request's arrival
//! time, the move is cut short and the request is serviced instead.

use headsweep_types::{DiskRequest, Direction, RequestId, Track};

/// A request picked up on the way to a planned target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception {
    pub id: RequestId,
    pub track: Track,
    pub arrival_time: f64,
}

/// Finds the request that should cut a planned move short.
///
/// A candidate qualifies when its track lies strictly between `from` and
/// `to` in `direction` and it has arrived by the time the head gets there,
/// that is `arrival <= now + |track - from| * time_per_track`. The qualifying
/// request closest to `from` wins; on ties the earlier one in `pool` order
/// wins.
///
/// Pure: nothing is removed from `pool`. The caller dequeues the returned id.
pub fn find_interception<'a>(
    from: Track,
    to: Track,
    now: f64,
    time_per_track: f64,
    pool: impl IntoIterator<Item = (RequestId, &'a DiskRequest)>,
    direction: Direction,
) -> Option<Interception> {
    let between = |track: Track| match direction {
        Direction::Asc => from < track && track < to,
        Direction::Desc => to < track && track < from,
    };

    let mut best: Option<(u64, Interception)> = None;
    for (id, request) in pool {
        if !between(request.track) {
            continue;
        }
        let distance = from.distance_to(request.track);
        let reached_at = now + distance as f64 * time_per_track;
        if request.arrival_time > reached_at {
            continue;
        }
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((
                distance,
                Interception {
                    id,
                    track: request.track,
                    arrival_time: request.arrival_time,
                },
            ));
        }
    }

    best.map(|(_, interception)| interception)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pool(requests: &[(i64, f64)]) -> Vec<DiskRequest> {
        requests.iter().copied().map(DiskRequest::from).collect()
    }

    fn ids(requests: &[DiskRequest]) -> impl Iterator<Item = (RequestId, &DiskRequest)> {
        requests
            .iter()
            .enumerate()
            .map(|(i, r)| (RequestId::new(i), r))
    }

    #[test]
    fn picks_the_closest_request_that_has_arrived_in_time() {
        let requests = pool(&[(3, 2.0), (14, 3.0), (12, 6.0), (9, 7.0)]);
        let hit = find_interception(
            Track::new(10),
            Track::new(19),
            1.0,
            5.0,
            ids(&requests),
            Direction::Asc,
        )
        .unwrap();
        assert_eq!(hit.track, Track::new(12));
        assert_eq!(hit.id, RequestId::new(2));
    }

    #[test]
    fn skips_requests_that_arrive_after_the_head_passes() {
        let requests = pool(&[(12, 50.0)]);
        let hit = find_interception(
            Track::new(10),
            Track::new(19),
            1.0,
            5.0,
            ids(&requests),
            Direction::Asc,
        );
        assert!(hit.is_none());
    }

    #[test_case(10; "at the origin")]
    #[test_case(19; "at the target")]
    #[test_case(25; "beyond the target")]
    #[test_case(5; "behind the head")]
    fn endpoints_and_outside_tracks_never_qualify(track: i64) {
        let requests = pool(&[(track, 0.0)]);
        let hit = find_interception(
            Track::new(10),
            Track::new(19),
            0.0,
            1.0,
            ids(&requests),
            Direction::Asc,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn descending_moves_scan_downwards() {
        let requests = pool(&[(40, 1.0), (45, 1.0), (60, 0.0)]);
        let hit = find_interception(
            Track::new(50),
            Track::new(20),
            0.0,
            1.0,
            ids(&requests),
            Direction::Desc,
        )
        .unwrap();
        assert_eq!(hit.track, Track::new(45));
    }

    #[test]
    fn ties_keep_pool_order() {
        let requests = pool(&[(15, 1.0), (15, 0.5)]);
        let hit = find_interception(
            Track::new(10),
            Track::new(20),
            0.0,
            1.0,
            ids(&requests),
            Direction::Asc,
        )
        .unwrap();
        assert_eq!(hit.id, RequestId::new(0));
    }
}
