use std::time::Duration;

use instant::Instant;

use crate::request::{RequestId, RequestKind};


pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);


#[derive(Clone, Debug)]
pub struct InFlightRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub deadline: Instant,
}

#[must_use]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ResponseDisposition {
    // Answers the request that is currently in flight.
    Current(RequestKind),

    // Answers the latest request, which has already been given up on (failed or timed out).
    // Nothing newer has been sent since, so the answer is still authoritative.
    Late(RequestKind),

    // Answers a request that has been superseded. Must be ignored.
    Stale,
}

// Keeps track of the single board update request that may be in flight.
//
// Request IDs grow monotonically. Only the latest request is ever relevant: anything else is
// stale by definition.
pub struct RequestMonitor {
    timeout: Duration,
    next_id: u64,
    latest: Option<(RequestId, RequestKind)>,
    in_flight: Option<InFlightRequest>,
}

impl RequestMonitor {
    pub fn new(timeout: Duration) -> Self {
        RequestMonitor {
            timeout,
            next_id: 1,
            latest: None,
            in_flight: None,
        }
    }

    pub fn in_flight(&self) -> Option<&InFlightRequest> { self.in_flight.as_ref() }

    // Returns `None` if another request is still in flight.
    pub fn start(&mut self, kind: RequestKind, now: Instant) -> Option<RequestId> {
        if self.in_flight.is_some() {
            return None;
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.latest = Some((id, kind.clone()));
        self.in_flight = Some(InFlightRequest { id, kind, deadline: now + self.timeout });
        Some(id)
    }

    pub fn finish(&mut self, id: RequestId) -> ResponseDisposition {
        // Each request is answered at most once: a duplicate answer is stale.
        if let Some(in_flight) = self.in_flight.take_if(|r| r.id == id) {
            self.latest = None;
            return ResponseDisposition::Current(in_flight.kind);
        }
        match self.latest.take_if(|(latest_id, _)| *latest_id == id) {
            Some((_, kind)) => ResponseDisposition::Late(kind),
            None => ResponseDisposition::Stale,
        }
    }

    // Gives up on the request if it is the one in flight.
    pub fn fail(&mut self, id: RequestId) -> Option<InFlightRequest> {
        self.in_flight.take_if(|r| r.id == id)
    }

    // Gives up on the request in flight if its deadline has passed.
    pub fn take_expired(&mut self, now: Instant) -> Option<InFlightRequest> {
        self.in_flight.take_if(|r| now >= r.deadline)
    }

    // Forget the latest request, so that a late answer to it is treated as stale. Used when the
    // game is over and nothing may change the board anymore.
    pub fn close(&mut self) {
        self.in_flight = None;
        self.latest = None;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn one_request_at_a_time() {
        let t0 = Instant::now();
        let mut monitor = RequestMonitor::new(TIMEOUT);
        let id = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(monitor.start(RequestKind::StatusPoll, t0).is_none());
        assert_eq!(monitor.finish(id), ResponseDisposition::Current(RequestKind::StatusPoll));
        let next_id = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(next_id > id);
        assert_eq!(monitor.finish(id), ResponseDisposition::Stale);
    }

    #[test]
    fn deadline() {
        let t0 = Instant::now();
        let mut monitor = RequestMonitor::new(TIMEOUT);
        let id = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(monitor.take_expired(t0 + Duration::from_secs(4)).is_none());
        assert_eq!(monitor.take_expired(t0 + TIMEOUT).map(|r| r.id), Some(id));
        assert!(monitor.in_flight().is_none());
    }

    #[test]
    fn late_answer_until_superseded() {
        let t0 = Instant::now();
        let mut monitor = RequestMonitor::new(TIMEOUT);
        let first = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(monitor.fail(first).is_some());
        assert!(monitor.fail(first).is_none());
        assert_eq!(monitor.finish(first), ResponseDisposition::Late(RequestKind::StatusPoll));
        assert_eq!(monitor.finish(first), ResponseDisposition::Stale);

        let first = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(monitor.fail(first).is_some());
        let second = monitor.start(RequestKind::StatusPoll, t0).unwrap();
        assert!(monitor.fail(second).is_some());
        assert_eq!(monitor.finish(first), ResponseDisposition::Stale);
        monitor.close();
        assert_eq!(monitor.finish(second), ResponseDisposition::Stale);
    }
}
