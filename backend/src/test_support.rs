//! Test utilities shared by unit tests and the `tests/` suites.
//!
//! Compiled for `cfg(test)` and the `test-support` feature only.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{LinkHandle, LinkId, Platform, SubmittedLink};

/// Clock whose time only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Build a submitted link from its wire id, panicking on invalid input.
pub fn submitted_link(wire_id: i64, platform: Platform, handle: &str) -> SubmittedLink {
    let id = match LinkId::from_wire(wire_id) {
        Ok(id) => id,
        Err(error) => panic!("invalid fixture id {wire_id}: {error}"),
    };
    let handle = match LinkHandle::new(handle) {
        Ok(handle) => handle,
        Err(error) => panic!("invalid fixture handle {handle:?}: {error}"),
    };
    SubmittedLink {
        id,
        platform,
        handle,
    }
}
