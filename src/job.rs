//! The render-everything job.
//!
//! At most one job runs at a time. The run flag is claimed atomically so two
//! callers racing to start can't both win. Progress lives behind a mutex and
//! is always left consistent, so a poisoned lock is simply recovered.

use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::{
		atomic::{AtomicBool, Ordering},
		Mutex, MutexGuard, PoisonError,
	},
	thread,
};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::{MapError, MapResult};

/// Snapshot of the job's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
	pub running: bool,
	pub total: usize,
	pub done: usize,
	pub started_at: Option<DateTime<Utc>>,
	pub finished_at: Option<DateTime<Utc>>,
	/// The first failure of the run, if any.
	pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct MapJob {
	running: AtomicBool,
	status: Mutex<JobStatus>,
}

impl MapJob {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, JobStatus> {
		self.status.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn status(&self) -> JobStatus {
		self.lock().clone()
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::Acquire)
	}

	/// Claims the job for a run over `total` units.
	/// Returns false, changing nothing, if a run is already in progress.
	pub fn try_start(&self, total: usize) -> bool {
		if self.running.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return false;
		}
		*self.lock() = JobStatus {
			running: true,
			total,
			done: 0,
			started_at: Some(Utc::now()),
			finished_at: None,
			error: None,
		};
		info!("Map job started with {total} region files");
		true
	}

	/// Counts one unit as processed. A failed unit still counts.
	pub fn record(&self, result: MapResult<()>) {
		let mut status = self.lock();
		status.done += 1;
		if let Err(err) = result {
			warn!("Map job: {err}");
			status.error.get_or_insert_with(|| err.to_string());
		}
	}

	/// Records a failure that isn't tied to a unit, such as not being able to
	/// list the work. `done` is left alone.
	pub fn fail(&self, err: MapError) {
		warn!("Map job: {err}");
		self.lock().error.get_or_insert_with(|| err.to_string());
	}

	/// Ends the run and releases the flag.
	pub fn finish(&self) {
		{
			let mut status = self.lock();
			status.running = false;
			status.finished_at = Some(Utc::now());
			info!("Map job finished: {}/{} region files", status.done, status.total);
		}
		self.running.store(false, Ordering::Release);
	}

	/// Runs `work` over every item of a claimed job, one at a time, yielding
	/// to other threads between items. A unit that panics counts as failed.
	/// The job is finished even if iterating `items` itself panics.
	pub fn run<T, I, F>(&self, items: I, mut work: F)
	where
	I: IntoIterator<Item = T>,
	F: FnMut(T) -> MapResult<()> {
		let _finish = FinishOnDrop(self);
		for item in items {
			let result = panic::catch_unwind(AssertUnwindSafe(|| work(item)))
				.unwrap_or_else(|payload| MapError::custom(format!("panicked: {}", panic_message(&*payload))));
			self.record(result);
			thread::yield_now();
		}
	}
}

struct FinishOnDrop<'a>(&'a MapJob);

impl Drop for FinishOnDrop<'_> {
	fn drop(&mut self) {
		self.0.finish();
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(msg) = payload.downcast_ref::<&str>() {
		msg
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.as_str()
	} else {
		"unknown cause"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	#[test]
	fn only_one_run_at_a_time() {
		let job = MapJob::new();
		assert_eq!(job.status(), JobStatus::default());
		assert!(job.try_start(3));
		assert!(!job.try_start(10));
		assert_eq!(job.status().total, 3);
		assert!(job.status().running);
		job.finish();
		assert!(!job.is_running());
		assert!(job.try_start(1));
		let status = job.status();
		assert_eq!(status.done, 0);
		assert!(status.finished_at.is_none());
	}

	#[test]
	fn first_error_kept_and_run_continues() {
		let job = MapJob::new();
		assert!(job.try_start(4));
		let mut seen = Vec::new();
		job.run(0..4, |i| {
			seen.push(i);
			match i {
				1 => MapError::custom("first"),
				2 => MapError::custom("second"),
				_ => Ok(()),
			}
		});
		assert_eq!(seen, vec![0, 1, 2, 3]);
		let status = job.status();
		assert!(!status.running);
		assert_eq!(status.done, 4);
		assert_eq!(status.error.as_deref(), Some("first"));
		assert!(status.finished_at.unwrap() >= status.started_at.unwrap());
	}

	#[test]
	fn panicking_unit_still_finishes() {
		let job = MapJob::new();
		assert!(job.try_start(3));
		job.run(0..3, |i| {
			if i == 1 {
				panic!("section {i} is broken");
			}
			Ok(())
		});
		let status = job.status();
		assert!(!status.running);
		assert!(status.finished_at.is_some());
		assert_eq!(status.done, 3);
		assert_eq!(status.error.as_deref(), Some("panicked: section 1 is broken"));
		assert!(job.try_start(1));
	}

	#[test]
	fn failing_iterator_still_finishes() {
		let job = Arc::new(MapJob::new());
		assert!(job.try_start(2));
		let worker = Arc::clone(&job);
		let joined = thread::spawn(move || {
			let items = (0..2).map(|i| if i == 1 { panic!("listing broke") } else { i });
			worker.run(items, |_| Ok(()));
		}).join();
		assert!(joined.is_err());
		let status = job.status();
		assert!(!status.running);
		assert_eq!(status.done, 1);
		assert!(job.try_start(1));
	}

	#[test]
	fn fail_does_not_count_a_unit() {
		let job = MapJob::new();
		assert!(job.try_start(0));
		job.fail(MapError::Custom("no region directory".into()));
		job.fail(MapError::Custom("later".into()));
		job.finish();
		let status = job.status();
		assert_eq!((status.done, status.total), (0, 0));
		assert_eq!(status.error.as_deref(), Some("no region directory"));
	}

	#[test]
	fn racing_starts_have_one_winner() {
		let job = Arc::new(MapJob::new());
		let winners: usize = (0..8)
			.map(|_| {
				let job = Arc::clone(&job);
				thread::spawn(move || job.try_start(1) as usize)
			})
			.collect::<Vec<_>>()
			.into_iter()
			.map(|handle| handle.join().unwrap())
			.sum();
		assert_eq!(winners, 1);
	}

	#[test]
	fn status_serializes_camel_case() {
		let json = serde_json::to_value(JobStatus::default()).unwrap();
		assert_eq!(json["running"], false);
		assert!(json.get("finishedAt").is_some());
	}
}
