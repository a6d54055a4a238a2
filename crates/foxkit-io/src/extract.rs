//! Media-extraction worker seam.
//!
//! The actual extractor (network calls, download tooling) lives outside the
//! framework. Scenes submit an [`ExtractionRequest`] and poll the resulting
//! [`ExtractionJob`] once per frame; the worker feeds a bounded channel and
//! is never waited on from the frame loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// Progress events are dropped when the frame loop falls behind; terminal
/// events always arrive.
const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractFormat {
    #[default]
    Mp3,
    Mp4,
}

impl ExtractFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractFormat::Mp3 => "MP3",
            ExtractFormat::Mp4 => "MP4",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExtractionRequest {
    pub source_url: String,
    pub output_dir: PathBuf,
    pub format: ExtractFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExtractionEvent {
    /// Fraction complete in `[0, 1]`.
    Progress(f32),
    Done(PathBuf),
    Failed(String),
}

/// Worker side of a job: emit events, observe cancellation.
pub struct JobFeed {
    events: Sender<ExtractionEvent>,
    cancelled: Arc<AtomicBool>,
}

impl JobFeed {
    /// Report progress. Lossy: a full queue drops the update rather than
    /// blocking the worker.
    pub fn progress(&self, fraction: f32) {
        let event = ExtractionEvent::Progress(fraction.clamp(0.0, 1.0));
        if let Err(TrySendError::Disconnected(_)) = self.events.try_send(event) {
            log::debug!("extraction consumer gone; progress dropped");
        }
    }

    /// Terminal events block until delivered (the consumer polls every frame).
    pub fn done(&self, path: PathBuf) {
        let _ = self.events.send(ExtractionEvent::Done(path));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        let _ = self.events.send(ExtractionEvent::Failed(reason.into()));
    }

    /// Workers should check this between units of work and stop early.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Scene side of a job: poll events, request cancellation.
pub struct ExtractionJob {
    events: Receiver<ExtractionEvent>,
    cancelled: Arc<AtomicBool>,
    finished: bool,
}

impl ExtractionJob {
    /// Drain all pending events without blocking. Called once per frame.
    /// After cancellation nothing further is yielded.
    pub fn poll(&mut self) -> Vec<ExtractionEvent> {
        if self.finished || self.cancelled.load(Ordering::Relaxed) {
            // Drain and discard whatever the worker still produced.
            while self.events.try_recv().is_ok() {}
            return Vec::new();
        }
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if matches!(
                event,
                ExtractionEvent::Done(_) | ExtractionEvent::Failed(_)
            ) {
                self.finished = true;
                out.push(event);
                break;
            }
            out.push(event);
        }
        out
    }

    /// Best-effort: the worker may run on for a while, but no further
    /// events for this job are observed after this call.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// True once a terminal event has been observed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Producers of extraction jobs.
pub trait Extractor {
    fn spawn(&self, request: ExtractionRequest) -> ExtractionJob;
}

/// Runs a caller-supplied job function on a worker thread. The function
/// receives the request and a [`JobFeed`] and is expected to emit exactly
/// one terminal event.
pub struct ThreadExtractor {
    job: Arc<dyn Fn(ExtractionRequest, JobFeed) + Send + Sync>,
}

impl ThreadExtractor {
    pub fn new(job: impl Fn(ExtractionRequest, JobFeed) + Send + Sync + 'static) -> Self {
        Self { job: Arc::new(job) }
    }
}

impl Extractor for ThreadExtractor {
    fn spawn(&self, request: ExtractionRequest) -> ExtractionJob {
        let (tx, rx) = bounded(EVENT_QUEUE_CAPACITY);
        let cancelled = Arc::new(AtomicBool::new(false));
        let feed = JobFeed {
            events: tx.clone(),
            cancelled: cancelled.clone(),
        };
        let job = self.job.clone();
        let url = request.source_url.clone();
        let spawned = thread::Builder::new()
            .name("foxkit-extract".to_string())
            .spawn(move || {
                log::info!("extraction worker started for {url}");
                job(request, feed);
            });
        if let Err(err) = spawned {
            // Surfaced like any other job failure so the scene can present it.
            log::error!("failed to spawn extraction worker: {err}");
            let _ = tx.try_send(ExtractionEvent::Failed(format!(
                "could not start extraction worker: {err}"
            )));
        }

        ExtractionJob {
            events: rx,
            cancelled,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for<T>(job: &mut ExtractionJob, mut pick: impl FnMut(&ExtractionEvent) -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            for event in job.poll() {
                if let Some(v) = pick(&event) {
                    return v;
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for event");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn job_emits_progress_then_done() {
        let extractor = ThreadExtractor::new(|req, feed| {
            for i in 0..4 {
                feed.progress(i as f32 / 4.0);
            }
            feed.done(req.output_dir.join("track.mp3"));
        });
        let mut job = extractor.spawn(ExtractionRequest {
            source_url: "https://example.com/v".to_string(),
            output_dir: PathBuf::from("out"),
            format: ExtractFormat::Mp3,
        });

        let path = wait_for(&mut job, |e| match e {
            ExtractionEvent::Done(p) => Some(p.clone()),
            _ => None,
        });
        assert_eq!(path, PathBuf::from("out/track.mp3"));
        assert!(job.is_finished());
        assert!(job.poll().is_empty());
    }

    #[test]
    fn failure_is_data_not_panic() {
        let extractor = ThreadExtractor::new(|_, feed| feed.failed("no such video"));
        let mut job = extractor.spawn(ExtractionRequest {
            source_url: "bad".to_string(),
            output_dir: PathBuf::from("out"),
            format: ExtractFormat::Mp4,
        });
        let reason = wait_for(&mut job, |e| match e {
            ExtractionEvent::Failed(r) => Some(r.clone()),
            _ => None,
        });
        assert_eq!(reason, "no such video");
    }

    #[test]
    fn cancel_stops_event_consumption() {
        let extractor = ThreadExtractor::new(|_, feed| {
            while !feed.is_cancelled() {
                feed.progress(0.5);
                thread::sleep(Duration::from_millis(1));
            }
        });
        let mut job = extractor.spawn(ExtractionRequest {
            source_url: "loop".to_string(),
            output_dir: PathBuf::from("out"),
            format: ExtractFormat::Mp3,
        });
        wait_for(&mut job, |e| match e {
            ExtractionEvent::Progress(_) => Some(()),
            _ => None,
        });
        job.cancel();
        assert!(job.poll().is_empty());
        assert!(job.poll().is_empty());
    }

    #[test]
    fn progress_values_are_clamped() {
        let extractor = ThreadExtractor::new(|_, feed| {
            feed.progress(7.0);
            feed.done(PathBuf::from("x"));
        });
        let mut job = extractor.spawn(ExtractionRequest {
            source_url: "clamp".to_string(),
            output_dir: PathBuf::from("out"),
            format: ExtractFormat::Mp3,
        });
        let p = wait_for(&mut job, |e| match e {
            ExtractionEvent::Progress(p) => Some(*p),
            _ => None,
        });
        assert_eq!(p, 1.0);
    }
}
