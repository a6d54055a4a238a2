use anyhow::Result;

use crate::display_list::DisplayList;

/// Destination for finished frames. The raster backend lives outside this
/// workspace and attaches here; tests use [`RecordingSink`].
pub trait FrameSink {
    fn submit(&mut self, frame: DisplayList) -> Result<()>;
}

/// Keeps the most recent frames for inspection. Default sink for tests and
/// for embedders that drain frames themselves.
#[derive(Default)]
pub struct RecordingSink {
    frames: Vec<DisplayList>,
    /// Frames beyond this count are dropped oldest-first. 0 keeps only the last.
    pub keep: usize,
    submitted: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            keep: 1,
            submitted: 0,
        }
    }

    pub fn last_frame(&self) -> Option<&DisplayList> {
        self.frames.last()
    }

    pub fn take_frames(&mut self) -> Vec<DisplayList> {
        std::mem::take(&mut self.frames)
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }
}

impl FrameSink for RecordingSink {
    fn submit(&mut self, frame: DisplayList) -> Result<()> {
        self.submitted += 1;
        self.frames.push(frame);
        let keep = self.keep.max(1);
        while self.frames.len() > keep {
            self.frames.remove(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    #[test]
    fn recording_sink_keeps_bounded_history() {
        let mut sink = RecordingSink::new();
        sink.keep = 2;
        for i in 0..5u32 {
            let list = DisplayList {
                viewport: Viewport {
                    width: i,
                    height: i,
                },
                ..Default::default()
            };
            sink.submit(list).unwrap();
        }
        assert_eq!(sink.submitted(), 5);
        assert_eq!(sink.take_frames().len(), 2);
    }
}
