//! Scene lifecycle and a fixed-step headless frame loop.

use orrery_graphics::DummyContext;

use crate::error::DemoError;

/// A demo scene driven one frame at a time.
///
/// `start` is called once before the first frame and `end` once after the
/// last, even when a frame fails.
pub trait Scene {
    /// Scene name, used in logs.
    fn name(&self) -> &str;

    /// Called once before the first frame.
    fn start(&mut self) -> Result<(), DemoError> {
        Ok(())
    }

    /// Draw one frame. `delta` is the simulated time since the last frame.
    fn draw(&mut self, delta: f32) -> Result<(), DemoError>;

    /// Called once after the last frame. Releases GPU resources.
    fn end(&mut self) -> Result<(), DemoError> {
        Ok(())
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub frames_drawn: u64,
    pub elapsed: f32,
}

/// Runs a scene for a fixed number of frames with a constant time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLoop {
    pub frames: u64,
    pub time_step: f32,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self {
            frames: 60,
            time_step: 16.0,
        }
    }
}

impl FrameLoop {
    /// Run `frames` frames, advancing `time_step` milliseconds each.
    pub fn new(frames: u64, time_step: f32) -> Self {
        Self { frames, time_step }
    }

    /// Run `scene` from `start` to `end`.
    pub fn run<S: Scene>(&self, scene: &mut S) -> Result<FrameReport, DemoError> {
        self.run_with(scene, |_, _| Ok(()))
    }

    /// Run `scene`, calling `between` with the frame index before each frame.
    ///
    /// The first error from `between` or `draw` stops the loop. `end` still
    /// runs; its own error is reported only when the frames succeeded.
    pub fn run_with<S, F>(&self, scene: &mut S, mut between: F) -> Result<FrameReport, DemoError>
    where
        S: Scene,
        F: FnMut(&mut S, u64) -> Result<(), DemoError>,
    {
        log::info!(
            "Starting scene `{}` for {} frame(s), step {}",
            scene.name(),
            self.frames,
            self.time_step
        );
        scene.start()?;

        let mut report = FrameReport::default();
        let mut outcome = Ok(());
        for frame in 0..self.frames {
            outcome = between(scene, frame).and_then(|()| scene.draw(self.time_step));
            if outcome.is_err() {
                break;
            }
            report.frames_drawn += 1;
            report.elapsed += self.time_step;
        }

        let ended = scene.end();
        if let Err(err) = &outcome {
            log::error!("Scene `{}` failed after {} frame(s): {}", scene.name(), report.frames_drawn, err);
        }
        outcome?;
        ended?;

        log::info!(
            "Scene `{}` finished: {} frame(s), {} time units",
            scene.name(),
            report.frames_drawn,
            report.elapsed
        );
        Ok(report)
    }
}

/// Running counts of what a [`DummyContext`] recorded.
///
/// Draining once per frame keeps the context's log to a single frame over
/// long runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogTotals {
    pub calls: usize,
    pub draws: usize,
}

impl LogTotals {
    /// Add the context's log to the totals and clear it.
    pub fn drain(&mut self, context: &mut DummyContext) {
        self.calls += context.calls().len();
        self.draws += context.draws().len();
        context.clear_log();
    }
}
