use tracing::warn;

use crate::config::CheckerConfig;
use crate::debounce::{ButtonDebouncer, ButtonInput};
use crate::descriptor::TestPlan;
use crate::engine::{GateTestEngine, IcTester};
use crate::pins::{PinIo, SpinDelay};
use crate::presenter::ResultPresenter;
use crate::scheduler::{TickSource, TimeSliceScheduler};
use crate::sequencer::{SequencerState, TestSequencer};

/// The whole tester: super-loop timing, the button and the control state
/// machine.
pub struct Checker<T, B, E, R> {
    scheduler: TimeSliceScheduler<T>,
    debouncer: ButtonDebouncer<B>,
    sequencer: TestSequencer<E, R>,
    period_ms: u32,
    overruns: u32,
}

impl<T, B, P, R> Checker<T, B, GateTestEngine<P, SpinDelay>, R>
where
    T: TickSource,
    B: ButtonInput,
    P: PinIo,
    R: ResultPresenter,
{
    /// A checker driving `pins` with the calibrated spin delay.
    pub fn on_socket(
        config: &CheckerConfig,
        plan: TestPlan,
        ticks: T,
        button: B,
        pins: P,
        presenter: R,
    ) -> Self {
        let engine = GateTestEngine::new(pins, SpinDelay::new(config.settle_cycles));
        Checker::new(config, ticks, button, TestSequencer::new(plan, engine, presenter))
    }
}

impl<T, B, E, R> Checker<T, B, E, R>
where
    T: TickSource,
    B: ButtonInput,
    E: IcTester,
    R: ResultPresenter,
{
    pub fn new(
        config: &CheckerConfig,
        ticks: T,
        button: B,
        sequencer: TestSequencer<E, R>,
    ) -> Self {
        Checker {
            scheduler: TimeSliceScheduler::new(ticks),
            debouncer: ButtonDebouncer::with_divider(button, config.sample_divider),
            sequencer,
            period_ms: config.period_ms,
            overruns: 0,
        }
    }

    /// Run one time slice: wait for the period boundary, sample the button,
    /// advance the sequencer by one step.
    ///
    /// Only the work after the release counts towards an overrun. Lateness
    /// of the wait itself is not an overrun.
    pub fn clock(&mut self) {
        self.scheduler.wait_next_period(self.period_ms);
        let start = self.scheduler.ticks().now_ms();

        self.debouncer.sample();
        self.sequencer.tick(&mut self.debouncer);

        let busy = self.scheduler.ticks().now_ms().wrapping_sub(start);
        if busy > self.period_ms {
            self.overruns += 1;
            warn!(busy, period = self.period_ms, "time slice overran");
        }
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.clock();
        }
    }

    /// Idle with no confirmed press waiting to start another cycle.
    pub fn is_idle(&self) -> bool {
        self.sequencer.state() == SequencerState::Idle && !self.debouncer.is_latched()
    }

    pub fn sequencer(&self) -> &TestSequencer<E, R> {
        &self.sequencer
    }

    pub fn debouncer(&self) -> &ButtonDebouncer<B> {
        &self.debouncer
    }

    /// Slices whose work took longer than the period.
    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}
