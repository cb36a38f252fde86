use std::fmt;

use tracing::{debug, info};

use crate::debounce::PressLatch;
use crate::descriptor::TestPlan;
use crate::engine::IcTester;
use crate::presenter::{Indication, ResultPresenter};

/// One bit per plan entry, set when that part passed this cycle.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ResultAccumulator(u32);

impl ResultAccumulator {
    pub const fn new() -> Self {
        ResultAccumulator(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        ResultAccumulator(bits)
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Indices past the field width are ignored.
    #[inline]
    pub fn set(&mut self, index: usize) {
        if index < u32::BITS as usize {
            self.0 |= 1 << index;
        }
    }

    #[inline]
    pub fn is_set(self, index: usize) -> bool {
        index < u32::BITS as usize && self.0 & (1 << index) != 0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The index of the only set bit, if exactly one is set.
    pub fn single(self) -> Option<usize> {
        if self.0 != 0 && self.0 & (self.0 - 1) == 0 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Keep only the low `len` bits.
    pub fn masked(self, len: usize) -> Self {
        match len {
            0 => ResultAccumulator(0),
            n if n >= u32::BITS as usize => self,
            n => ResultAccumulator(self.0 & ((1 << n) - 1)),
        }
    }

    /// Read the field and reset it in one step.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn passed(self) -> impl Iterator<Item = usize> {
        (0..u32::BITS as usize).filter(move |&i| self.is_set(i))
    }
}

impl fmt::Debug for ResultAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultAccumulator({:#b})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    Testing(usize),
    Presenting,
}

/// The control state machine. Each [`tick`](TestSequencer::tick) does one
/// step: wait for a press, test one part, or present the cycle result.
///
/// Testing one part per tick bounds the work in a single period to the
/// slowest part in the plan, which has to fit inside the period.
pub struct TestSequencer<E, R> {
    plan: TestPlan,
    engine: E,
    presenter: R,
    state: SequencerState,
    results: ResultAccumulator,
}

impl<E: IcTester, R: ResultPresenter> TestSequencer<E, R> {
    pub fn new(plan: TestPlan, engine: E, presenter: R) -> Self {
        TestSequencer {
            plan,
            engine,
            presenter,
            state: SequencerState::Idle,
            results: ResultAccumulator::new(),
        }
    }

    pub fn tick(&mut self, presses: &mut impl PressLatch) {
        use SequencerState::*;
        self.state = match self.state {
            Idle => {
                if presses.consume_pressed() {
                    self.results = ResultAccumulator::new();
                    info!(parts = self.plan.len(), "test cycle started");
                    self.presenter.cycle_started();
                    Testing(0)
                } else {
                    self.presenter.idle();
                    Idle
                }
            }
            Testing(index) => {
                let ic = &self.plan[index];
                let verdict = self.engine.test_ic(ic);
                debug!(index, designator = %ic.designator(), ?verdict, "part tested");
                if verdict.is_pass() {
                    self.results.set(index);
                }
                if index + 1 < self.plan.len() {
                    Testing(index + 1)
                } else {
                    Presenting
                }
            }
            Presenting => {
                let results = self.results.take();
                info!(
                    ?results,
                    indication = %Indication::classify(results, &self.plan),
                    "test cycle finished"
                );
                self.presenter.present(results, &self.plan);
                Idle
            }
        };
    }

    #[inline]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn plan(&self) -> &TestPlan {
        &self.plan
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn presenter(&self) -> &R {
        &self.presenter
    }
}
