//! Turning a cycle result into something the operator can see.
//!
//! Two indicator boards exist: a bicolor LED and a character LCD. Both reset
//! themselves after a fixed number of idle ticks.

use bitflags::bitflags;
use std::fmt;

use crate::descriptor::TestPlan;
use crate::designator::Designator;
use crate::sequencer::ResultAccumulator;

pub trait ResultPresenter {
    fn cycle_started(&mut self);
    fn present(&mut self, results: ResultAccumulator, plan: &TestPlan);
    /// Called on every tick the sequencer spends idle.
    fn idle(&mut self) {}
}

impl<T: ResultPresenter + ?Sized> ResultPresenter for &mut T {
    fn cycle_started(&mut self) {
        (**self).cycle_started()
    }

    fn present(&mut self, results: ResultAccumulator, plan: &TestPlan) {
        (**self).present(results, plan)
    }

    fn idle(&mut self) {
        (**self).idle()
    }
}

/// What a finished cycle means for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    /// No part in the plan passed.
    Fail,
    Pass(Designator),
    /// More than one part passed. Points at a plan or oracle defect, never
    /// reported as a pass.
    MultiPass(u32),
}

impl Indication {
    pub fn classify(results: ResultAccumulator, plan: &TestPlan) -> Self {
        let results = results.masked(plan.len());
        match results.count() {
            0 => Indication::Fail,
            1 => match results.single().and_then(|i| plan.get(i)) {
                Some(ic) => Indication::Pass(ic.designator()),
                None => Indication::Fail,
            },
            n => Indication::MultiPass(n),
        }
    }
}

impl fmt::Display for Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indication::Fail => f.write_str(FAIL_PROMPT),
            Indication::Pass(designator) => write!(f, "{} Passed", designator),
            Indication::MultiPass(_) => f.write_str(MULTIPASS_PROMPT),
        }
    }
}

/// Counts idle ticks down to an indicator reset.
#[derive(Debug, Clone, Copy)]
struct Timeout {
    ticks: u32,
    remaining: Option<u32>,
}

impl Timeout {
    fn new(ticks: u32) -> Self {
        Timeout {
            ticks,
            remaining: None,
        }
    }

    fn arm(&mut self) {
        self.remaining = Some(self.ticks);
    }

    fn disarm(&mut self) {
        self.remaining = None;
    }

    /// True on the tick the timeout expires.
    fn tick(&mut self) -> bool {
        match self.remaining {
            Some(0) | Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

bitflags! {
    /// Driver lines of the bicolor LED. Both lines on shows orange.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LedColor: u8 {
        const RED = 0b01;
        const GREEN = 0b10;
        const ORANGE = Self::RED.bits() | Self::GREEN.bits();
    }
}

pub trait BicolorLed {
    /// An empty color switches both drivers off.
    fn set(&mut self, color: LedColor);
}

impl<T: BicolorLed + ?Sized> BicolorLed for &mut T {
    fn set(&mut self, color: LedColor) {
        (**self).set(color)
    }
}

/// Red for fail, green for a single pass, orange for multi-pass.
pub struct LedPresenter<L> {
    led: L,
    timeout: Timeout,
}

impl<L: BicolorLed> LedPresenter<L> {
    pub fn new(mut led: L, timeout_ticks: u32) -> Self {
        led.set(LedColor::empty());
        LedPresenter {
            led,
            timeout: Timeout::new(timeout_ticks),
        }
    }

    pub fn color_for(indication: Indication) -> LedColor {
        match indication {
            Indication::Fail => LedColor::RED,
            Indication::Pass(_) => LedColor::GREEN,
            Indication::MultiPass(_) => LedColor::ORANGE,
        }
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}

impl<L: BicolorLed> ResultPresenter for LedPresenter<L> {
    fn cycle_started(&mut self) {
        self.timeout.disarm();
        self.led.set(LedColor::empty());
    }

    fn present(&mut self, results: ResultAccumulator, plan: &TestPlan) {
        let color = Self::color_for(Indication::classify(results, plan));
        self.led.set(color);
        self.timeout.arm();
    }

    fn idle(&mut self) {
        if self.timeout.tick() {
            self.led.set(LedColor::empty());
        }
    }
}

pub const READY_PROMPT: &str = "Ready...";
pub const TESTING_PROMPT: &str = "Testing...";
pub const FAIL_PROMPT: &str = "Test Fail";
pub const MULTIPASS_PROMPT: &str = "Multipass Error";

/// A character display with 1-based cursor coordinates.
pub trait TextDisplay {
    fn clear(&mut self);
    fn move_cursor(&mut self, column: u8, row: u8);
    fn write_str(&mut self, text: &str);
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn move_cursor(&mut self, column: u8, row: u8) {
        (**self).move_cursor(column, row)
    }

    fn write_str(&mut self, text: &str) {
        (**self).write_str(text)
    }
}

/// Prompts on the first line of a character LCD, falling back to the ready
/// prompt once the timeout runs out.
pub struct LcdPresenter<D> {
    display: D,
    timeout: Timeout,
}

impl<D: TextDisplay> LcdPresenter<D> {
    pub fn new(display: D, timeout_ticks: u32) -> Self {
        let mut presenter = LcdPresenter {
            display,
            timeout: Timeout::new(timeout_ticks),
        };
        presenter.show(READY_PROMPT);
        presenter
    }

    fn show(&mut self, text: &str) {
        self.display.clear();
        self.display.move_cursor(1, 1);
        self.display.write_str(text);
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D: TextDisplay> ResultPresenter for LcdPresenter<D> {
    fn cycle_started(&mut self) {
        self.show(TESTING_PROMPT);
        self.timeout.arm();
    }

    fn present(&mut self, results: ResultAccumulator, plan: &TestPlan) {
        let text = Indication::classify(results, plan).to_string();
        self.show(&text);
        self.timeout.arm();
    }

    fn idle(&mut self) {
        if self.timeout.tick() {
            self.show(READY_PROMPT);
        }
    }
}
