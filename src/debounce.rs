//! Operator button debouncing.
//!
//! The raw level is read on every tick but the state machine only advances
//! on every `divider`-th call. A press has to be seen on two consecutive
//! evaluations (edge, then verify) before the latch is set on the third, so
//! the confirmation latency is `divider * CONFIRM_SAMPLES` ticks.

use crate::config::BUTTON_SAMPLE_DIVIDER;

/// Consecutive asserted evaluations needed before a press is latched.
pub const CONFIRM_SAMPLES: u32 = 2;

/// Raw level of the operator button.
pub trait ButtonInput {
    fn is_asserted(&mut self) -> bool;
}

impl<T: ButtonInput + ?Sized> ButtonInput for &mut T {
    fn is_asserted(&mut self) -> bool {
        (**self).is_asserted()
    }
}

/// Source of single-shot press events.
pub trait PressLatch {
    /// Returns true once per confirmed press, clearing it.
    fn consume_pressed(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    #[default]
    Up,
    Edge,
    Verify,
    Held,
}

impl DebounceState {
    fn next(self, asserted: bool) -> Self {
        use DebounceState::*;
        match (self, asserted) {
            (Up, true) => Edge,
            (Up, false) => Up,
            (Edge, true) => Verify,
            (Edge, false) => Up,
            (Verify, _) => Held,
            (Held, true) => Held,
            (Held, false) => Up,
        }
    }
}

pub struct ButtonDebouncer<B> {
    input: B,
    state: DebounceState,
    latch: bool,
    divider: u8,
    slice: u8,
}

impl<B: ButtonInput> ButtonDebouncer<B> {
    pub fn new(input: B) -> Self {
        Self::with_divider(input, BUTTON_SAMPLE_DIVIDER)
    }

    /// `divider` ticks per evaluation; 0 is treated as 1.
    pub fn with_divider(input: B, divider: u8) -> Self {
        ButtonDebouncer {
            input,
            state: DebounceState::Up,
            latch: false,
            divider: divider.max(1),
            slice: 0,
        }
    }

    /// Call once per tick.
    pub fn sample(&mut self) {
        let asserted = self.input.is_asserted();
        if self.slice > 0 {
            self.slice -= 1;
            return;
        }
        self.slice = self.divider - 1;

        let next = self.state.next(asserted);
        if self.state == DebounceState::Verify {
            self.latch = true;
        }
        self.state = next;
    }

    #[inline]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    #[inline]
    pub fn is_latched(&self) -> bool {
        self.latch
    }

    /// Ticks from the first asserted sample to the latch being set.
    pub fn debounce_ticks(&self) -> u32 {
        self.divider as u32 * CONFIRM_SAMPLES
    }

    pub fn input(&self) -> &B {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut B {
        &mut self.input
    }
}

impl<B: ButtonInput> PressLatch for ButtonDebouncer<B> {
    fn consume_pressed(&mut self) -> bool {
        std::mem::replace(&mut self.latch, false)
    }
}
