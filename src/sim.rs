//! A simulated test socket.
//!
//! [`SimBench`] stands in for the GPIO block: it keeps track of what the
//! tester drives, computes the outputs of the socketed part from that, and
//! logs every pin operation so tests can check exactly what was touched.

use std::collections::{BTreeSet, VecDeque};

use crate::debounce::{ButtonInput, CONFIRM_SAMPLES};
use crate::descriptor::{ConfigError, IcDescriptor};
use crate::designator::Designator;
use crate::pins::{Direction, Level, PinId, PinIo, SOCKET_PINS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
    Direction(PinId, Direction),
    Write(PinId, Level),
    Read(PinId),
}

impl PinOp {
    pub fn pin(&self) -> PinId {
        match *self {
            PinOp::Direction(pin, _) | PinOp::Write(pin, _) | PinOp::Read(pin) => pin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimFault {
    /// The pin always reads `level`.
    StuckAt { pin: PinId, level: Level },
    /// The gate driving `output` gives the wrong answer when its inputs
    /// (in lane order) equal `inputs`.
    InvertOn { output: PinId, inputs: Vec<bool> },
}

const SLOTS: usize = SOCKET_PINS as usize + 1;

pub struct SimBench {
    part: Option<IcDescriptor>,
    faults: Vec<SimFault>,
    directions: [Direction; SLOTS],
    driven: [Level; SLOTS],
    log: Vec<PinOp>,
}

impl SimBench {
    /// Nothing in the socket: every input reads low through the pull-downs.
    pub fn empty() -> Self {
        SimBench {
            part: None,
            faults: vec![],
            directions: [Direction::Input; SLOTS],
            driven: [Level::Low; SLOTS],
            log: vec![],
        }
    }

    pub fn socketed(part: IcDescriptor) -> Self {
        SimBench {
            part: Some(part),
            ..SimBench::empty()
        }
    }

    /// A healthy part wired with its reference pinout.
    pub fn with_part(designator: Designator) -> Result<Self, ConfigError> {
        Ok(SimBench::socketed(designator.reference_pinout().descriptor()?))
    }

    pub fn with_fault(mut self, fault: SimFault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn inject(&mut self, fault: SimFault) {
        self.faults.push(fault);
    }

    pub fn log(&self) -> &[PinOp] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn reads(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, PinOp::Read(_)))
            .count()
    }

    pub fn touched_pins(&self) -> BTreeSet<PinId> {
        self.log.iter().map(PinOp::pin).collect()
    }

    fn slot(pin: PinId) -> usize {
        pin.number() as usize
    }

    /// Level the part sees on one of its input pins.
    fn input_level(&self, pin: PinId) -> bool {
        match self.directions[Self::slot(pin)] {
            Direction::Output => self.driven[Self::slot(pin)].is_high(),
            Direction::Input => false,
        }
    }

    /// Level the part drives on `pin`, if `pin` is one of its outputs.
    fn part_output(&self, pin: PinId) -> Option<Level> {
        let part = self.part.as_ref()?;
        let function = part.designator().function();
        let (inputs, _) = part.gates().find(|&(_, output)| output == pin)?;
        let inputs: Vec<bool> = inputs.iter().map(|&p| self.input_level(p)).collect();

        let mut value = function.output(&inputs);
        for fault in &self.faults {
            if let SimFault::InvertOn {
                output,
                inputs: when,
            } = fault
            {
                if *output == pin && *when == inputs {
                    value = !value;
                }
            }
        }
        Some(value.into())
    }

    fn stuck_level(&self, pin: PinId) -> Option<Level> {
        self.faults.iter().find_map(|fault| match *fault {
            SimFault::StuckAt { pin: p, level } if p == pin => Some(level),
            _ => None,
        })
    }
}

impl PinIo for SimBench {
    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        self.log.push(PinOp::Direction(pin, direction));
        self.directions[Self::slot(pin)] = direction;
    }

    fn write(&mut self, pin: PinId, level: Level) {
        self.log.push(PinOp::Write(pin, level));
        self.driven[Self::slot(pin)] = level;
    }

    fn read(&mut self, pin: PinId) -> Level {
        self.log.push(PinOp::Read(pin));
        if let Some(level) = self.stuck_level(pin) {
            return level;
        }
        match self.directions[Self::slot(pin)] {
            Direction::Output => self.driven[Self::slot(pin)],
            Direction::Input => self.part_output(pin).unwrap_or(Level::Low),
        }
    }
}

/// Replays a button level per tick, then stays released.
#[derive(Debug, Clone, Default)]
pub struct ScriptedButton {
    script: VecDeque<bool>,
}

impl ScriptedButton {
    /// Released for `delay` ticks, then held for `held` ticks.
    pub fn press(delay: usize, held: usize) -> Self {
        let mut button = ScriptedButton::default();
        button.queue_press(delay, held);
        button
    }

    /// `count` presses, each held long enough to be confirmed and released
    /// long enough for a full cycle over `plan_len` parts to be presented
    /// before the next one starts.
    pub fn spaced_presses(count: usize, plan_len: usize, sample_divider: u8) -> Self {
        let debounce = sample_divider.max(1) as usize * CONFIRM_SAMPLES as usize;
        let mut button = ScriptedButton::default();
        for _ in 0..count {
            button.queue_press(plan_len + 2 + debounce, 2 * debounce + 2);
        }
        button
    }

    pub fn queue_press(&mut self, delay: usize, held: usize) {
        self.script.extend(std::iter::repeat(false).take(delay));
        self.script.extend(std::iter::repeat(true).take(held));
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ButtonInput for ScriptedButton {
    fn is_asserted(&mut self) -> bool {
        self.script.pop_front().unwrap_or(false)
    }
}
