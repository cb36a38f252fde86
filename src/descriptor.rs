use thiserror::Error;

use crate::designator::{Designator, Pinout};
use crate::pins::PinId;

pub const MAX_GATES: usize = 6;
pub const MAX_INPUTS_PER_GATE: usize = 4;
/// One result bit per plan entry.
pub const MAX_PLAN_LEN: usize = u32::BITS as usize;

/// Malformed test configuration. Always raised before a test cycle can start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown part number {0:?}")]
    UnknownDesignator(String),
    #[error("pin {0} is not a signal pin of the 14-pin socket")]
    InvalidPin(u8),
    #[error("gate count {0} is outside 1..={max}", max = MAX_GATES)]
    GateCount(usize),
    #[error("{inputs} input pins cannot be split evenly across {gates} gates")]
    UnevenInputs { inputs: usize, gates: usize },
    #[error("{0} inputs per gate is outside 1..={max}", max = MAX_INPUTS_PER_GATE)]
    Arity(usize),
    #[error("{designator} gates take {expected} inputs, descriptor wires {found}")]
    ArityMismatch {
        designator: Designator,
        expected: usize,
        found: usize,
    },
    #[error("pin {0} is listed more than once")]
    DuplicatePin(u8),
    #[error("pin {0} is listed as both an input and an output")]
    SharedPin(u8),
    #[error("test plan is empty")]
    EmptyPlan,
    #[error("test plan has {0} entries, at most {max} fit the result field", max = MAX_PLAN_LEN)]
    PlanTooLarge(usize),
}

/// Gate topology of one part on the socket.
///
/// Only constructible through [`IcDescriptor::new`], so every descriptor in
/// circulation satisfies the pin count invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcDescriptor {
    designator: Designator,
    inputs_per_gate: usize,
    input_pins: Vec<PinId>,
    output_pins: Vec<PinId>,
}

impl IcDescriptor {
    pub fn new(designator: Designator, inputs: &[u8], outputs: &[u8]) -> Result<Self, ConfigError> {
        let gates = outputs.len();
        if !(1..=MAX_GATES).contains(&gates) {
            return Err(ConfigError::GateCount(gates));
        }
        if inputs.len() % gates != 0 {
            return Err(ConfigError::UnevenInputs {
                inputs: inputs.len(),
                gates,
            });
        }
        let inputs_per_gate = inputs.len() / gates;
        if !(1..=MAX_INPUTS_PER_GATE).contains(&inputs_per_gate) {
            return Err(ConfigError::Arity(inputs_per_gate));
        }
        if inputs_per_gate != designator.arity() {
            return Err(ConfigError::ArityMismatch {
                designator,
                expected: designator.arity(),
                found: inputs_per_gate,
            });
        }

        let input_pins = inputs
            .iter()
            .map(|&n| PinId::new(n))
            .collect::<Result<Vec<_>, _>>()?;
        let output_pins = outputs
            .iter()
            .map(|&n| PinId::new(n))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pin) in input_pins.iter().enumerate() {
            if input_pins[..i].contains(pin) {
                return Err(ConfigError::DuplicatePin(pin.number()));
            }
        }
        for (i, pin) in output_pins.iter().enumerate() {
            if output_pins[..i].contains(pin) {
                return Err(ConfigError::DuplicatePin(pin.number()));
            }
            if input_pins.contains(pin) {
                return Err(ConfigError::SharedPin(pin.number()));
            }
        }

        Ok(IcDescriptor {
            designator,
            inputs_per_gate,
            input_pins,
            output_pins,
        })
    }

    #[inline]
    pub fn designator(&self) -> Designator {
        self.designator
    }

    #[inline]
    pub fn gate_count(&self) -> usize {
        self.output_pins.len()
    }

    #[inline]
    pub fn inputs_per_gate(&self) -> usize {
        self.inputs_per_gate
    }

    pub fn input_pins(&self) -> &[PinId] {
        &self.input_pins
    }

    pub fn output_pins(&self) -> &[PinId] {
        &self.output_pins
    }

    /// Input window of gate `gate`, in lane order A, B, C, D.
    pub fn gate_inputs(&self, gate: usize) -> &[PinId] {
        let start = gate * self.inputs_per_gate;
        &self.input_pins[start..start + self.inputs_per_gate]
    }

    /// `(input window, output pin)` for every gate, in gate order.
    pub fn gates(&self) -> impl Iterator<Item = (&[PinId], PinId)> + '_ {
        self.input_pins
            .chunks_exact(self.inputs_per_gate)
            .zip(self.output_pins.iter().copied())
    }
}

/// The ordered list of parts tested in one cycle. Entry `i` owns bit `i` of
/// the cycle's result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    descriptors: Vec<IcDescriptor>,
}

impl TestPlan {
    pub fn new(descriptors: Vec<IcDescriptor>) -> Result<Self, ConfigError> {
        match descriptors.len() {
            0 => Err(ConfigError::EmptyPlan),
            n if n > MAX_PLAN_LEN => Err(ConfigError::PlanTooLarge(n)),
            _ => Ok(TestPlan { descriptors }),
        }
    }

    pub fn from_pinouts(pinouts: &[Pinout]) -> Result<Self, ConfigError> {
        let descriptors = pinouts
            .iter()
            .map(Pinout::descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        TestPlan::new(descriptors)
    }

    /// Every catalog part, wired with its reference pinout, in catalog order.
    pub fn catalog() -> Result<Self, ConfigError> {
        let pinouts = Designator::ALL
            .iter()
            .map(|d| d.reference_pinout())
            .collect::<Vec<_>>();
        TestPlan::from_pinouts(&pinouts)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IcDescriptor> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IcDescriptor> {
        self.descriptors.iter()
    }
}

impl std::ops::Index<usize> for TestPlan {
    type Output = IcDescriptor;
    fn index(&self, index: usize) -> &Self::Output {
        &self.descriptors[index]
    }
}
