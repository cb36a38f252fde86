use tracing::{debug, trace};

use crate::descriptor::IcDescriptor;
use crate::oracle::{FailureOracle, Lanes, Verdict};
use crate::pins::{Delay, Direction, PinId, PinIo};
use crate::vectors::VectorSet;

/// Anything that can render a verdict on one part. The sequencer only talks
/// to this, which keeps it testable without a socket.
pub trait IcTester {
    fn test_ic(&mut self, ic: &IcDescriptor) -> Verdict;
}

impl<T: IcTester + ?Sized> IcTester for &mut T {
    fn test_ic(&mut self, ic: &IcDescriptor) -> Verdict {
        (**self).test_ic(ic)
    }
}

/// Exhaustive gate tester: every vector on every gate, stopping at the first
/// mismatch.
pub struct GateTestEngine<P, D> {
    pins: P,
    delay: D,
    oracle: FailureOracle,
}

impl<P: PinIo, D: Delay> GateTestEngine<P, D> {
    pub fn new(pins: P, delay: D) -> Self {
        GateTestEngine {
            pins,
            delay,
            oracle: FailureOracle,
        }
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    pub fn into_parts(self) -> (P, D) {
        (self.pins, self.delay)
    }

    /// Drive the active lanes of `lanes` onto the gate's input window. The
    /// window is exactly as long as the gate's arity, so unused lanes never
    /// reach a pin.
    fn apply(&mut self, inputs: &[PinId], lanes: Lanes) {
        for (&pin, &value) in inputs.iter().zip(lanes.as_array()) {
            self.pins.set_direction(pin, Direction::Output);
            self.pins.write(pin, value.into());
        }
    }
}

impl<P: PinIo, D: Delay> IcTester for GateTestEngine<P, D> {
    fn test_ic(&mut self, ic: &IcDescriptor) -> Verdict {
        let designator = ic.designator();

        for (gate, (inputs, output)) in ic.gates().enumerate() {
            for lanes in VectorSet::new(ic.inputs_per_gate()) {
                self.apply(inputs, lanes);
                self.delay.settle();
                self.pins.set_direction(output, Direction::Input);
                let level = self.pins.read(output);
                trace!(%designator, gate, %lanes, ?level, "vector");

                if self.oracle.evaluate(designator, level, lanes) == Verdict::Fail {
                    debug!(%designator, gate, %lanes, ?level, %output, "mismatch");
                    return Verdict::Fail;
                }
            }
        }
        Verdict::Pass
    }
}
