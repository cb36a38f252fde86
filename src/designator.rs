//! The closed catalog of supported parts.
//!
//! Each entry ties a part number to the boolean function of its gates, the
//! number of inputs per gate and the reference pinout on the test socket.

use paste::paste;
use std::{fmt, str::FromStr};

use crate::descriptor::{ConfigError, IcDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateFunction {
    And,
    Nand,
    Or,
    Nor,
    Not,
    Xor,
}

impl GateFunction {
    /// Expected gate output for the given (active) input lanes.
    pub fn output(self, inputs: &[bool]) -> bool {
        use GateFunction::*;
        match self {
            And => inputs.iter().all(|&v| v),
            Nand => !inputs.iter().all(|&v| v),
            Or => inputs.iter().any(|&v| v),
            Nor => !inputs.iter().any(|&v| v),
            Not => !inputs.first().copied().unwrap_or(false),
            Xor => inputs.iter().fold(false, |acc, &v| acc ^ v),
        }
    }
}

/// Raw socket wiring of a part, as written in the catalog below. Turned into
/// an [`IcDescriptor`] by [`Pinout::descriptor`], which validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pinout {
    pub designator: Designator,
    pub inputs: &'static [u8],
    pub outputs: &'static [u8],
}

impl Pinout {
    pub fn descriptor(&self) -> Result<IcDescriptor, ConfigError> {
        IcDescriptor::new(self.designator, self.inputs, self.outputs)
    }
}

macro_rules! catalog {
    ($(
        $variant:ident => $part:literal, $function:ident / $arity:literal,
            inputs [$($input:literal),+], outputs [$($output:literal),+];
    )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Designator {
            $($variant,)+
        }

        impl Designator {
            pub const ALL: &'static [Designator] = &[$(Designator::$variant,)+];

            pub fn part_number(self) -> &'static str {
                match self {
                    $(Designator::$variant => $part,)+
                }
            }

            pub fn function(self) -> GateFunction {
                match self {
                    $(Designator::$variant => GateFunction::$function,)+
                }
            }

            /// Number of inputs of one gate in the package
            pub fn arity(self) -> usize {
                match self {
                    $(Designator::$variant => $arity,)+
                }
            }

            pub fn reference_pinout(self) -> Pinout {
                paste! {
                    match self {
                        $(Designator::$variant => [<$variant:upper _PINOUT>],)+
                    }
                }
            }
        }

        paste! {
            $(
                #[doc = "Socket pinout of the " $part ". Inputs are grouped per gate in lane order."]
                pub const [<$variant:upper _PINOUT>]: Pinout = Pinout {
                    designator: Designator::$variant,
                    inputs: &[$($input),+],
                    outputs: &[$($output),+],
                };
            )+
        }
    };
}

catalog! {
    Hc00 => "74HC00", Nand / 2,
        inputs [1, 2, 4, 5, 9, 10, 12, 13], outputs [3, 6, 8, 11];
    Hc02 => "74HC02", Nor / 2,
        inputs [2, 3, 5, 6, 8, 9, 11, 12], outputs [1, 4, 10, 13];
    Hc04 => "74HC04", Not / 1,
        inputs [1, 3, 5, 9, 11, 13], outputs [2, 4, 6, 8, 10, 12];
    Hc08 => "74HC08", And / 2,
        inputs [1, 2, 4, 5, 9, 10, 12, 13], outputs [3, 6, 8, 11];
    Hc10 => "74HC10", Nand / 3,
        inputs [1, 2, 13, 3, 4, 5, 9, 10, 11], outputs [12, 6, 8];
    Hc20 => "74HC20", Nand / 4,
        inputs [1, 2, 4, 5, 9, 10, 12, 13], outputs [6, 8];
    Hc27 => "74HC27", Nor / 3,
        inputs [1, 2, 13, 3, 4, 5, 9, 10, 11], outputs [12, 6, 8];
    Hc86 => "74HC86", Xor / 2,
        inputs [1, 2, 4, 5, 9, 10, 12, 13], outputs [3, 6, 8, 11];
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part_number())
    }
}

impl FromStr for Designator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Designator::ALL
            .iter()
            .copied()
            .find(|d| d.part_number().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownDesignator(s.to_string()))
    }
}
