use std::fmt;

use crate::designator::Designator;
use crate::pins::Level;

pub const LANE_COUNT: usize = 4;

/// Value held on lanes a gate does not have. The lanes are never driven, and
/// no predicate reads them.
pub const DONT_CARE: bool = true;

/// One input vector: the values of lanes A, B, C and D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lanes([bool; LANE_COUNT]);

impl Lanes {
    pub const fn new(a: bool, b: bool, c: bool, d: bool) -> Self {
        Lanes([a, b, c, d])
    }

    pub const fn from_array(lanes: [bool; LANE_COUNT]) -> Self {
        Lanes(lanes)
    }

    #[inline]
    pub fn a(self) -> bool {
        self.0[0]
    }

    #[inline]
    pub fn b(self) -> bool {
        self.0[1]
    }

    #[inline]
    pub fn c(self) -> bool {
        self.0[2]
    }

    #[inline]
    pub fn d(self) -> bool {
        self.0[3]
    }

    #[inline]
    pub fn as_array(&self) -> &[bool; LANE_COUNT] {
        &self.0
    }

    /// The first `arity` lanes.
    #[inline]
    pub fn active(&self, arity: usize) -> &[bool] {
        &self.0[..arity.min(LANE_COUNT)]
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, &v) in ['A', 'B', 'C', 'D'].iter().zip(self.0.iter()) {
            write!(f, "{}{}", name, v as u8)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

/// Bank of pass/fail predicates, one per designator.
///
/// A predicate only reads the lanes its gate has; inverted outputs (NAND,
/// NOR, NOT) are compared as a single logical bit.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailureOracle;

impl FailureOracle {
    pub fn evaluate(&self, designator: Designator, output: Level, lanes: Lanes) -> Verdict {
        let expected = designator
            .function()
            .output(lanes.active(designator.arity()));
        if expected == output.is_high() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}
