//! Input vector generation for one gate.
//!
//! Vectors are produced by counting from 0 to 2^arity - 1. Lane A takes the
//! most significant bit of the count, so for a 2-input gate the order is
//! (0,0), (0,1), (1,0), (1,1). Lanes past the gate's arity stay at
//! [`DONT_CARE`] for the whole sequence.

use crate::oracle::{Lanes, DONT_CARE, LANE_COUNT};

#[derive(Debug, Clone)]
pub struct VectorSet {
    arity: usize,
    next: u32,
    end: u32,
}

impl VectorSet {
    pub fn new(arity: usize) -> Self {
        let arity = arity.min(LANE_COUNT);
        VectorSet {
            arity,
            next: 0,
            end: 1 << arity,
        }
    }
}

impl Iterator for VectorSet {
    type Item = Lanes;

    fn next(&mut self) -> Option<Lanes> {
        if self.next >= self.end {
            return None;
        }
        let count = self.next;
        self.next += 1;

        let mut lanes = [DONT_CARE; LANE_COUNT];
        for (lane, value) in lanes.iter_mut().enumerate().take(self.arity) {
            *value = (count >> (self.arity - 1 - lane)) & 1 != 0;
        }
        Some(Lanes::from_array(lanes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.end - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for VectorSet {}
