use std::collections::BTreeSet;

use ic_checker::designator::Designator;
use ic_checker::engine::{GateTestEngine, IcTester};
use ic_checker::oracle::Verdict;
use ic_checker::pins::{Delay, Level, PinId};
use ic_checker::sim::{PinOp, SimBench, SimFault};

/// Counts settle calls instead of waiting.
#[derive(Default)]
struct CountingDelay(usize);

impl Delay for CountingDelay {
    fn settle(&mut self) {
        self.0 += 1;
    }
}

fn pin(n: u8) -> PinId {
    PinId::new(n).unwrap()
}

fn pins(ns: &[u8]) -> BTreeSet<PinId> {
    ns.iter().map(|&n| pin(n)).collect()
}

fn engine_for(bench: SimBench) -> GateTestEngine<SimBench, CountingDelay> {
    GateTestEngine::new(bench, CountingDelay::default())
}

#[test]
fn healthy_parts_pass_their_own_pinout() {
    for &designator in Designator::ALL {
        let ic = designator.reference_pinout().descriptor().unwrap();
        let mut engine = engine_for(SimBench::socketed(ic.clone()));
        assert_eq!(engine.test_ic(&ic), Verdict::Pass, "{}", designator);

        let vectors = ic.gate_count() << ic.inputs_per_gate();
        let (bench, delay) = engine.into_parts();
        assert_eq!(bench.reads(), vectors, "{}", designator);
        assert_eq!(delay.0, vectors, "{}", designator);
    }
}

#[test]
fn vector_ops_stay_inside_the_gate_window() {
    let ic = Designator::Hc10.reference_pinout().descriptor().unwrap();
    let mut engine = engine_for(SimBench::socketed(ic.clone()));
    assert_eq!(engine.test_ic(&ic), Verdict::Pass);

    let log = engine.pins().log();
    let k = ic.inputs_per_gate();
    // direction + write per input, then direction + read on the output
    let per_vector = 2 * k + 2;
    assert_eq!(log.len(), ic.gate_count() * (1 << k) * per_vector);

    for (gate, chunk) in log.chunks(per_vector << k).enumerate() {
        let (inputs, output) = ic.gates().nth(gate).unwrap();
        let mut window: BTreeSet<PinId> = inputs.iter().copied().collect();
        window.insert(output);
        let touched: BTreeSet<PinId> = chunk.iter().map(PinOp::pin).collect();
        assert_eq!(touched, window, "gate {}", gate);
    }
}

#[test]
fn vectors_are_driven_in_counting_order() {
    let ic = Designator::Hc00.reference_pinout().descriptor().unwrap();
    let mut engine = engine_for(SimBench::socketed(ic.clone()));
    engine.test_ic(&ic);

    let first_gate: Vec<(PinId, Level)> = engine
        .pins()
        .log()
        .iter()
        .take(4 * 6)
        .filter_map(|op| match *op {
            PinOp::Write(pin, level) => Some((pin, level)),
            _ => None,
        })
        .collect();
    use Level::*;
    assert_eq!(
        first_gate,
        vec![
            (pin(1), Low),
            (pin(2), Low),
            (pin(1), Low),
            (pin(2), High),
            (pin(1), High),
            (pin(2), Low),
            (pin(1), High),
            (pin(2), High),
        ]
    );
}

#[test]
fn first_mismatch_ends_the_test() {
    let ic = Designator::Hc00.reference_pinout().descriptor().unwrap();
    let bench = SimBench::socketed(ic.clone()).with_fault(SimFault::InvertOn {
        output: pin(6),
        inputs: vec![true, true],
    });
    let mut engine = engine_for(bench);
    assert_eq!(engine.test_ic(&ic), Verdict::Fail);

    let bench = engine.pins();
    // gate 0 runs all four vectors, gate 1 fails on its last one
    assert_eq!(bench.reads(), 8);
    assert_eq!(bench.log().last(), Some(&PinOp::Read(pin(6))));
    assert_eq!(bench.touched_pins(), pins(&[1, 2, 3, 4, 5, 6]));
}

#[test]
fn stuck_output_fails_on_first_vector() {
    let ic = Designator::Hc08.reference_pinout().descriptor().unwrap();
    let bench = SimBench::socketed(ic.clone()).with_fault(SimFault::StuckAt {
        pin: pin(3),
        level: Level::High,
    });
    let mut engine = engine_for(bench);
    assert_eq!(engine.test_ic(&ic), Verdict::Fail);
    assert_eq!(engine.pins().reads(), 1);
}

#[test]
fn and_tested_as_nand_fails() {
    let and = Designator::Hc08.reference_pinout().descriptor().unwrap();
    let nand = Designator::Hc00.reference_pinout().descriptor().unwrap();
    let mut engine = engine_for(SimBench::socketed(and.clone()));

    assert_eq!(engine.test_ic(&nand), Verdict::Fail);
    // (0, 0) already disagrees
    assert_eq!(engine.pins().reads(), 1);

    engine.pins_mut().clear_log();
    assert_eq!(engine.test_ic(&and), Verdict::Pass);
}

#[test]
fn empty_socket_fails_everything() {
    let mut engine = engine_for(SimBench::empty());
    for &designator in Designator::ALL {
        let ic = designator.reference_pinout().descriptor().unwrap();
        assert_eq!(engine.test_ic(&ic), Verdict::Fail, "{}", designator);
    }
}
