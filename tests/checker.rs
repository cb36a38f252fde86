use std::cell::Cell;

use ic_checker::config::CheckerConfig;
use ic_checker::descriptor::TestPlan;
use ic_checker::designator::Designator;
use ic_checker::engine::GateTestEngine;
use ic_checker::pins::{PinId, SpinDelay};
use ic_checker::presenter::{
    BicolorLed, LcdPresenter, LedColor, LedPresenter, TextDisplay, READY_PROMPT, TESTING_PROMPT,
};
use ic_checker::scheduler::TickSource;
use ic_checker::sequencer::SequencerState;
use ic_checker::sim::{ScriptedButton, SimBench, SimFault};
use ic_checker::Checker;

/// Millisecond counter that moves `step` ms per read.
struct FakeTicks {
    now: Cell<u32>,
    step: u32,
}

impl FakeTicks {
    fn new(step: u32) -> Self {
        FakeTicks {
            now: Cell::new(0),
            step,
        }
    }
}

impl TickSource for FakeTicks {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

/// First line of a character display, plus everything ever written to it.
#[derive(Default)]
struct Screen {
    line: String,
    history: Vec<String>,
}

impl TextDisplay for Screen {
    fn clear(&mut self) {
        self.line.clear();
    }

    fn move_cursor(&mut self, column: u8, row: u8) {
        assert_eq!((column, row), (1, 1));
    }

    fn write_str(&mut self, text: &str) {
        self.line.push_str(text);
        self.history.push(text.to_string());
    }
}

#[derive(Default)]
struct Led(LedColor);

impl BicolorLed for Led {
    fn set(&mut self, color: LedColor) {
        self.0 = color;
    }
}

type LcdChecker =
    Checker<FakeTicks, ScriptedButton, GateTestEngine<SimBench, SpinDelay>, LcdPresenter<Screen>>;

fn lcd_checker(bench: SimBench, button: ScriptedButton) -> LcdChecker {
    lcd_checker_with(TestPlan::catalog().unwrap(), FakeTicks::new(1), bench, button)
}

fn lcd_checker_with(
    plan: TestPlan,
    ticks: FakeTicks,
    bench: SimBench,
    button: ScriptedButton,
) -> LcdChecker {
    let config = CheckerConfig::default();
    Checker::on_socket(
        &config,
        plan,
        ticks,
        button,
        bench,
        LcdPresenter::new(Screen::default(), config.indicator_timeout_ticks()),
    )
}

fn screen_after(bench: SimBench, ticks: usize) -> String {
    let mut checker = lcd_checker(bench, ScriptedButton::press(2, 10));
    for _ in 0..ticks {
        checker.clock();
    }
    assert_eq!(checker.sequencer().state(), SequencerState::Idle);
    checker.sequencer().presenter().display().line.clone()
}

#[test]
fn identifies_every_catalog_part() {
    for &designator in Designator::ALL {
        let bench = SimBench::with_part(designator).unwrap();
        assert_eq!(
            screen_after(bench, 40),
            format!("{} Passed", designator),
            "{}",
            designator
        );
    }
}

#[test]
fn empty_socket_reports_fail() {
    assert_eq!(screen_after(SimBench::empty(), 40), "Test Fail");
}

#[test]
fn damaged_part_reports_fail() {
    let bench = SimBench::with_part(Designator::Hc86)
        .unwrap()
        .with_fault(SimFault::InvertOn {
            output: PinId::new(11).unwrap(),
            inputs: vec![true, false],
        });
    assert_eq!(screen_after(bench, 40), "Test Fail");
}

#[test]
fn prompt_sequence() {
    let mut checker = lcd_checker(
        SimBench::with_part(Designator::Hc04).unwrap(),
        ScriptedButton::press(0, 8),
    );
    let plan_len = checker.sequencer().plan().len();

    // the press is confirmed on the fifth slice
    for _ in 0..5 {
        checker.clock();
    }
    assert_eq!(checker.sequencer().state(), SequencerState::Testing(0));
    assert_eq!(checker.sequencer().presenter().display().line, TESTING_PROMPT);

    for _ in 0..plan_len + 1 {
        checker.clock();
    }
    assert_eq!(checker.sequencer().state(), SequencerState::Idle);
    assert_eq!(
        checker.sequencer().presenter().display().history,
        vec![READY_PROMPT, TESTING_PROMPT, "74HC04 Passed"]
    );
}

#[test]
fn led_turns_off_after_timeout() {
    let config = CheckerConfig {
        indicator_timeout_ms: 70,
        ..Default::default()
    };
    let timeout = config.indicator_timeout_ticks() as usize;
    assert_eq!(timeout, 10);

    let mut checker = Checker::on_socket(
        &config,
        TestPlan::catalog().unwrap(),
        FakeTicks::new(1),
        ScriptedButton::press(0, 6),
        SimBench::with_part(Designator::Hc27).unwrap(),
        LedPresenter::new(Led::default(), config.indicator_timeout_ticks()),
    );
    let cycle = 5 + checker.sequencer().plan().len() + 1;
    for _ in 0..cycle {
        checker.clock();
    }
    assert_eq!(checker.sequencer().presenter().led().0, LedColor::GREEN);

    for _ in 0..timeout - 1 {
        checker.clock();
    }
    assert_eq!(checker.sequencer().presenter().led().0, LedColor::GREEN);
    checker.clock();
    assert_eq!(checker.sequencer().presenter().led().0, LedColor::empty());
}

#[test]
fn short_press_never_starts_a_cycle() {
    for delay in 0..2 {
        for held in 1..=2 {
            let mut checker = lcd_checker(
                SimBench::with_part(Designator::Hc00).unwrap(),
                ScriptedButton::press(delay, held),
            );
            for _ in 0..40 {
                checker.clock();
                assert_eq!(
                    checker.sequencer().state(),
                    SequencerState::Idle,
                    "press of {} ticks after {}",
                    held,
                    delay
                );
            }
            assert_eq!(
                checker.sequencer().presenter().display().history,
                vec![READY_PROMPT],
                "press of {} ticks after {}",
                held,
                delay
            );
        }
    }
}

#[test]
fn spaced_presses_each_run_a_full_cycle() {
    let hc00 = Designator::Hc00.reference_pinout().descriptor().unwrap();
    let hc08 = Designator::Hc08.reference_pinout().descriptor().unwrap();
    let plan = TestPlan::new(
        std::iter::once(hc00)
            .chain(std::iter::repeat(hc08).take(31))
            .collect(),
    )
    .unwrap();
    let config = CheckerConfig::default();
    let button = ScriptedButton::spaced_presses(3, plan.len(), config.sample_divider);
    let mut checker = lcd_checker_with(
        plan,
        FakeTicks::new(1),
        SimBench::with_part(Designator::Hc00).unwrap(),
        button,
    );

    let mut ticks = 0;
    while checker.debouncer().input().remaining() > 0 || !checker.is_idle() {
        checker.clock();
        ticks += 1;
        assert!(ticks < 1000, "checker never settled");
    }

    let history = &checker.sequencer().presenter().display().history;
    let count = |prompt: &str| history.iter().filter(|line| *line == prompt).count();
    assert_eq!(count(TESTING_PROMPT), 3);
    assert_eq!(count("74HC00 Passed"), 3);
    assert_eq!(checker.sequencer().state(), SequencerState::Idle);
}

#[test]
fn late_release_is_not_an_overrun() {
    // every poll of the wait loop lands 3 ms later, so the slice is released
    // 9 ms after the previous one while its own work takes 3 ms
    let mut checker = lcd_checker_with(
        TestPlan::catalog().unwrap(),
        FakeTicks::new(3),
        SimBench::with_part(Designator::Hc02).unwrap(),
        ScriptedButton::press(0, 10),
    );
    for _ in 0..30 {
        checker.clock();
    }
    assert_eq!(checker.overruns(), 0);
    assert_eq!(checker.sequencer().presenter().display().line, "74HC02 Passed");
}

#[test]
fn slow_work_is_an_overrun() {
    let mut checker = lcd_checker_with(
        TestPlan::catalog().unwrap(),
        FakeTicks::new(8),
        SimBench::empty(),
        ScriptedButton::default(),
    );
    for _ in 0..5 {
        checker.clock();
    }
    assert_eq!(checker.overruns(), 5);
}
