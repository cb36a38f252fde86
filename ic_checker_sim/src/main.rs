use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::prelude::*;

use ic_checker::config::CheckerConfig;
use ic_checker::pins::{Level, PinId};
use ic_checker::presenter::{
    BicolorLed, LcdPresenter, LedColor, LedPresenter, ResultPresenter, TextDisplay,
};
use ic_checker::scheduler::StdClock;
use ic_checker::sim::{ScriptedButton, SimBench, SimFault};
use ic_checker::{Checker, ConfigError, Designator, TestPlan};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Indicator {
    Led,
    Lcd,
}

#[derive(Parser, Debug)]
#[command(name = "ic_checker_sim", about = "Run the IC checker against a simulated socket.")]
struct Args {
    /// Part in the socket (e.g. 74HC08). Leave out for an empty socket.
    #[arg(long, value_name = "PART")]
    socket: Option<Designator>,

    /// Socket pin that always reads low.
    #[arg(long, value_name = "PIN")]
    stuck_low: Vec<u8>,

    /// Socket pin that always reads high.
    #[arg(long, value_name = "PIN")]
    stuck_high: Vec<u8>,

    /// Restrict the plan to these parts, in order. Defaults to the whole catalog.
    #[arg(long = "test", value_name = "PART")]
    plan: Vec<Designator>,

    #[arg(long, value_enum, default_value_t = Indicator::Lcd)]
    indicator: Indicator,

    /// Number of button presses to simulate.
    #[arg(long, default_value_t = 1)]
    cycles: usize,

    /// Super-loop period in milliseconds.
    #[arg(long, default_value_t = ic_checker::config::TIMESLICE_PERIOD_MS)]
    period_ms: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Prints LED changes to stdout.
struct ConsoleLed;

impl BicolorLed for ConsoleLed {
    fn set(&mut self, color: LedColor) {
        let name = match color {
            c if c == LedColor::ORANGE => "orange",
            c if c == LedColor::GREEN => "green",
            c if c == LedColor::RED => "red",
            _ => "off",
        };
        println!("[led] {}", name);
    }
}

/// Prints the first LCD line whenever a write completes.
#[derive(Default)]
struct ConsoleLcd {
    line: String,
}

impl TextDisplay for ConsoleLcd {
    fn clear(&mut self) {
        self.line.clear();
    }

    fn move_cursor(&mut self, _column: u8, _row: u8) {}

    fn write_str(&mut self, text: &str) {
        self.line.push_str(text);
        println!("[lcd] {}", self.line);
    }
}

fn build_bench(args: &Args) -> Result<SimBench, ConfigError> {
    let mut bench = match args.socket {
        Some(part) => SimBench::with_part(part)?,
        None => SimBench::empty(),
    };
    for (pins, level) in [(&args.stuck_low, Level::Low), (&args.stuck_high, Level::High)] {
        for &pin in pins {
            bench.inject(SimFault::StuckAt {
                pin: PinId::new(pin)?,
                level,
            });
        }
    }
    Ok(bench)
}

fn build_plan(args: &Args) -> Result<TestPlan, ConfigError> {
    if args.plan.is_empty() {
        return TestPlan::catalog();
    }
    let pinouts: Vec<_> = args.plan.iter().map(|d| d.reference_pinout()).collect();
    TestPlan::from_pinouts(&pinouts)
}

fn run<R: ResultPresenter>(
    args: &Args,
    config: &CheckerConfig,
    plan: TestPlan,
    bench: SimBench,
    presenter: R,
) {
    let button = ScriptedButton::spaced_presses(args.cycles, plan.len(), config.sample_divider);

    let mut checker =
        Checker::on_socket(config, plan, StdClock::new(), button, bench, presenter);
    let mut ticks = 0usize;
    loop {
        checker.clock();
        ticks += 1;
        if checker.debouncer().input().remaining() == 0 && checker.is_idle() {
            break;
        }
    }
    info!(ticks, overruns = checker.overruns(), "simulation finished");
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = CheckerConfig {
        period_ms: args.period_ms,
        ..Default::default()
    };
    let plan = build_plan(&args)?;
    let bench = build_bench(&args)?;
    info!(
        socket = %args.socket.map_or("empty".to_string(), |d| d.to_string()),
        parts = plan.len(),
        "starting checker"
    );

    let timeout = config.indicator_timeout_ticks();
    match args.indicator {
        Indicator::Led => run(&args, &config, plan, bench, LedPresenter::new(ConsoleLed, timeout)),
        Indicator::Lcd => run(
            &args,
            &config,
            plan,
            bench,
            LcdPresenter::new(ConsoleLcd::default(), timeout),
        ),
    }
    Ok(())
}
