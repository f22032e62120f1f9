//! Binary that runs `ParisSample` through the planner and prints
//! deterministic output lines for cross-process verification.
//!
//! Usage: `plan_fixture [DAYS BUDGET]` (default `2 100`)
//!
//! Output: key=value lines (see source for format).

use trailhead_harness::bundle::{PLAN_ARTIFACT, TRACE_ARTIFACT};
use trailhead_harness::request::{parse_budget, parse_days, TripRequest};
use trailhead_harness::runner::run_plan;
use trailhead_harness::worlds::paris::ParisSample;
use trailhead_search::policy::SearchPolicy;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (days, budget) = match args.as_slice() {
        [] => (2, 100.0),
        [days, budget] => (
            parse_days(days).expect("invalid days"),
            parse_budget(budget).expect("invalid budget"),
        ),
        _ => panic!("usage: plan_fixture [DAYS BUDGET]"),
    };
    let request = TripRequest::new(days, budget).expect("invalid request");
    let run = run_plan(&ParisSample, &request, SearchPolicy::default()).expect("plan run failed");

    let plan = run.bundle.get(PLAN_ARTIFACT).expect("missing plan.json");
    let trace = run.bundle.get(TRACE_ARTIFACT).expect("missing search_trace.json");

    println!("bundle_digest={}", run.bundle.digest);
    println!("graph_digest={}", run.trace.metadata.graph_digest);
    println!("plan_hash={}", plan.content_hash);
    println!("trace_hash={}", trace.content_hash);
    println!("trace_digest={}", run.trace.digest().expect("trace digest"));
    println!("plan={}", run.plan.identifiers().join("|"));
    println!("total_cost={}", run.plan.total_cost);
    println!("total_expansions={}", run.trace.metadata.total_expansions);
    println!("artifact_count={}", run.bundle.artifacts.len());
}
