//! Behaviour-driven step definitions driving the analyze CLI scenarios.

use super::helpers::{MUMBAI_TRIPLE, OUT_OF_RANGE, utf8_root, write_utf8};
use super::*;
use crate::analyze::run_analyze_with;
use camino::Utf8PathBuf;
use hazard_analytics::ParameterError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct AnalyzeWorld {
    _tmp: TempDir,
    root: Utf8PathBuf,
    points_path: Utf8PathBuf,
    include_points: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl AnalyzeWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = utf8_root(&tmp);
        let points_path = root.join("reports.json");
        Self {
            _tmp: tmp,
            root,
            points_path,
            include_points: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn output_path(&self) -> Utf8PathBuf {
        self.root.join("out/maps/analysis.json")
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["hazard".to_owned(), "analyze".to_owned()];
        if *self.include_points.borrow() {
            argv.push(self.points_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> AnalyzeWorld {
    AnalyzeWorld::new()
}

#[given("three coastal reports exist on disk")]
fn coastal_reports_exist(#[from(world)] world: &AnalyzeWorld) {
    write_utf8(&world.points_path, MUMBAI_TRIPLE.as_bytes());
}

#[given("a batch with an out-of-range report exists on disk")]
fn out_of_range_batch_exists(#[from(world)] world: &AnalyzeWorld) {
    write_utf8(&world.points_path, OUT_OF_RANGE.as_bytes());
}

#[given("I request output into a nested directory")]
fn request_nested_output(#[from(world)] world: &AnalyzeWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_OUTPUT}"), world.output_path().into_string()]);
}

#[given("I pass a zero clustering radius")]
fn pass_zero_radius(#[from(world)] world: &AnalyzeWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_EPS_KM}"), "0".to_owned()]);
}

#[given("I omit the points path")]
fn omit_points_path(#[from(world)] world: &AnalyzeWorld) {
    *world.include_points.borrow_mut() = false;
}

#[when("I run the analyze command")]
fn run_analyze_command(#[from(world)] world: &AnalyzeWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Analyze(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_analyze_with(args, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints the analysis as JSON")]
fn command_prints_json(#[from(world)] world: &AnalyzeWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let output: serde_json::Value =
        serde_json::from_slice(&world.stdout.borrow()).expect("output should be JSON");
    assert_eq!(
        output.pointer("/summary/num_points"),
        Some(&serde_json::json!(3))
    );
    assert_eq!(
        output.pointer("/summary/num_clusters"),
        Some(&serde_json::json!(1))
    );
    assert_eq!(
        output.pointer("/assignments/0/label"),
        Some(&serde_json::json!(0))
    );
}

#[then("the analysis is written to the output file")]
fn analysis_written_to_file(#[from(world)] world: &AnalyzeWorld) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");

    assert!(world.stdout.borrow().is_empty(), "stdout should stay empty");
    let contents =
        std::fs::read_to_string(world.output_path().as_std_path()).expect("output file exists");
    let output: serde_json::Value = serde_json::from_str(&contents).expect("output is JSON");
    assert_eq!(
        output.pointer("/summary/num_points"),
        Some(&serde_json::json!(3))
    );
}

#[then("the command fails because record 1 is invalid")]
fn command_fails_invalid_record(#[from(world)] world: &AnalyzeWorld) {
    match &*world.error() {
        CliError::InvalidPoint { index, .. } => assert_eq!(*index, 1),
        other => panic!("expected InvalidPoint, found {other:?}"),
    }
}

#[then("the command fails because the parameters are invalid")]
fn command_fails_invalid_parameters(#[from(world)] world: &AnalyzeWorld) {
    match &*world.error() {
        CliError::InvalidParameters(source) => {
            assert_eq!(*source, ParameterError::NonPositiveEps { value: 0.0 });
        }
        other => panic!("expected InvalidParameters, found {other:?}"),
    }
}

#[then("the command fails because the points path is missing")]
fn command_fails_missing_points(#[from(world)] world: &AnalyzeWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_POINTS),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_analyze_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/analyze_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: AnalyzeWorld) {
            let _ = world;
        }
    };
}

register_analyze_scenario!(analyze_happy_path, "analysing reports from a JSON file");
register_analyze_scenario!(analyze_output_file, "writing the analysis to an output file");
register_analyze_scenario!(analyze_invalid_record, "rejecting an out-of-range report");
register_analyze_scenario!(analyze_invalid_parameters, "rejecting invalid parameters");
register_analyze_scenario!(analyze_missing_points, "rejecting missing points paths");
