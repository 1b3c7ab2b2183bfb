//! Behaviour-driven step definitions driving the rank CLI scenarios.

use super::helpers::{demo_fixture, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use kidspot_data::DemoSourceError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct RankWorld {
    _tmp: TempDir,
    scratch: Utf8PathBuf,
    places: RefCell<Option<Utf8PathBuf>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RankWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let scratch =
            Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            scratch,
            places: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["kidspot".to_owned(), "rank".to_owned()];
        if let Some(path) = self.places.borrow().as_ref() {
            argv.extend([format!("--{ARG_PLACES}"), path.as_str().to_owned()]);
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn printed(&self) -> Vec<Value> {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON array")
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
fn world() -> RankWorld {
    RankWorld::new()
}

#[given("the shipped demo fixture")]
fn shipped_demo_fixture(#[from(world)] world: &RankWorld) {
    world.places.replace(Some(demo_fixture()));
}

#[given("the search centre is Avenida Paulista")]
fn centre_is_paulista(#[from(world)] world: &RankWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_LAT}=-23.5640"),
        format!("--{ARG_LNG}=-46.6520"),
    ]);
}

#[given("the output is limited to 1 venue")]
fn output_is_limited(#[from(world)] world: &RankWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_LIMIT}"), "1".to_owned()]);
}

#[given("no demo fixture and no API key")]
fn no_venue_data(#[from(world)] world: &RankWorld) {
    world.places.replace(None);
}

#[given("a demo fixture containing invalid JSON")]
fn invalid_fixture(#[from(world)] world: &RankWorld) {
    let path = world.scratch.join("broken.json");
    write_utf8(&path, b"[ { not valid json");
    world.places.replace(Some(path));
}

#[when("I run the rank command")]
fn run_rank_command(#[from(world)] world: &RankWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Rank(args) => {
            let mut buffer = world.stdout.borrow_mut();
            crate::rank::run_rank_with(args, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints JSON output")]
fn command_succeeds(#[from(world)] world: &RankWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
    assert!(!world.printed().is_empty(), "no venues printed");
}

#[then("the first ranked venue is parque-ibirapuera")]
fn first_is_ibirapuera(#[from(world)] world: &RankWorld) {
    let printed = world.printed();
    let first = printed.first().expect("at least one venue");
    assert_eq!(first.get("id").and_then(Value::as_str), Some("parque-ibirapuera"));
    assert_eq!(first.get("priorityLayer").and_then(Value::as_str), Some("A"));
    assert!(
        first.get("distanceM").is_some_and(Value::is_number),
        "distance missing: {first}"
    );
}

#[then("no lodging venue is printed")]
fn no_lodging(#[from(world)] world: &RankWorld) {
    assert!(
        world
            .printed()
            .iter()
            .all(|venue| venue.get("id").and_then(Value::as_str) != Some("hotel-paulista"))
    );
}

#[then("exactly one venue is printed")]
fn exactly_one(#[from(world)] world: &RankWorld) {
    assert_eq!(world.printed().len(), 1);
}

#[then("the command fails because the places path is missing")]
fn fails_missing_places(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_PLACES);
            assert_eq!(*env, ENV_PLACES);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the fixture cannot be parsed")]
fn fails_parse(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::LoadPlaces(DemoSourceError::Parse { .. }) => {}
        other => panic!("expected LoadPlaces parse error, found {other:?}"),
    }
}

macro_rules! register_rank_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rank_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RankWorld) {
            let _ = world;
        }
    };
}

register_rank_scenario!(rank_demo_fixture, "ranking the demo fixture");
register_rank_scenario!(rank_with_limit, "limiting the printed venues");
register_rank_scenario!(rank_without_venue_data, "rejecting a run without venue data");
register_rank_scenario!(rank_unreadable_fixture, "rejecting an unreadable fixture");
