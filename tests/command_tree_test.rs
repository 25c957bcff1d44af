//! Integration tests for command tree dispatch, hooks and exit codes.

use std::cell::RefCell;
use std::rc::Rc;

use clap::{Arg, ArgAction};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use xkits::command::{CommandArgument, CommandError, CommandExecutor, CommandTree};
use xkits::exitcode;
use xkits::util::testing;

type Trace = Rc<RefCell<Vec<String>>>;

fn record(trace: &Trace, event: &str) {
    trace.borrow_mut().push(event.to_string());
}

/// Executor recording `<name>:prep|main|done` and returning the given statuses.
fn recorded(
    trace: &Trace,
    name: &str,
    prep: Option<i32>,
    main: i32,
    done: Option<i32>,
) -> CommandExecutor {
    let (t, n) = (trace.clone(), name.to_string());
    let mut executor = CommandExecutor::new(move |_| {
        record(&t, &format!("{n}:main"));
        Ok(main)
    });
    if let Some(status) = prep {
        let (t, n) = (trace.clone(), name.to_string());
        executor = executor.with_prep(move |_| {
            record(&t, &format!("{n}:prep"));
            Ok(status)
        });
    }
    if let Some(status) = done {
        let (t, n) = (trace.clone(), name.to_string());
        executor = executor.with_done(move |_| {
            record(&t, &format!("{n}:done"));
            Ok(status)
        });
    }
    executor
}

/// Root with hooks and one leaf per outcome.
struct Example {
    tree: CommandTree,
    trace: Trace,
}

impl Example {
    fn events(&self) -> Vec<String> {
        self.trace.borrow().clone()
    }

    fn saw(&self, event: &str) -> bool {
        self.trace.borrow().iter().any(|e| e == event)
    }
}

#[fixture]
fn example() -> Example {
    testing::init_test_setup();
    let trace: Trace = Rc::default();
    let mut tree = CommandTree::new(
        CommandArgument::new("example")
            .description("example")
            .executor(recorded(&trace, "example", Some(0), 0, Some(0))),
    )
    .with_version("1.0.0");
    let root = tree.root();

    let list = tree
        .register(
            root,
            CommandArgument::new("list")
                .description("test list")
                .arguments(|cmd| {
                    cmd.arg(
                        Arg::new("all")
                            .short('a')
                            .long("all")
                            .action(ArgAction::SetTrue),
                    )
                })
                .executor(recorded(&trace, "list", None, 0, None)),
        )
        .unwrap();
    tree.register(
        list,
        CommandArgument::new("known")
            .help("nested leaf")
            .executor(recorded(&trace, "known", None, 0, None)),
    )
    .unwrap();
    tree.register(
        root,
        CommandArgument::new("incomplete")
            .help("returns -1")
            .executor(recorded(&trace, "incomplete", None, -1, None)),
    )
    .unwrap();
    tree.register(
        root,
        CommandArgument::new("prepare")
            .help("prep fails")
            .executor(recorded(&trace, "prepare", Some(-1), 0, Some(0))),
    )
    .unwrap();
    tree.register(
        root,
        CommandArgument::new("purge")
            .help("done fails")
            .executor(recorded(&trace, "purge", None, 0, Some(1))),
    )
    .unwrap();

    let t = trace.clone();
    tree.register(
        root,
        CommandArgument::new("keyboard")
            .help("interrupted")
            .executor(
                CommandExecutor::new(|_| Err(CommandError::Interrupted)).with_done(move |_| {
                    record(&t, "keyboard:done");
                    Ok(0)
                }),
            ),
    )
    .unwrap();
    tree.register(
        root,
        CommandArgument::new("exception")
            .help("fails")
            .executor(CommandExecutor::new(|_| {
                Err(CommandError::Failed("exception".to_string()))
            })),
    )
    .unwrap();
    tree.register(
        root,
        CommandArgument::new("panic")
            .help("panics")
            .executor(CommandExecutor::new(|_| panic!("executor panicked"))),
    )
    .unwrap();

    Example { tree, trace }
}

// ============================================================
// Help and version
// ============================================================

#[rstest]
#[case(&["--help"])]
#[case(&["-h"])]
#[case(&["--version"])]
#[case(&["list", "--help"])]
#[case(&["list", "known", "-h"])]
fn given_help_or_version_when_run_then_ok_without_executing(
    example: Example,
    #[case] argv: &[&str],
) {
    let code = example.tree.run(argv.iter().copied());

    assert_eq!(code, exitcode::OK);
    assert!(
        example.events().is_empty(),
        "nothing should run: {:?}",
        example.events()
    );
}

// ============================================================
// Dispatch
// ============================================================

#[rstest]
fn given_no_subcommand_when_run_then_only_root_runs(example: Example) {
    let code = example.tree.run(["--stderr", "--debug"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(
        example.events(),
        vec!["example:prep", "example:main", "example:done"]
    );
}

#[rstest]
fn given_nested_subcommand_when_run_then_chain_runs_root_to_leaf(example: Example) {
    let code = example.tree.run(["list", "-a", "known"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(
        example.events(),
        vec![
            "example:prep",
            "example:main",
            "list:main",
            "known:main",
            "example:done"
        ]
    );
}

#[rstest]
fn given_subcommand_returning_status_when_run_then_status_is_result(example: Example) {
    assert_eq!(example.tree.run(["incomplete"]), -1);
    assert!(example.saw("example:done"));
}

#[rstest]
fn given_failing_prep_when_run_then_main_skipped_and_status_returned(example: Example) {
    let code = example.tree.run(["prepare", "--stdout", "--debug"]);

    assert_eq!(code, -1);
    assert!(example.saw("prepare:prep"));
    assert!(!example.saw("prepare:main"));
    assert!(!example.saw("prepare:done"));
}

#[rstest]
fn given_failing_done_when_run_then_done_status_overrides(example: Example) {
    let code = example.tree.run(["purge", "--stderr", "--debug"]);

    assert_eq!(code, 1);
    let events = example.events();
    let main = events.iter().position(|e| e == "purge:main").unwrap();
    let done = events.iter().position(|e| e == "purge:done").unwrap();
    assert!(main < done);
}

// ============================================================
// Exit code mapping
// ============================================================

#[rstest]
#[case(&["--bogus"])]
#[case(&["missing-command"])]
#[case(&["list", "--level", "loud"])]
fn given_parse_failure_when_run_then_not_found(example: Example, #[case] argv: &[&str]) {
    assert_eq!(example.tree.run(argv.iter().copied()), exitcode::NOT_FOUND);
    assert!(example.events().is_empty());
}

#[rstest]
fn given_interrupt_when_run_then_canceled_and_done_still_runs(example: Example) {
    let code = example.tree.run(["keyboard", "--stderr", "-d"]);

    assert_eq!(code, exitcode::CANCELED);
    assert!(example.saw("keyboard:done"));
}

#[rstest]
fn given_failure_when_run_then_not_recoverable_and_log_file_created(example: Example) {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("log.txt");

    let code = example
        .tree
        .run(["exception", "--log", log.to_str().unwrap()]);

    assert_eq!(code, exitcode::NOT_RECOVERABLE);
    assert!(log.exists(), "log file should be created");
}

#[rstest]
fn given_panic_when_run_then_not_recoverable(example: Example) {
    assert_eq!(example.tree.run(["panic"]), exitcode::NOT_RECOVERABLE);
}

#[rstest]
fn given_unopenable_log_path_when_run_then_not_recoverable_before_executing(example: Example) {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("missing-dir").join("log.txt");

    let code = example.tree.run(["--log", log.to_str().unwrap()]);

    assert_eq!(code, exitcode::NOT_RECOVERABLE);
    assert!(example.events().is_empty());
}

#[test]
fn given_child_flag_clashing_with_global_flag_when_run_then_not_found() {
    let mut tree = CommandTree::new(CommandArgument::new("prog"));
    let root = tree.root();
    tree.register(
        root,
        CommandArgument::new("sub").arguments(|cmd| {
            cmd.arg(
                Arg::new("dry")
                    .short('d')
                    .action(ArgAction::SetTrue),
            )
        }),
    )
    .unwrap();

    let code = tree.run(["sub"]);

    // clap rejects duplicate short flags only in debug builds
    if cfg!(debug_assertions) {
        assert_eq!(code, exitcode::NOT_FOUND);
    } else {
        assert_eq!(code, exitcode::OK);
    }
}

#[test]
fn given_panicking_argument_callback_when_run_then_not_found_without_executing() {
    let ran = Rc::new(RefCell::new(false));
    let r = ran.clone();
    let mut tree = CommandTree::new(CommandArgument::new("prog")).without_logger();
    let root = tree.root();
    tree.register(
        root,
        CommandArgument::new("broken")
            .arguments(|_| panic!("bad declaration"))
            .executor(CommandExecutor::new(move |_| {
                *r.borrow_mut() = true;
                Ok(0)
            })),
    )
    .unwrap();

    assert_eq!(tree.run(["broken"]), exitcode::NOT_FOUND);
    assert!(!*ran.borrow());
}

// ============================================================
// Subtree roots
// ============================================================

#[rstest]
fn given_subtree_root_when_run_from_then_dispatches_below_it(example: Example) {
    let root = example.tree.root();

    let code = example
        .tree
        .run_from(root, Some("example"), ["incomplete"]);

    assert_eq!(code, -1);
}

#[rstest]
fn given_inner_node_when_run_from_then_parent_hooks_skipped(example: Example) {
    let list = example.tree.find(&["list"]).unwrap();

    let code = example.tree.run_from(list, Some("example"), ["known"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(example.events(), vec!["list:main", "known:main"]);
}

#[test]
fn given_prog_override_when_run_from_then_context_sees_override() {
    let seen: Rc<RefCell<Option<String>>> = Rc::default();
    let s = seen.clone();
    let mut tree = CommandTree::new(CommandArgument::new("prog")).without_logger();
    let root = tree.root();
    let group = tree
        .register(
            root,
            CommandArgument::new("group").executor(CommandExecutor::new(move |ctx| {
                *s.borrow_mut() = Some(ctx.prog().to_string());
                Ok(0)
            })),
        )
        .unwrap();

    assert_eq!(tree.run_from(group, Some("example"), Vec::<String>::new()), exitcode::OK);
    assert_eq!(seen.borrow().as_deref(), Some("example"));
    assert_eq!(tree.run_from(group, None, ["--bogus"]), exitcode::NOT_FOUND);
}

// ============================================================
// Structure
// ============================================================

#[rstest]
fn given_example_when_walk_then_every_child_points_to_parent(example: Example) {
    let tree = &example.tree;
    let root = tree.root();
    assert!(tree.get(root).unwrap().bound().has_prep());
    assert!(tree.get(root).unwrap().bound().has_done());
    for &sub in tree.children(root) {
        assert_eq!(tree.parent(sub), Some(root));
        for &son in tree.children(sub) {
            assert_eq!(tree.parent(son), Some(sub));
            assert_eq!(tree.path(son).first(), Some(&"example"));
        }
    }
    assert!(tree.has_sub(root));
    assert!(!tree.has_sub(tree.find(&["purge"]).unwrap()));
}

#[rstest]
fn given_matched_subcommand_when_parse_then_global_flags_visible_at_root(example: Example) {
    let matches = example.tree.parse(["list", "--debug"]).unwrap();

    assert!(matches.get_flag("debug"));
    assert_eq!(matches.subcommand_name(), Some("list"));
}

#[test]
fn given_context_when_executing_then_sees_own_args_and_path() {
    // Arrange
    let seen: Rc<RefCell<Option<(Vec<String>, bool, String)>>> = Rc::default();
    let mut tree = CommandTree::new(CommandArgument::new("prog")).without_logger();
    let root = tree.root();
    let group = tree.register(root, CommandArgument::new("group")).unwrap();
    let s = seen.clone();
    tree.register(
        group,
        CommandArgument::new("leaf")
            .arguments(|cmd| {
                cmd.arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue),
                )
            })
            .executor(CommandExecutor::new(move |ctx| {
                *s.borrow_mut() = Some((
                    ctx.path().iter().map(ToString::to_string).collect(),
                    ctx.get_flag("force"),
                    ctx.prog().to_string(),
                ));
                Ok(0)
            })),
    )
    .unwrap();

    // Act
    let code = tree.run(["group", "leaf", "--force"]);

    // Assert
    assert_eq!(code, exitcode::OK);
    let (path, force, prog) = seen.borrow().clone().unwrap();
    assert_eq!(path, vec!["prog", "group", "leaf"]);
    assert!(force);
    assert_eq!(prog, "prog");
}

// ============================================================
// Logger toggle and cleanup failures
// ============================================================

#[test]
fn given_logger_disabled_when_run_then_no_logging_flags() {
    let tree = CommandTree::new(CommandArgument::new("quiet")).without_logger();

    assert!(!tree.logger_enabled());
    assert_eq!(tree.run(Vec::<String>::new()), exitcode::OK);
    assert_eq!(tree.run(["--debug"]), exitcode::NOT_FOUND);
}

#[test]
fn given_done_error_after_success_when_run_then_error_code() {
    let tree = CommandTree::new(CommandArgument::new("prog").executor(
        CommandExecutor::noop().with_done(|_| Err(CommandError::Failed("cleanup".to_string()))),
    ))
    .without_logger();

    assert_eq!(tree.run(Vec::<String>::new()), exitcode::NOT_RECOVERABLE);
}
