use super::*;
use crate::{
    backend_bridge::commands::BackendCommand,
    controller::orchestration::BridgeDispatcher,
    ui::terminal::RenderFormat,
};
use cascade::{CascadeText, InitialState, LookupCompletion, LookupTicket, UiMode};
use crossbeam_channel::{bounded, Receiver};
use shared::{domain::OptionRecord, error::LookupError};

type TestApp = FormApp<Vec<u8>, BridgeDispatcher>;

fn app_with(initial: InitialState) -> (TestApp, Receiver<BackendCommand>) {
    let (cmd_tx, cmd_rx) = bounded(16);
    let alerts = Arc::new(AlertContainer::default());
    let form = CascadeController::start(
        TerminalSurface::new(Vec::new(), RenderFormat::Text),
        BridgeDispatcher::new(cmd_tx),
        Some(Arc::clone(&alerts) as Arc<dyn cascade::AlertSink>),
        CascadeText::default(),
        initial,
    );
    (FormApp::new(form, alerts), cmd_rx)
}

fn app() -> (TestApp, Receiver<BackendCommand>) {
    app_with(InitialState::default())
}

fn next_ticket(cmd_rx: &Receiver<BackendCommand>) -> LookupTicket {
    match cmd_rx.try_recv().expect("lookup queued") {
        BackendCommand::Lookup(ticket) => ticket,
        BackendCommand::Shutdown => panic!("unexpected shutdown"),
    }
}

fn output(app: &TestApp) -> String {
    String::from_utf8(app.form().surface().output().clone()).expect("utf8")
}

fn input(app: &mut TestApp, line: &str) -> LoopControl {
    app.handle_event(UiEvent::Input(line.to_string()))
}

#[test]
fn full_flow_from_division_to_submission() {
    let (mut app, cmd_rx) = app();

    input(&mut app, "division 1");
    let ticket = next_ticket(&cmd_rx);
    assert_eq!(ticket.source.as_str(), "1");
    assert_eq!(app.form().mode(), UiMode::Loading);

    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket,
        result: Ok(vec![
            OptionRecord::new("7", "Ann Lee (ann)"),
            OptionRecord::new("9", "bob"),
        ]),
    }));
    assert_eq!(app.form().mode(), UiMode::Populated);

    input(&mut app, "admin 7");
    assert_eq!(input(&mut app, "submit"), LoopControl::Continue);

    assert_eq!(app.submissions(), &[("1".to_string(), "7".to_string())]);
    assert!(output(&app).contains("submitted division=1 admin=7"));
}

#[test]
fn prepopulated_edit_keeps_admin() {
    let (mut app, cmd_rx) = app_with(InitialState {
        source: "2".into(),
        dependent: "9".into(),
    });
    let ticket = next_ticket(&cmd_rx);

    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket,
        result: Ok(vec![OptionRecord::new("9", "bob")]),
    }));
    input(&mut app, "submit");

    assert_eq!(app.submissions(), &[("2".to_string(), "9".to_string())]);
}

#[test]
fn failed_lookup_prints_alert_once_and_records_error() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division 1");
    let ticket = next_ticket(&cmd_rx);

    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket,
        result: Err(LookupError::failed("connection refused")),
    }));
    input(&mut app, "help");

    let out = output(&app);
    assert_eq!(
        out.matches("[error] Error loading admins for selected division")
            .count(),
        1
    );
    let err = app.last_error().expect("recorded");
    assert_eq!(err.category(), crate::controller::events::UiErrorCategory::Transport);
    assert_eq!(app.form().mode(), UiMode::Error);
}

#[test]
fn stale_completion_is_dropped() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division 1");
    let stale = next_ticket(&cmd_rx);
    input(&mut app, "division 2");
    let fresh = next_ticket(&cmd_rx);

    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket: fresh,
        result: Ok(Vec::new()),
    }));
    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket: stale,
        result: Err(LookupError::failed("late")),
    }));

    assert_eq!(app.form().mode(), UiMode::Empty);
    assert!(app.last_error().is_none());
    assert!(!output(&app).contains("[error]"));
}

#[test]
fn blocked_submit_signals_and_focuses() {
    let (mut app, _cmd_rx) = app();
    input(&mut app, "submit");

    let out = output(&app);
    assert!(out.contains("! Please select a division first."));
    assert!(out.contains("focus -> division"));
    assert!(app.submissions().is_empty());
}

#[test]
fn unknown_admin_is_rejected() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division 1");
    let ticket = next_ticket(&cmd_rx);
    app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket,
        result: Ok(vec![OptionRecord::new("7", "Ann")]),
    }));

    input(&mut app, "admin 42");

    assert_eq!(app.form().dependent_value(), "");
    assert!(output(&app).contains("'42' is not an available admin"));
}

#[test]
fn clearing_division_needs_no_backend() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division");
    assert!(cmd_rx.try_recv().is_err());
    assert_eq!(app.form().mode(), UiMode::Unselected);
}

#[test]
fn loop_exits_on_quit_eof_and_fatal_errors() {
    let (mut app, _cmd_rx) = app();
    assert_eq!(input(&mut app, "quit"), LoopControl::Exit);
    assert_eq!(app.handle_event(UiEvent::InputClosed), LoopControl::Exit);

    let (mut app, _cmd_rx) = self::app();
    assert_eq!(
        app.handle_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::BackendStartup,
            "failed to build runtime"
        ))),
        LoopControl::Exit
    );
    assert_eq!(
        app.handle_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::Input,
            "failed to read stdin"
        ))),
        LoopControl::Continue
    );
}

#[test]
fn show_prints_status_and_render() {
    let (mut app, _cmd_rx) = app();
    input(&mut app, "show");
    let out = output(&app);
    assert!(out.contains("division="));
    assert!(out.contains("admin (disabled)"));
}

#[test]
fn closed_input_waits_for_pending_lookup() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division 1");
    let ticket = next_ticket(&cmd_rx);

    assert_eq!(app.handle_event(UiEvent::InputClosed), LoopControl::Continue);
    assert_eq!(app.form().mode(), UiMode::Loading);
    assert_eq!(
        app.handle_event(UiEvent::Info("Lookup worker ready".to_string())),
        LoopControl::Continue
    );

    let control = app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket,
        result: Ok(vec![OptionRecord::new("7", "Ann")]),
    }));

    assert_eq!(control, LoopControl::Exit);
    assert_eq!(app.form().mode(), UiMode::Populated);
    assert!(output(&app).contains("Ann"));
}

#[test]
fn closed_input_ignores_stale_completion_while_waiting() {
    let (mut app, cmd_rx) = app();
    input(&mut app, "division 1");
    let stale = next_ticket(&cmd_rx);
    input(&mut app, "division 2");
    let fresh = next_ticket(&cmd_rx);
    app.handle_event(UiEvent::InputClosed);

    let control = app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket: stale,
        result: Ok(Vec::new()),
    }));
    assert_eq!(control, LoopControl::Continue);

    let control = app.handle_event(UiEvent::LookupCompleted(LookupCompletion {
        ticket: fresh,
        result: Err(LookupError::failed("connection refused")),
    }));
    assert_eq!(control, LoopControl::Exit);
    assert_eq!(app.form().mode(), UiMode::Error);
}
