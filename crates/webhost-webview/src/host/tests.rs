use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::binding::Handler;
use crate::bridge::{Invocation, Reply};
use crate::error::{HandlerError, SurfaceError};
use crate::surface::{CallSink, HeadlessSurface, Rgba, SizeHint, SurfaceOp, SurfaceProbe, WindowSize};

fn headless() -> (WebviewHost<HeadlessSurface>, Rc<SurfaceProbe>) {
    let surface = HeadlessSurface::new(false);
    let probe = surface.probe();
    (WebviewHost::with_surface(surface), probe)
}

fn call(seq: &str, name: &str, args: &str) -> Invocation {
    Invocation::new(seq, name, args)
}

fn bind_add(host: &WebviewHost<HeadlessSurface>) {
    host.bind("add", |a: i64, b: i64| Ok::<_, String>(a + b))
        .unwrap();
}

fn failure_text(reply: &Reply) -> &str {
    match reply {
        Reply::Failure(message) => message,
        other => panic!("expected failure reply, got {other:?}"),
    }
}

// =========================================================================
// Dispatch
// =========================================================================

#[test]
fn bound_function_result_reaches_script() {
    let (host, probe) = headless();
    bind_add(&host);
    probe.push_call(call("1", "add", "[2,3]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("1"), vec![Reply::Success(json!(5))]);
    assert_eq!(probe.bound_names(), vec!["add".to_string()]);
}

#[test]
fn failing_handler_replies_then_ends_session() {
    let (host, probe) = headless();
    bind_add(&host);
    host.bind("fail", || Err::<(), _>("boom")).unwrap();
    probe.push_call(call("1", "fail", "[]"));
    probe.push_call(call("2", "add", "[1,1]"));
    probe.push_call(call("3", "add", "[2,2]"));

    host.run().unwrap();

    // Calls queued behind the failure are never dispatched, but still settled.
    assert_eq!(
        probe.replies(),
        vec![
            ("1".to_string(), Reply::Failure("boom".into())),
            ("2".to_string(), Reply::Failure("session terminated".into())),
            ("3".to_string(), Reply::Failure("session terminated".into())),
        ]
    );
    assert_eq!(probe.delivered_calls(), 1);
    assert_eq!(probe.pending_calls(), 0);
    assert_eq!(probe.terminate_count(), 1);
    assert_eq!(host.state(), RunState::Terminated);
}

#[test]
fn unknown_binding_is_rejected_and_session_continues() {
    let (host, probe) = headless();
    bind_add(&host);
    probe.push_call(call("1", "missing", "[]"));
    probe.push_call(call("2", "add", "[4,4]"));

    host.run().unwrap();

    let replies = probe.replies();
    assert_eq!(replies.len(), 2);
    assert_eq!(failure_text(&replies[0].1), "no binding named `missing`");
    assert_eq!(replies[1].1, Reply::Success(json!(8)));
    assert_eq!(probe.terminate_count(), 0);
}

#[test]
fn arity_mismatch_is_rejected() {
    let (host, probe) = headless();
    bind_add(&host);
    probe.push_call(call("1", "add", "[1]"));

    host.run().unwrap();

    let replies = probe.replies_for("1");
    assert_eq!(failure_text(&replies[0]), "`add` takes 2 argument(s), got 1");
}

#[test]
fn malformed_arguments_are_rejected() {
    let (host, probe) = headless();
    bind_add(&host);
    probe.push_call(call("1", "add", "{oops"));
    probe.push_call(call("2", "add", "null"));
    probe.push_call(call("3", "add", "[1,2]"));

    host.run().unwrap();

    for seq in ["1", "2"] {
        let replies = probe.replies_for(seq);
        assert!(failure_text(&replies[0]).starts_with("malformed arguments for `add`"));
    }
    assert_eq!(probe.replies_for("3"), vec![Reply::Success(json!(3))]);
}

#[test]
fn argument_of_wrong_type_is_rejected_without_terminating() {
    let (host, probe) = headless();
    bind_add(&host);
    probe.push_call(call("1", "add", r#"[1,"two"]"#));
    probe.push_call(call("2", "add", "[1,2]"));

    host.run().unwrap();

    let replies = probe.replies_for("1");
    assert!(failure_text(&replies[0]).starts_with("argument 1 of `add`"));
    assert_eq!(probe.replies_for("2"), vec![Reply::Success(json!(3))]);
    assert_eq!(probe.terminate_count(), 0);
}

#[test]
fn panicking_handler_is_contained() {
    let (host, probe) = headless();
    host.bind("explode", Handler::variadic(|_| panic!("kaboom")))
        .unwrap();
    probe.push_call(call("1", "explode", "[]"));

    host.run().unwrap();

    let replies = probe.replies_for("1");
    assert_eq!(failure_text(&replies[0]), "handler panicked: kaboom");
    assert_eq!(host.state(), RunState::Terminated);
    host.destroy().unwrap();
}

#[test]
fn every_call_gets_exactly_one_reply() {
    let (host, probe) = headless();
    bind_add(&host);
    host.bind("echo", Handler::variadic(|args| Ok(json!(args))))
        .unwrap();
    for (seq, name, args) in [
        ("a", "echo", "[1,2,3]"),
        ("b", "add", "[1]"),
        ("c", "nope", "[]"),
        ("d", "echo", "[]"),
    ] {
        probe.push_call(call(seq, name, args));
    }

    host.run().unwrap();

    for seq in ["a", "b", "c", "d"] {
        assert_eq!(probe.replies_for(seq).len(), 1, "seq {seq}");
    }
    assert_eq!(probe.replies_for("a"), vec![Reply::Success(json!([1, 2, 3]))]);
}

#[test]
fn rebinding_replaces_the_handler() {
    let (host, probe) = headless();
    host.bind("v", || Ok::<_, String>(1)).unwrap();
    host.bind("v", || Ok::<_, String>(2)).unwrap();
    probe.push_call(call("1", "v", "[]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("1"), vec![Reply::Success(json!(2))]);
    assert_eq!(host.binding_names(), vec!["v".to_string()]);
}

// =========================================================================
// Re-entrancy
// =========================================================================

#[test]
fn handler_can_terminate_through_controller() {
    let (host, probe) = headless();
    bind_add(&host);
    let ctl = host.controller();
    host.bind("quit", move || {
        ctl.terminate();
        Ok::<_, String>(true)
    })
    .unwrap();
    probe.push_call(call("1", "quit", "[]"));
    probe.push_call(call("2", "add", "[1,2]"));

    host.run().unwrap();

    assert_eq!(
        probe.replies(),
        vec![
            ("1".to_string(), Reply::Success(json!(true))),
            ("2".to_string(), Reply::session_terminated()),
        ]
    );
    assert_eq!(probe.pending_calls(), 0);
    assert_eq!(host.state(), RunState::Terminated);
}

#[test]
fn handler_can_bind_new_functions_while_running() {
    let (host, probe) = headless();
    let ctl = host.controller();
    host.bind("install", move || {
        ctl.bind("late", |x: i64| Ok::<_, String>(x * 10))
            .map_err(|e| e.to_string())?;
        Ok::<_, String>("installed")
    })
    .unwrap();
    probe.push_call(call("1", "install", "[]"));
    probe.push_call(call("2", "late", "[4]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("2"), vec![Reply::Success(json!(40))]);
    assert!(host.is_bound("late"));
    assert_eq!(probe.bound_names(), vec!["install".to_string(), "late".to_string()]);
}

#[test]
fn handler_can_unbind_itself_mid_call() {
    let (host, probe) = headless();
    let ctl = host.controller();
    host.bind("once", move || {
        ctl.unbind("once").map_err(|e| e.to_string())?;
        Ok::<_, String>("done")
    })
    .unwrap();
    probe.push_call(call("1", "once", "[]"));
    probe.push_call(call("2", "once", "[]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("1"), vec![Reply::Success(json!("done"))]);
    assert_eq!(failure_text(&probe.replies_for("2")[0]), "no binding named `once`");
    assert!(probe.bound_names().is_empty());
}

#[test]
fn handler_can_eval_through_controller() {
    let (host, probe) = headless();
    let ctl = host.controller();
    host.bind("ping", move || {
        ctl.eval("document.title = 'pong'").map_err(|e| e.to_string())?;
        Ok::<_, String>(())
    })
    .unwrap();
    probe.push_call(call("1", "ping", "[]"));

    host.run().unwrap();

    assert!(probe
        .ops()
        .contains(&SurfaceOp::Eval("document.title = 'pong'".into())));
    assert_eq!(probe.replies_for("1"), vec![Reply::Success(json!(null))]);
}

#[test]
fn destroy_from_inside_the_loop_is_refused() {
    let (host, probe) = headless();
    let host = Rc::new(host);
    let weak = Rc::downgrade(&host);
    host.bind("teardown", move || {
        let host = weak.upgrade().ok_or("host gone")?;
        host.destroy().map_err(|e| e.to_string())
    })
    .unwrap();
    probe.push_call(call("1", "teardown", "[]"));

    host.run().unwrap();

    assert_eq!(
        failure_text(&probe.replies_for("1")[0]),
        "cannot destroy the host while its run loop is active"
    );
    assert_eq!(host.state(), RunState::Terminated);
    host.destroy().unwrap();
    assert_eq!(probe.destroy_count(), 1);
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn window_close_moves_to_terminated() {
    let (host, probe) = headless();
    assert_eq!(host.state(), RunState::Created);
    assert!(!host.is_running());

    host.run().unwrap();

    assert_eq!(host.state(), RunState::Terminated);
    assert_eq!(probe.terminate_count(), 0);
}

#[test]
fn controller_sees_running_state_from_inside_a_handler() {
    let (host, probe) = headless();
    let ctl = host.controller();
    host.bind("state", move || Ok::<_, String>(ctl.is_running()))
        .unwrap();
    probe.push_call(call("1", "state", "[]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("1"), vec![Reply::Success(json!(true))]);
}

#[test]
fn terminate_before_run_skips_the_loop() {
    let (host, probe) = headless();
    bind_add(&host);
    host.terminate();
    assert_eq!(host.state(), RunState::Terminated);
    probe.push_call(call("1", "add", "[1,2]"));

    host.run().unwrap();

    assert_eq!(probe.delivered_calls(), 0);
    assert!(!probe.ops().contains(&SurfaceOp::Run));
    assert!(matches!(
        host.run(),
        Err(HostError::Lifecycle(LifecycleError::AlreadyRan))
    ));
}

#[test]
fn run_only_once() {
    let (host, _probe) = headless();
    host.run().unwrap();
    assert!(matches!(
        host.run(),
        Err(HostError::Lifecycle(LifecycleError::AlreadyRan))
    ));
}

#[test]
fn destroy_is_idempotent() {
    let (host, probe) = headless();
    bind_add(&host);
    host.bind("echo", Handler::variadic(|args| Ok(json!(args))))
        .unwrap();

    host.destroy().unwrap();
    host.destroy().unwrap();

    assert_eq!(probe.destroy_count(), 1);
    assert!(probe.bound_names().is_empty());
    assert!(host.binding_names().is_empty());
    assert_eq!(host.state(), RunState::Destroyed);
}

#[test]
fn operations_after_destroy_fail() {
    let (host, probe) = headless();
    host.destroy().unwrap();

    assert!(matches!(
        host.set_title("late"),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "set_title" }))
    ));
    assert!(matches!(
        host.get_x(),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "get_x" }))
    ));
    assert!(matches!(
        host.bind("x", || Ok::<_, String>(())),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "bind" }))
    ));
    assert!(matches!(
        host.run(),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "run" }))
    ));
    host.terminate();
    assert_eq!(host.state(), RunState::Destroyed);
    assert_eq!(probe.ops(), vec![SurfaceOp::Destroy]);
}

#[test]
fn dropping_the_host_destroys_it() {
    let (host, probe) = headless();
    bind_add(&host);
    let ctl = host.controller();

    drop(host);

    assert_eq!(probe.destroy_count(), 1);
    assert!(probe.bound_names().is_empty());
    assert_eq!(ctl.state(), RunState::Destroyed);
    assert!(matches!(
        ctl.eval("1"),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "eval" }))
    ));
}

#[test]
fn controller_reports_destroyed_host() {
    let (host, _probe) = headless();
    let ctl = host.controller();
    host.destroy().unwrap();

    assert_eq!(ctl.state(), RunState::Destroyed);
    assert!(matches!(
        ctl.navigate("about:blank"),
        Err(HostError::Lifecycle(LifecycleError::Destroyed { op: "navigate" }))
    ));
}

// =========================================================================
// Construction and setters
// =========================================================================

struct Unavailable;

impl NativeSurface for Unavailable {
    fn create(_debug: bool) -> Result<Self, SurfaceError> {
        Err(SurfaceError::Create("no display".into()))
    }
    fn set_title(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn show(&self, _: bool) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn hide_from_dock(&self, _: bool) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn set_pos(&self, _: i32, _: i32) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn get_x(&self) -> i32 {
        0
    }
    fn set_bg(&self, _: Rgba) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn set_size(&self, _: WindowSize) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn navigate(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn eval(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn init(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn bind(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn unbind(&self, _: &str) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn respond(&self, _: &str, _: &Reply) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn run(&self, _: &dyn CallSink) -> Result<(), SurfaceError> {
        Ok(())
    }
    fn terminate(&self) {}
    fn destroy(&self) {}
}

#[test]
fn construction_failure_is_reported() {
    let err = WebviewHost::<Unavailable>::new(true).err().unwrap();
    assert!(matches!(err, HostError::Construction(SurfaceError::Create(_))));
    assert_eq!(
        err.to_string(),
        "failed to construct native surface: surface creation failed: no display"
    );
}

#[test]
fn new_passes_debug_flag_to_surface() {
    let host = WebviewHost::<HeadlessSurface>::new(true).unwrap();
    assert!(host.surface().unwrap().debug());
}

#[test]
fn options_apply_in_order() {
    let options = HostOptions {
        title: Some("demo".into()),
        position: Some((10, 20)),
        size: Some(WindowSize::new(640, 480).with_hint(SizeHint::Fixed)),
        background: Some(Rgba::new(0.0, 0.0, 0.0, 1.0)),
        init_scripts: vec!["window.ready = true".into()],
        visible: Some(true),
        hide_from_dock: true,
        ..HostOptions::default().with_url("https://example.com")
    };

    let host = WebviewHost::<HeadlessSurface>::with_options(&options).unwrap();
    let probe = host.surface().unwrap().probe();

    assert_eq!(
        probe.ops(),
        vec![
            SurfaceOp::SetTitle("demo".into()),
            SurfaceOp::SetSize(WindowSize::new(640, 480).with_hint(SizeHint::Fixed)),
            SurfaceOp::SetPos(10, 20),
            SurfaceOp::SetBg(Rgba::new(0.0, 0.0, 0.0, 1.0)),
            SurfaceOp::Init("window.ready = true".into()),
            SurfaceOp::Navigate("https://example.com".into()),
            SurfaceOp::HideFromDock(true),
            SurfaceOp::Show(true),
        ]
    );
    assert_eq!(host.get_x().unwrap(), 10);
}

#[test]
fn empty_options_touch_nothing() {
    let host = WebviewHost::<HeadlessSurface>::with_options(&HostOptions::default()).unwrap();
    assert!(host.surface().unwrap().probe().ops().is_empty());
}

#[test]
fn set_bg_rejects_out_of_range_channels() {
    let (host, probe) = headless();
    match host.set_bg(Rgba::new(0.5, 1.5, 0.0, 1.0)) {
        Err(HostError::InvalidColor { channel, value }) => {
            assert_eq!(channel, "g");
            assert_eq!(value, 1.5);
        }
        other => panic!("expected InvalidColor, got {other:?}"),
    }
    assert!(probe.ops().is_empty());

    host.set_bg(Rgba::new(1.0, 1.0, 1.0, 0.0)).unwrap();
    assert_eq!(probe.ops().len(), 1);
}

#[test]
fn bind_rejects_unusable_names() {
    let (host, probe) = headless();
    for name in ["", "  ", "__webhost__", "a\nb"] {
        assert!(
            matches!(
                host.bind(name, || Ok::<_, String>(())),
                Err(HostError::InvalidBindingName(_))
            ),
            "{name:?}"
        );
    }
    assert!(probe.bound_names().is_empty());
}

#[test]
fn unbind_unknown_name_is_a_no_op() {
    let (host, probe) = headless();
    host.unbind("ghost").unwrap();
    assert!(probe.ops().is_empty());
}

#[test]
fn script_primitives_are_forwarded() {
    let (host, probe) = headless();
    host.init("window.a = 1").unwrap();
    host.navigate("data:text/html,hi").unwrap();
    host.eval("window.a += 1").unwrap();
    host.show(false).unwrap();

    assert_eq!(
        probe.ops(),
        vec![
            SurfaceOp::Init("window.a = 1".into()),
            SurfaceOp::Navigate("data:text/html,hi".into()),
            SurfaceOp::Eval("window.a += 1".into()),
            SurfaceOp::Show(false),
        ]
    );
}

#[test]
fn handler_error_type_converts_into_failure_text() {
    let (host, probe) = headless();
    host.bind("strict", Handler::with_arity(1, |_| Err(HandlerError::new("nope"))))
        .unwrap();
    probe.push_call(call("1", "strict", "[0]"));

    host.run().unwrap();

    assert_eq!(probe.replies_for("1"), vec![Reply::Failure("nope".into())]);
}
