//! Window-system independent state behind the native surface.
//!
//! Which scripts a page needs, and which surface a loop wake-up belongs
//! to, do not depend on `winit` or `wry`, so they live here and are
//! tested without a display.
#![cfg_attr(not(feature = "wry-surface"), allow(dead_code))]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bridge;

/// Identifies one surface on the process-wide event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SurfaceId(u64);

impl SurfaceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopEvent {
    CallsQueued,
    PageLoadStarted,
    Exit,
}

/// Wake-up posted to the event loop on behalf of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoopSignal {
    target: SurfaceId,
    event: LoopEvent,
}

impl LoopSignal {
    pub(crate) fn new(target: SurfaceId, event: LoopEvent) -> Self {
        Self { target, event }
    }

    /// The event, if this signal was posted for `surface`.
    ///
    /// The loop outlives any one surface, so a signal sent by an earlier
    /// host can still be queued when the next one runs.
    pub(crate) fn for_surface(self, surface: SurfaceId) -> Option<LoopEvent> {
        (self.target == surface).then_some(self.event)
    }
}

/// Bridge script, then init scripts in the order added, then one stub per binding.
pub(crate) fn compose_init_script(init_scripts: &[String], bindings: &BTreeSet<String>) -> String {
    let mut script = String::from(bridge::BRIDGE_INIT_SCRIPT);
    for js in init_scripts {
        script.push_str(js);
        script.push('\n');
    }
    for name in bindings {
        script.push_str(&bridge::js_bind(name));
        script.push('\n');
    }
    script
}

/// Snapshot of what the view's built-in initialization script covers.
#[derive(Debug)]
struct Baked {
    init_count: usize,
    bindings: BTreeSet<String>,
}

/// Scripts a page needs over the lifetime of one view.
///
/// Before the view exists everything is staged. Once it is realized the
/// staged state is baked into the view's initialization script, later
/// changes are returned for immediate evaluation, and each new page gets
/// the difference between the current state and the baked one.
#[derive(Debug, Default)]
pub(crate) struct PageScripts {
    init_scripts: Vec<String>,
    bindings: BTreeSet<String>,
    deferred_evals: Vec<String>,
    baked: Option<Baked>,
}

impl PageScripts {
    pub(crate) fn is_baked(&self) -> bool {
        self.baked.is_some()
    }

    /// Record an init script. Returns it for the current page once baked.
    pub(crate) fn add_init(&mut self, js: &str) -> Option<String> {
        self.init_scripts.push(js.to_string());
        self.baked.as_ref().map(|_| js.to_string())
    }

    /// Record a binding. Returns its stub script for the current page once baked.
    pub(crate) fn bind(&mut self, name: &str) -> Option<String> {
        self.bindings.insert(name.to_string());
        self.baked.as_ref().map(|_| bridge::js_bind(name))
    }

    /// Drop a binding. Returns the removal script for the current page once baked.
    pub(crate) fn unbind(&mut self, name: &str) -> Option<String> {
        let removed = self.bindings.remove(name);
        (removed && self.is_baked()).then(|| bridge::js_unbind(name))
    }

    /// Hold `js` until the view exists.
    pub(crate) fn defer_eval(&mut self, js: &str) {
        self.deferred_evals.push(js.to_string());
    }

    /// Compose the view's initialization script and hand over the deferred
    /// evals. The current state becomes the baseline for page-load replay.
    pub(crate) fn bake(&mut self) -> (String, Vec<String>) {
        let script = compose_init_script(&self.init_scripts, &self.bindings);
        self.baked = Some(Baked {
            init_count: self.init_scripts.len(),
            bindings: self.bindings.clone(),
        });
        (script, std::mem::take(&mut self.deferred_evals))
    }

    /// Scripts that bring a freshly started page from the baked baseline
    /// to the current state.
    pub(crate) fn page_load_replay(&self) -> Vec<String> {
        let Some(baked) = &self.baked else {
            return Vec::new();
        };
        let mut scripts: Vec<String> = self.init_scripts[baked.init_count..].to_vec();
        scripts.extend(
            baked
                .bindings
                .difference(&self.bindings)
                .map(|name| bridge::js_unbind(name)),
        );
        scripts.extend(
            self.bindings
                .difference(&baked.bindings)
                .map(|name| bridge::js_bind(name)),
        );
        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn init_script_puts_bridge_first_and_bindings_last() {
        let script = compose_init_script(
            &["window.a = 1;".to_string(), "window.b = 2;".to_string()],
            &names(&["zeta", "alpha"]),
        );

        assert!(script.starts_with(bridge::BRIDGE_INIT_SCRIPT));
        let a = script.find("window.a = 1;").unwrap();
        let b = script.find("window.b = 2;").unwrap();
        let alpha = script.find(&bridge::js_bind("alpha")).unwrap();
        let zeta = script.find(&bridge::js_bind("zeta")).unwrap();
        assert!(a < b && b < alpha && alpha < zeta);
    }

    #[test]
    fn staged_changes_wait_for_the_view() {
        let mut scripts = PageScripts::default();
        assert_eq!(scripts.add_init("window.x = 1;"), None);
        assert_eq!(scripts.bind("add"), None);
        assert_eq!(scripts.unbind("add"), None);
        assert_eq!(scripts.bind("echo"), None);
        scripts.defer_eval("first()");
        scripts.defer_eval("second()");
        assert!(!scripts.is_baked());
        assert!(scripts.page_load_replay().is_empty());

        let (init, evals) = scripts.bake();

        assert!(init.contains("window.x = 1;"));
        assert!(init.contains(&bridge::js_bind("echo")));
        assert!(!init.contains(&bridge::js_bind("add")));
        assert_eq!(evals, vec!["first()".to_string(), "second()".to_string()]);
        assert!(scripts.page_load_replay().is_empty());
    }

    #[test]
    fn deferred_evals_are_handed_over_once() {
        let mut scripts = PageScripts::default();
        scripts.defer_eval("once()");

        let (_, first) = scripts.bake();
        let (_, second) = scripts.bake();

        assert_eq!(first, vec!["once()".to_string()]);
        assert!(second.is_empty());
    }

    #[test]
    fn changes_after_bake_run_now_and_on_each_page_load() {
        let mut scripts = PageScripts::default();
        scripts.bind("add");
        scripts.bake();

        assert_eq!(scripts.add_init("late()"), Some("late()".to_string()));
        assert_eq!(scripts.bind("echo"), Some(bridge::js_bind("echo")));
        assert_eq!(scripts.unbind("add"), Some(bridge::js_unbind("add")));

        assert_eq!(
            scripts.page_load_replay(),
            vec![
                "late()".to_string(),
                bridge::js_unbind("add"),
                bridge::js_bind("echo"),
            ]
        );
    }

    #[test]
    fn binding_churn_does_not_grow_the_replay() {
        let mut scripts = PageScripts::default();
        scripts.bind("stable");
        scripts.bake();

        for i in 0..500 {
            let name = format!("temp{}", i % 3);
            scripts.bind(&name);
            scripts.unbind(&name);
            scripts.unbind("stable");
            scripts.bind("stable");
        }

        assert!(scripts.page_load_replay().is_empty());
    }

    #[test]
    fn unbinding_an_unknown_name_produces_no_script() {
        let mut scripts = PageScripts::default();
        scripts.bake();
        assert_eq!(scripts.unbind("ghost"), None);
    }

    #[test]
    fn signals_route_to_their_own_surface() {
        let first = SurfaceId::next();
        let second = SurfaceId::next();
        assert_ne!(first, second);

        let stale = LoopSignal::new(first, LoopEvent::Exit);
        assert_eq!(stale.for_surface(second), None);
        assert_eq!(stale.for_surface(first), Some(LoopEvent::Exit));

        let queued = LoopSignal::new(second, LoopEvent::CallsQueued);
        assert_eq!(queued.for_surface(second), Some(LoopEvent::CallsQueued));
    }
}
