//! Active-scene ownership and the transition lifecycle.

use anyhow::{Context, Result};
use foxkit_core::Canvas;

use crate::input::{EventResult, InputEvent};
use crate::scene::{Scene, SceneServices};
use crate::scene_db::SceneDB;

/// Holds the single active scene and applies queued transitions at frame
/// boundaries.
///
/// Scene errors during dispatch, update, or draw are logged and contained;
/// only a failure while activating the very first scene is fatal, because
/// there is nothing to fall back to.
pub struct SceneManager {
    db: SceneDB,
    active: Option<ActiveScene>,
    pending: Option<String>,
    activated_once: bool,
}

struct ActiveScene {
    name: String,
    scene: Box<dyn Scene>,
}

impl SceneManager {
    pub fn new(db: SceneDB) -> SceneManager {
        SceneManager {
            db,
            active: None,
            pending: None,
            activated_once: false,
        }
    }

    pub fn db(&self) -> &SceneDB {
        &self.db
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a transition. Does not swap immediately; the scene currently
    /// being dispatched stays alive until the frame boundary. A second
    /// request in the same frame overwrites the first.
    pub fn request_transition(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Some(prev) = &self.pending {
            log::debug!("transition to `{prev}` superseded by `{name}`");
        }
        self.pending = Some(name);
    }

    /// Apply the pending transition, if any. Called once per frame, after
    /// event dispatch.
    ///
    /// An unknown target or a failing `on_enter` is fatal only when no
    /// scene has ever been active; afterwards it is logged and the frame
    /// loop continues.
    pub fn apply_pending(&mut self, services: &mut SceneServices<'_>) -> Result<()> {
        let Some(name) = self.pending.take() else {
            return Ok(());
        };

        let mut next = match self.db.create(&name) {
            Ok(scene) => scene,
            Err(err) => {
                if !self.activated_once {
                    return Err(err).context("initial scene activation failed");
                }
                log::error!("transition aborted: {err}");
                return Ok(());
            }
        };

        if let Some(mut outgoing) = self.active.take() {
            if let Err(err) = outgoing.scene.on_exit(services) {
                log::error!("scene `{}` on_exit failed: {err:#}", outgoing.name);
            }
        }

        if let Err(err) = next.on_enter(services) {
            if !self.activated_once {
                return Err(err).context(format!("scene `{name}` failed to activate"));
            }
            // The outgoing scene is already gone; keep the new one active
            // in whatever state it reached.
            log::error!("scene `{name}` on_enter failed: {err:#}");
        }

        log::info!("scene `{name}` active");
        self.active = Some(ActiveScene { name, scene: next });
        self.activated_once = true;
        Ok(())
    }

    /// Forward one input event to the active scene.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        services: &mut SceneServices<'_>,
    ) -> EventResult {
        let Some(active) = &mut self.active else {
            return EventResult::Ignored;
        };
        match active.scene.handle_event(event, services) {
            Ok(result) => result,
            Err(err) => {
                log::error!("scene `{}` event handling failed: {err:#}", active.name);
                EventResult::Ignored
            }
        }
    }

    pub fn update(&mut self, dt: f32, services: &mut SceneServices<'_>) {
        if let Some(active) = &mut self.active {
            if let Err(err) = active.scene.update(dt, services) {
                log::error!("scene `{}` update failed: {err:#}", active.name);
            }
        }
    }

    pub fn draw(&mut self, canvas: &mut Canvas, services: &mut SceneServices<'_>) {
        if let Some(active) = &mut self.active {
            if let Err(err) = active.scene.draw(canvas, services) {
                log::error!("scene `{}` draw failed: {err:#}", active.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Harness;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        enters: usize,
        exits: usize,
    }

    struct Probe {
        counters: Rc<RefCell<Counters>>,
        fail_enter: bool,
    }

    impl Scene for Probe {
        fn on_enter(&mut self, _services: &mut SceneServices<'_>) -> Result<()> {
            self.counters.borrow_mut().enters += 1;
            if self.fail_enter {
                return Err(anyhow!("boom"));
            }
            Ok(())
        }
        fn on_exit(&mut self, _services: &mut SceneServices<'_>) -> Result<()> {
            self.counters.borrow_mut().exits += 1;
            Ok(())
        }
        fn handle_event(
            &mut self,
            _event: &InputEvent,
            _services: &mut SceneServices<'_>,
        ) -> Result<EventResult> {
            Ok(EventResult::Ignored)
        }
        fn update(&mut self, _dt: f32, _services: &mut SceneServices<'_>) -> Result<()> {
            Ok(())
        }
        fn draw(&mut self, _canvas: &mut Canvas, _services: &mut SceneServices<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn probe_db(
        fail_main_enter: bool,
    ) -> (SceneDB, Rc<RefCell<Counters>>, Rc<RefCell<Counters>>) {
        let title = Rc::new(RefCell::new(Counters::default()));
        let main = Rc::new(RefCell::new(Counters::default()));
        let mut db = SceneDB::new();
        let t = title.clone();
        db.register("title", move || {
            Box::new(Probe {
                counters: t.clone(),
                fail_enter: false,
            })
        })
        .unwrap();
        let m = main.clone();
        db.register("main", move || {
            Box::new(Probe {
                counters: m.clone(),
                fail_enter: fail_main_enter,
            })
        })
        .unwrap();
        (db, title, main)
    }

    #[test]
    fn transition_runs_exit_then_enter_exactly_once() {
        let (db, title, main) = probe_db(false);
        let mut harness = Harness::new();
        let mut manager = SceneManager::new(db);

        manager.request_transition("title");
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), Some("title"));
        assert_eq!(title.borrow().enters, 1);

        manager.request_transition("main");
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), Some("main"));
        assert_eq!(title.borrow().exits, 1);
        assert_eq!(main.borrow().enters, 1);
        assert_eq!(main.borrow().exits, 0);
    }

    #[test]
    fn last_transition_request_in_a_frame_wins() {
        let (db, title, main) = probe_db(false);
        let mut harness = Harness::new();
        let mut manager = SceneManager::new(db);

        manager.request_transition("title");
        manager.request_transition("main");
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), Some("main"));
        assert_eq!(title.borrow().enters, 0);
        assert_eq!(main.borrow().enters, 1);
    }

    #[test]
    fn unknown_target_before_first_activation_is_fatal() {
        let (db, _, _) = probe_db(false);
        let mut harness = Harness::new();
        let mut manager = SceneManager::new(db);

        manager.request_transition("missing");
        assert!(manager.apply_pending(&mut harness.services()).is_err());
    }

    #[test]
    fn unknown_target_after_activation_keeps_active_scene() {
        let (db, _, _) = probe_db(false);
        let mut harness = Harness::new();
        let mut manager = SceneManager::new(db);

        manager.request_transition("title");
        manager.apply_pending(&mut harness.services()).unwrap();
        manager.request_transition("missing");
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), Some("title"));
    }

    #[test]
    fn failing_first_enter_is_fatal_but_later_failures_are_contained() {
        let (db, _, main) = probe_db(true);
        let mut harness = Harness::new();

        // First activation fails hard.
        let mut manager = SceneManager::new(db);
        manager.request_transition("main");
        assert!(manager.apply_pending(&mut harness.services()).is_err());
        assert_eq!(main.borrow().enters, 1);

        // Same registry, but activate a good scene first.
        let (db, _, main) = probe_db(true);
        let mut manager = SceneManager::new(db);
        manager.request_transition("title");
        manager.apply_pending(&mut harness.services()).unwrap();
        manager.request_transition("main");
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), Some("main"));
        assert_eq!(main.borrow().enters, 1);
    }

    #[test]
    fn no_pending_transition_is_a_no_op() {
        let (db, title, _) = probe_db(false);
        let mut harness = Harness::new();
        let mut manager = SceneManager::new(db);
        manager.apply_pending(&mut harness.services()).unwrap();
        assert_eq!(manager.active_name(), None);
        assert_eq!(title.borrow().enters, 0);
    }
}
