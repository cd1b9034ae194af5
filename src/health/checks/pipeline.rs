//! End-to-end gesture pipeline check

use std::cell::RefCell;
use std::rc::Rc;

use crate::gesture::{
    Engine, EngineOptions, EventCategory, GestureEvent, KeyEvent, Mode, RawEvent, RecordingHost,
    ScrollOffsets, TargetId, TouchEvent, TouchPhase, TouchPoint, Vec2, WheelEvent,
};
use crate::health::check::{CheckResult, SystemCheck};

const CONTAINER: TargetId = TargetId(0);
const VIEWPORT_HEIGHT: f32 = 600.0;

type Captured = Rc<RefCell<Vec<GestureEvent>>>;

/// Feeds scripted input through an engine over a recording host
pub struct PipelineCheck;

impl PipelineCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PipelineCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn capture(engine: &mut Engine<RecordingHost>) -> Result<Captured, String> {
    let seen: Captured = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine
        .on(move |event: &GestureEvent| sink.borrow_mut().push(event.clone()))
        .map_err(|e| e.to_string())?;
    Ok(seen)
}

fn verify(
    details: &mut Vec<String>,
    what: &str,
    got: Option<(EventCategory, Vec2)>,
    want: (EventCategory, Vec2),
) -> bool {
    let ok = got == Some(want);
    let mark = if ok { "✓" } else { "✗" };
    details.push(format!("{mark} {what}: got {got:?}, want {want:?}"));
    ok
}

fn last(seen: &Captured) -> Option<(EventCategory, Vec2)> {
    seen.borrow().last().map(|e| (e.category, e.delta))
}

fn virtual_pipeline(details: &mut Vec<String>) -> Result<bool, String> {
    let options = EngineOptions::new(Mode::Virtual, CONTAINER);
    let mut engine =
        Engine::new(options, RecordingHost::new(VIEWPORT_HEIGHT)).map_err(|e| e.to_string())?;
    let seen = capture(&mut engine)?;
    let mut ok = true;

    engine.handle_event(CONTAINER, RawEvent::Wheel(WheelEvent::lines(0.0, 1.0)));
    ok &= verify(
        details,
        "wheel line",
        last(&seen),
        (EventCategory::Wheel, Vec2::new(0.0, 28.0)),
    );

    engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(32)));
    ok &= verify(
        details,
        "space",
        last(&seen),
        (EventCategory::Keys, Vec2::new(0.0, VIEWPORT_HEIGHT)),
    );

    let touch = |phase, x, y, t| {
        RawEvent::Touch(TouchEvent::single(phase, TouchPoint::new(1, x, y), t))
    };
    engine.handle_event(CONTAINER, touch(TouchPhase::Start, 100.0, 100.0, 0.0));
    engine.handle_event(CONTAINER, touch(TouchPhase::Move, 90.0, 80.0, 16.0));
    ok &= verify(
        details,
        "touch drag",
        last(&seen),
        (EventCategory::Touch, Vec2::new(10.0, 20.0)),
    );

    engine.handle_event(CONTAINER, touch(TouchPhase::End, 90.0, 80.0, 20.0));
    let momentum = engine.touch_state().momentum;
    ok &= verify(
        details,
        "touch fling",
        last(&seen),
        (EventCategory::Touch, momentum),
    );

    engine.off();
    let leaked = engine.host().subscription_count();
    if leaked > 0 {
        details.push(format!("✗ {leaked} listeners left after off()"));
        ok = false;
    } else {
        details.push("✓ all listeners removed by off()".to_string());
    }

    Ok(ok)
}

fn native_pipeline(details: &mut Vec<String>) -> Result<bool, String> {
    let mut host = RecordingHost::new(VIEWPORT_HEIGHT);
    host.set_scroll_offsets(CONTAINER, ScrollOffsets::page(Vec2::ZERO));
    let mut engine = Engine::new(EngineOptions::new(Mode::Native, CONTAINER), host)
        .map_err(|e| e.to_string())?;
    let seen = capture(&mut engine)?;
    let mut ok = true;

    for (offset, want) in [(120.0, 120.0), (150.0, 30.0)] {
        engine
            .host_mut()
            .set_scroll_offsets(CONTAINER, ScrollOffsets::page(Vec2::new(0.0, offset)));
        engine.handle_event(CONTAINER, RawEvent::Scroll);
        ok &= verify(
            details,
            &format!("scroll to {offset}"),
            last(&seen),
            (EventCategory::Scroll, Vec2::new(0.0, want)),
        );
    }

    Ok(ok)
}

impl SystemCheck for PipelineCheck {
    fn name(&self) -> &'static str {
        "Gesture Pipeline"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Drives wheel, key, touch and scroll samples through the engine")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let outcome = virtual_pipeline(&mut details)
            .and_then(|v| native_pipeline(&mut details).map(|n| v && n));

        match outcome {
            Ok(true) => CheckResult::pass("normalized deltas match").with_details(details),
            Ok(false) => CheckResult::fail("unexpected deltas").with_details(details),
            Err(e) => CheckResult::fail(format!("engine setup failed: {e}")).with_details(details),
        }
    }
}
