//! End-to-end hotkey scenarios driven through the public engine API

use std::collections::HashMap;

use rdev::Key;
use tokio::sync::mpsc;
use zdtrans_daemon::hotkey::{HotkeyEngine, KeySet, RawKeyEvent, RecorderState};
use zdtrans_daemon::EngineEvent;

fn translator_engine() -> (HotkeyEngine, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel(32);
    let bindings = HashMap::from([
        ("translate".to_owned(), KeySet::parse("Ctrl+Q")),
        ("polish".to_owned(), KeySet::parse("Ctrl+Shift+Q")),
    ]);
    (HotkeyEngine::new(bindings, tx), rx)
}

fn press(engine: &HotkeyEngine, key: Key) {
    engine.handle(RawKeyEvent::Press(key));
}

fn release(engine: &HotkeyEngine, key: Key) {
    engine.handle(RawKeyEvent::Release(key));
}

fn drain(rx: &mut mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn action(name: &str) -> EngineEvent {
    EngineEvent::ActionTriggered {
        action: name.to_owned(),
    }
}

#[test]
fn test_translate_then_polish_without_spurious_translate() {
    let (engine, mut rx) = translator_engine();

    press(&engine, Key::ControlLeft);
    press(&engine, Key::KeyQ);
    assert_eq!(drain(&mut rx), vec![action("translate")]);

    release(&engine, Key::KeyQ);
    press(&engine, Key::ShiftLeft);
    press(&engine, Key::KeyQ);
    assert_eq!(drain(&mut rx), vec![action("polish")]);
}

#[test]
fn test_longer_combo_pressed_directly_fires_only_polish() {
    let (engine, mut rx) = translator_engine();

    press(&engine, Key::ControlLeft);
    press(&engine, Key::ShiftRight);
    press(&engine, Key::KeyQ);

    assert_eq!(drain(&mut rx), vec![action("polish")]);
}

#[test]
fn test_held_combo_with_key_repeat_fires_once() {
    let (engine, mut rx) = translator_engine();

    press(&engine, Key::ControlLeft);
    for _ in 0..20 {
        press(&engine, Key::KeyQ);
    }
    assert_eq!(drain(&mut rx), vec![action("translate")]);

    release(&engine, Key::KeyQ);
    press(&engine, Key::KeyQ);
    assert_eq!(drain(&mut rx), vec![action("translate")]);
}

#[test]
fn test_synthesized_copy_while_holding_hotkey_does_not_refire() {
    let (engine, mut rx) = translator_engine();

    press(&engine, Key::ControlLeft);
    press(&engine, Key::KeyQ);
    drain(&mut rx);

    // The copy shortcut injected by selection capture passes through the hook
    press(&engine, Key::ControlLeft);
    press(&engine, Key::KeyC);
    release(&engine, Key::KeyC);

    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_stray_release_keeps_state() {
    let (engine, mut rx) = translator_engine();

    release(&engine, Key::KeyZ);
    release(&engine, Key::ControlRight);
    assert!(engine.pressed_keys().is_empty());

    press(&engine, Key::ControlRight);
    press(&engine, Key::KeyQ);
    assert_eq!(drain(&mut rx), vec![action("translate")]);
}

#[test]
fn test_recording_session_with_rejection() {
    let (engine, mut rx) = translator_engine();
    engine.start_recording();

    press(&engine, Key::KeyQ);
    release(&engine, Key::KeyQ);
    assert_eq!(engine.recorder_state(), RecorderState::Recording);

    press(&engine, Key::ControlLeft);
    press(&engine, Key::ShiftLeft);
    press(&engine, Key::KeyQ);
    release(&engine, Key::KeyQ);

    let events = drain(&mut rx);
    assert_eq!(events[1], EngineEvent::ComboRejected);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::ComboRecorded {
            combo: "Ctrl+Shift+Q".to_owned()
        })
    );
    // Existing hotkeys never fired while recording
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::ActionTriggered { .. })));
}

#[test]
fn test_recorded_combo_becomes_binding() {
    let (engine, mut rx) = translator_engine();
    engine.start_recording();
    press(&engine, Key::Alt);
    press(&engine, Key::KeyT);
    release(&engine, Key::KeyT);
    release(&engine, Key::Alt);

    let recorded = drain(&mut rx)
        .into_iter()
        .find_map(|event| match event {
            EngineEvent::ComboRecorded { combo } => Some(combo),
            _ => None,
        })
        .unwrap();
    assert_eq!(recorded, "Alt+T");

    engine.update_bindings(HashMap::from([(
        "translate".to_owned(),
        KeySet::parse(&recorded),
    )]));
    press(&engine, Key::Alt);
    press(&engine, Key::KeyT);

    let fired = tokio_test::block_on(rx.recv());
    assert_eq!(fired, Some(action("translate")));
}

#[test]
fn test_recorded_keypad_plus_keeps_its_key() {
    let (engine, mut rx) = translator_engine();
    engine.start_recording();
    press(&engine, Key::ControlLeft);
    press(&engine, Key::KpPlus);
    release(&engine, Key::KpPlus);
    release(&engine, Key::ControlLeft);

    let recorded = drain(&mut rx)
        .into_iter()
        .find_map(|event| match event {
            EngineEvent::ComboRecorded { combo } => Some(combo),
            _ => None,
        })
        .unwrap();
    assert_eq!(recorded, "Ctrl+Plus");
    assert_eq!(KeySet::parse(&recorded).len(), 2);

    engine.update_bindings(HashMap::from([(
        "translate".to_owned(),
        KeySet::parse(&recorded),
    )]));

    // Ctrl alone must stay free for other shortcuts
    press(&engine, Key::ControlLeft);
    assert!(drain(&mut rx).is_empty());

    press(&engine, Key::KpPlus);
    assert_eq!(drain(&mut rx), vec![action("translate")]);
}
