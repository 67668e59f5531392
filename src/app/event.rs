//! Terminal input, forwarded from a polling task so the main loop can
//! `select!` over keys, ticks and request results together.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing happened for one tick; advances the spinner.
    Tick,
}

fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        // Release events arrive on some platforms; only presses act.
        CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Spawn the reader.  It stops once the receiver is dropped.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll/read block, so keep them off the async workers.
    tokio::task::spawn_blocking(move || loop {
        let next = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(ev) => match translate(ev) {
                    Some(app_event) => app_event,
                    None => continue,
                },
                Err(_) => continue,
            },
            Ok(false) | Err(_) => AppEvent::Tick,
        };
        if tx.send(next).is_err() {
            break;
        }
    });

    rx
}
