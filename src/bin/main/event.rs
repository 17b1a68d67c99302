//! The terminal events handler.
//!
//! A background thread polls the terminal for input and forwards it through a channel, interleaved with ticks emitted
//! at a fixed rate.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// Terminal events.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Emitted every time the tick rate elapses.
    Tick,
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The new width and height of the terminal.
    Resize(u16, u16),
}

#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Spawns the polling thread. The tick rate is in milliseconds.
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::channel();

        let handler = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(tick_rate);

                let polled = match event::poll(timeout) {
                    Ok(true) => event::read().map(Some),
                    Ok(false) => Ok(None),
                    Err(err) => Err(err),
                };

                let forwarded = match polled {
                    // only presses, some platforms report releases as well
                    Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        sender.send(Event::Key(key))
                    }
                    Ok(Some(CrosstermEvent::Mouse(mouse))) => sender.send(Event::Mouse(mouse)),
                    Ok(Some(CrosstermEvent::Resize(w, h))) => sender.send(Event::Resize(w, h)),
                    Ok(_) => Ok(()),
                    Err(err) => {
                        warn!(%err, "couldn't read a terminal event");
                        break;
                    }
                };

                // the receiving side is gone, nobody's listening anymore
                if forwarded.is_err() {
                    break;
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        break;
                    }

                    last_tick = Instant::now();
                }
            }
        });

        EventHandler { receiver, handler }
    }

    /// Blocks until the next event arrives.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}
