//! Observer pattern for channel registries - pub/sub on transitions
//!
//! When an applied sample moves a channel across a transition, observers are
//! notified automatically. Consumers do not need to diff snapshots.
//!
//! ## Transitions
//!
//! - **Panel**: band membership view changed (equilibrium / out / returning)
//! - **Dominance**: the persisted dominant pole changed. Debounced by
//!   `min_dominance_ms`, so this fires rarely.
//! - **Strain**: left zero (activation) or returned to exactly zero (cleared)

use crate::accumulator::{AccumulatorState, Panel};
use crate::signal::Pole;
use std::sync::mpsc::Sender;

/// Event emitted when a channel crosses a transition
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelEvent {
    /// Panel classification changed
    PanelChanged {
        channel: String,
        from: Panel,
        to: Panel,
    },
    /// Persisted dominant pole changed
    DominanceChanged {
        channel: String,
        from: Option<Pole>,
        to: Option<Pole>,
    },
    /// Strain rose above zero
    StrainActivated { channel: String, strain: f64 },
    /// Strain decayed back to exactly zero
    StrainCleared { channel: String },
}

impl ChannelEvent {
    /// Channel the event belongs to.
    pub fn channel(&self) -> &str {
        match self {
            ChannelEvent::PanelChanged { channel, .. }
            | ChannelEvent::DominanceChanged { channel, .. }
            | ChannelEvent::StrainActivated { channel, .. }
            | ChannelEvent::StrainCleared { channel } => channel,
        }
    }

    /// Events implied by a channel moving from `prev` to `next`, in a fixed
    /// order: panel, dominance, strain.
    pub fn diff(channel: &str, prev: &AccumulatorState, next: &AccumulatorState) -> Vec<ChannelEvent> {
        let mut events = Vec::new();

        if prev.panel != next.panel {
            events.push(ChannelEvent::PanelChanged {
                channel: channel.to_owned(),
                from: prev.panel,
                to: next.panel,
            });
        }
        if prev.dominant != next.dominant {
            events.push(ChannelEvent::DominanceChanged {
                channel: channel.to_owned(),
                from: prev.dominant,
                to: next.dominant,
            });
        }
        if !prev.is_straining() && next.is_straining() {
            events.push(ChannelEvent::StrainActivated {
                channel: channel.to_owned(),
                strain: next.strain,
            });
        } else if prev.is_straining() && !next.is_straining() {
            events.push(ChannelEvent::StrainCleared {
                channel: channel.to_owned(),
            });
        }

        events
    }
}

/// Observer that receives channel events
pub trait ChannelObserver: Send + Sync {
    /// Called when a channel event occurs
    fn on_event(&self, event: &ChannelEvent);
}

/// Function-based observer for simple cases
pub struct FnObserver<F: Fn(&ChannelEvent) + Send + Sync>(pub F);

impl<F: Fn(&ChannelEvent) + Send + Sync> ChannelObserver for FnObserver<F> {
    fn on_event(&self, event: &ChannelEvent) {
        (self.0)(event);
    }
}

/// Channel-based observer - forwards events to an mpsc sender.
///
/// Holds the sender behind a mutex: `Sender` is not `Sync` on older
/// toolchains and observers must be.
pub struct SenderObserver {
    sender: std::sync::Mutex<Sender<ChannelEvent>>,
}

impl SenderObserver {
    pub fn new(sender: Sender<ChannelEvent>) -> Self {
        Self {
            sender: std::sync::Mutex::new(sender),
        }
    }
}

impl ChannelObserver for SenderObserver {
    fn on_event(&self, event: &ChannelEvent) {
        // A dropped receiver just means nobody is listening anymore
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(panel: Panel, dominant: Option<Pole>, strain: f64) -> AccumulatorState {
        AccumulatorState {
            panel,
            dominant,
            strain,
            ..AccumulatorState::initial()
        }
    }

    #[test]
    fn test_no_change_no_events() {
        let s = state(Panel::OutOfEquilibrium, Some(Pole::A), 0.2);
        assert!(ChannelEvent::diff("load", &s, &s.clone()).is_empty());
    }

    #[test]
    fn test_diff_order() {
        let prev = state(Panel::Equilibrium, None, 0.0);
        let next = state(Panel::OutOfEquilibrium, Some(Pole::B), 0.01);
        let events = ChannelEvent::diff("load", &prev, &next);

        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            ChannelEvent::PanelChanged {
                from: Panel::Equilibrium,
                to: Panel::OutOfEquilibrium,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            ChannelEvent::DominanceChanged {
                from: None,
                to: Some(Pole::B),
                ..
            }
        ));
        assert!(matches!(events[2], ChannelEvent::StrainActivated { .. }));
        assert!(events.iter().all(|e| e.channel() == "load"));
    }

    #[test]
    fn test_strain_cleared() {
        let prev = state(Panel::Returning, Some(Pole::A), 0.001);
        let next = state(Panel::Returning, Some(Pole::A), 0.0);
        assert_eq!(
            ChannelEvent::diff("load", &prev, &next),
            vec![ChannelEvent::StrainCleared {
                channel: "load".to_owned()
            }]
        );
    }

    #[test]
    fn test_sender_observer() {
        let (tx, rx) = std::sync::mpsc::channel();
        let observer = SenderObserver::new(tx);
        observer.on_event(&ChannelEvent::StrainCleared {
            channel: "x".to_owned(),
        });
        assert_eq!(rx.try_recv().map(|e| e.channel().to_owned()), Ok("x".to_owned()));

        drop(rx);
        // No panic once the receiver is gone
        observer.on_event(&ChannelEvent::StrainCleared {
            channel: "x".to_owned(),
        });
    }
}
