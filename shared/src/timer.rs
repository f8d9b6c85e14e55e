//! Elapsed-cycle request timer.
//!
//! The sub-reducer only counts ticks. Wrapping at the end of the cycle and
//! the fetch/post decisions belong to [`crate::App`].

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::action::{Action, TimerAction};
use crate::effect::Effect;
use crate::model::RequestTimerState;

pub fn reduce(state: &mut RequestTimerState, action: TimerAction) -> Vec<Effect> {
    match action {
        TimerAction::StartTimer => {
            state.is_timer_active = true;
            vec![Effect::StartTimer]
        }
        TimerAction::TimerTicked => {
            state.seconds_elapsed += 1;
            Vec::new()
        }
    }
}

/// Spawn the tick source. Ticks stop once the receiving side is gone.
pub fn spawn_ticker(period: Duration, sender: UnboundedSender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if sender.send(Action::Timer(TimerAction::TimerTicked)).is_err() {
                debug!("ticker stopped, receiver closed");
                break;
            }
        }
    })
}
