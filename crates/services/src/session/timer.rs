/// Lifecycle of the exam countdown.
///
/// `Running` only ever exists for exam sessions; practice sessions stay
/// `Idle` for their whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running { remaining_secs: u32 },
    Expired,
    Stopped,
}

/// Outcome of feeding one one-second tick to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Timer is not running; the tick was ignored.
    Inert,
    /// Still counting down.
    Running { remaining_secs: u32 },
    /// The countdown just ran out. Produced at most once per arming.
    Expired,
}

/// Countdown driven by discrete external ticks.
///
/// The timer never schedules anything itself: the caller delivers one tick
/// per elapsed second, matching the cooperative single-threaded model where
/// a tick and a user action never overlap. A tick arriving after `Stopped`
/// or `Expired` is inert, so a stale tick can never terminate a session
/// twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizTimer {
    state: TimerState,
}

impl QuizTimer {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Seconds left on the countdown, if it is running.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match self.state {
            TimerState::Running { remaining_secs } => Some(remaining_secs),
            _ => None,
        }
    }

    /// Start (or restart) the countdown with the given budget.
    ///
    /// Arming discards whatever state the timer was in, so only one
    /// countdown can ever be live for this handle.
    pub fn arm(&mut self, total_secs: u32) {
        self.state = TimerState::Running {
            remaining_secs: total_secs,
        };
    }

    /// Deliver one one-second tick.
    ///
    /// The countdown expires on the tick after the display reaches zero,
    /// so a timer armed with `n` seconds absorbs `n + 1` ticks.
    pub fn tick(&mut self) -> Tick {
        match self.state {
            TimerState::Running { remaining_secs } => {
                if remaining_secs == 0 {
                    self.state = TimerState::Expired;
                    Tick::Expired
                } else {
                    let remaining_secs = remaining_secs - 1;
                    self.state = TimerState::Running { remaining_secs };
                    Tick::Running { remaining_secs }
                }
            }
            TimerState::Idle | TimerState::Expired | TimerState::Stopped => Tick::Inert,
        }
    }

    /// Cancel the countdown (normal session completion).
    pub fn stop(&mut self) {
        if self.is_running() {
            self.state = TimerState::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_once() {
        let mut timer = QuizTimer::idle();
        timer.arm(2);

        assert_eq!(timer.tick(), Tick::Running { remaining_secs: 1 });
        assert_eq!(timer.tick(), Tick::Running { remaining_secs: 0 });
        assert_eq!(timer.tick(), Tick::Expired);

        // Late ticks after expiry are inert.
        assert_eq!(timer.tick(), Tick::Inert);
        assert_eq!(timer.tick(), Tick::Inert);
        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = QuizTimer::idle();
        assert_eq!(timer.tick(), Tick::Inert);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn stop_cancels_further_ticks() {
        let mut timer = QuizTimer::idle();
        timer.arm(60);
        assert_eq!(timer.tick(), Tick::Running { remaining_secs: 59 });

        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.tick(), Tick::Inert);
    }

    #[test]
    fn stop_when_not_running_is_a_no_op() {
        let mut timer = QuizTimer::idle();
        timer.stop();
        assert_eq!(timer.state(), TimerState::Idle);

        timer.arm(0);
        assert_eq!(timer.tick(), Tick::Expired);
        timer.stop();
        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[test]
    fn rearming_clears_prior_countdown() {
        let mut timer = QuizTimer::idle();
        timer.arm(1);
        assert_eq!(timer.tick(), Tick::Running { remaining_secs: 0 });

        timer.arm(10);
        assert_eq!(timer.remaining_secs(), Some(10));
        assert_eq!(timer.tick(), Tick::Running { remaining_secs: 9 });
    }
}
