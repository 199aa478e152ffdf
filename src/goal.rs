//! A listening goal: a countdown of reading time the user sets for a session.
//!
//! The timer has no clock of its own. The host calls [`ReadingGoal::tick`] once per second.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};
use tracing::info;

use crate::{Error, Result};

/// The longest goal accepted, in minutes (24 hours).
pub const MAX_GOAL_MINUTES: u32 = 1440;

/// Where a [`ReadingGoal`] stands.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[allow(missing_docs)]
pub enum GoalStatus {
    Idle,
    Running,
    Paused,
    Achieved,
}

/// Tracks progress towards a listening goal.
#[derive(Debug, Clone)]
pub struct ReadingGoal {
    total_secs: u64,
    elapsed_secs: u64,
    status: GoalStatus,
}

impl Default for ReadingGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingGoal {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self {
            total_secs: 0,
            elapsed_secs: 0,
            status: GoalStatus::Idle,
        }
    }

    /// Starts counting towards a goal of the given number of minutes, from zero.
    pub fn start(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 || minutes > MAX_GOAL_MINUTES {
            return Err(Error::InvalidGoal {
                minutes,
                max: MAX_GOAL_MINUTES,
            });
        }
        self.total_secs = u64::from(minutes) * 60;
        self.elapsed_secs = 0;
        self.status = GoalStatus::Running;
        Ok(())
    }

    /// Counts one second if running. Returns the status after the tick.
    pub fn tick(&mut self) -> GoalStatus {
        if self.status == GoalStatus::Running {
            self.elapsed_secs += 1;
            if self.elapsed_secs >= self.total_secs {
                info!(minutes = self.total_secs / 60, "reading goal achieved");
                self.status = GoalStatus::Achieved;
            }
        }
        self.status
    }

    /// Switches between running and paused. Has no effect in other states.
    pub fn toggle_pause(&mut self) -> GoalStatus {
        self.status = match self.status {
            GoalStatus::Running => GoalStatus::Paused,
            GoalStatus::Paused => GoalStatus::Running,
            other => other,
        };
        self.status
    }

    /// Abandons the goal.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The current status.
    pub fn status(&self) -> GoalStatus {
        self.status
    }

    /// Time counted so far.
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_secs)
    }

    /// Time left until the goal is achieved.
    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.total_secs.saturating_sub(self.elapsed_secs))
    }

    /// Fraction of the goal achieved, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.elapsed_secs as f64 / self.total_secs as f64).min(1.0)
    }
}

/// Formats a duration as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_bounds() {
        let mut goal = ReadingGoal::new();
        assert!(matches!(goal.start(0), Err(Error::InvalidGoal { minutes: 0, max: 1440 })));
        assert!(goal.start(1441).is_err());
        assert_eq!(goal.status(), GoalStatus::Idle);
        assert!(goal.start(1440).is_ok());
        assert_eq!(goal.remaining(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_ticks_until_achieved() {
        let mut goal = ReadingGoal::new();
        goal.start(1).unwrap();
        for _ in 0..59 {
            assert_eq!(goal.tick(), GoalStatus::Running);
        }
        assert_eq!(goal.remaining(), Duration::from_secs(1));
        assert_eq!(goal.tick(), GoalStatus::Achieved);
        assert_eq!(goal.progress(), 1.0);
        assert_eq!(goal.tick(), GoalStatus::Achieved);
        assert_eq!(goal.elapsed(), Duration::from_secs(60));
    }

    #[test]
    fn test_paused_goal_does_not_count() {
        let mut goal = ReadingGoal::new();
        goal.start(2).unwrap();
        goal.tick();
        assert_eq!(goal.toggle_pause(), GoalStatus::Paused);
        goal.tick();
        goal.tick();
        assert_eq!(goal.elapsed(), Duration::from_secs(1));
        assert_eq!(goal.toggle_pause(), GoalStatus::Running);
        goal.tick();
        assert_eq!(goal.elapsed(), Duration::from_secs(2));
        assert!((goal.progress() - 2.0 / 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut goal = ReadingGoal::new();
        goal.start(5).unwrap();
        goal.tick();
        goal.reset();
        assert_eq!(goal.status(), GoalStatus::Idle);
        assert_eq!(goal.toggle_pause(), GoalStatus::Idle);
        assert_eq!(goal.progress(), 0.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::from_secs(0)), "00:00");
        assert_eq!(format_clock(Duration::from_secs(299)), "04:59");
        assert_eq!(format_clock(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(format_clock(Duration::from_secs(86_399)), "23:59:59");
    }
}
