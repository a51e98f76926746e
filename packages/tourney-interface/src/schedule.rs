use cosmwasm_schema::cw_serde;
use cosmwasm_std::BlockInfo;
use thiserror::Error;

/// Half-open `[start, end)` window in seconds.
#[cw_serde]
#[derive(Copy)]
pub struct Period {
    pub start: u64,
    pub end: u64,
}

impl Period {
    pub fn new(start: u64, end: u64) -> Self {
        Period { start, end }
    }

    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, now: u64) -> bool {
        self.start <= now && now < self.end
    }
}

#[cw_serde]
pub struct Schedule {
    pub registration: Option<Period>,
    pub game: Period,
    /// Seconds after the game ends during which scores can be submitted.
    pub submission_duration: u64,
}

/// Lifecycle phase of a tournament. Always derived from the current time.
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord)]
pub enum Phase {
    Scheduled,
    Registration,
    Staging,
    Live,
    Submission,
    Finalized,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Scheduled => "scheduled",
            Phase::Registration => "registration",
            Phase::Staging => "staging",
            Phase::Live => "live",
            Phase::Submission => "submission",
            Phase::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Bounds applied when a schedule is created.
#[cw_serde]
pub struct ScheduleLimits {
    pub min_registration_period: u64,
    pub min_game_duration: u64,
    pub max_game_duration: u64,
    pub min_submission_duration: u64,
    pub max_submission_duration: u64,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        ScheduleLimits {
            min_registration_period: 300,
            min_game_duration: 300,
            max_game_duration: 180 * 86400,
            min_submission_duration: 300,
            max_submission_duration: 30 * 86400,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Schedule cannot start in the past")]
    StartsInPast {},

    #[error("Registration must end after it starts and before the game starts")]
    InvalidRegistration {},

    #[error("Game must end after it starts")]
    InvalidGame {},

    #[error("Registration period must last at least {min} seconds")]
    RegistrationTooShort { min: u64 },

    #[error("Game must last between {min} and {max} seconds")]
    InvalidGameDuration { min: u64, max: u64 },

    #[error("Submission period must last between {min} and {max} seconds")]
    InvalidSubmissionDuration { min: u64, max: u64 },
}

impl Schedule {
    pub fn submission_end(&self) -> u64 {
        self.game.end.saturating_add(self.submission_duration)
    }

    pub fn phase(&self, now: u64) -> Phase {
        match &self.registration {
            Some(registration) => {
                if now < registration.start {
                    return Phase::Scheduled;
                }
                if now < registration.end {
                    return Phase::Registration;
                }
                if now < self.game.start {
                    return Phase::Staging;
                }
            }
            None => {
                if now < self.game.start {
                    return Phase::Scheduled;
                }
            }
        }

        if now < self.game.end {
            Phase::Live
        } else if now < self.submission_end() {
            Phase::Submission
        } else {
            Phase::Finalized
        }
    }

    pub fn phase_at(&self, block: &BlockInfo) -> Phase {
        self.phase(block.time.seconds())
    }

    pub fn validate(&self, now: u64, limits: &ScheduleLimits) -> Result<(), ScheduleError> {
        let first_start = self
            .registration
            .map(|registration| registration.start)
            .unwrap_or(self.game.start);
        if first_start < now {
            return Err(ScheduleError::StartsInPast {});
        }

        if let Some(registration) = &self.registration {
            if registration.end <= registration.start || registration.end > self.game.start {
                return Err(ScheduleError::InvalidRegistration {});
            }
            if registration.duration() < limits.min_registration_period {
                return Err(ScheduleError::RegistrationTooShort {
                    min: limits.min_registration_period,
                });
            }
        }

        if self.game.end <= self.game.start {
            return Err(ScheduleError::InvalidGame {});
        }
        let game_duration = self.game.duration();
        if game_duration < limits.min_game_duration || game_duration > limits.max_game_duration {
            return Err(ScheduleError::InvalidGameDuration {
                min: limits.min_game_duration,
                max: limits.max_game_duration,
            });
        }

        if self.submission_duration < limits.min_submission_duration
            || self.submission_duration > limits.max_submission_duration
        {
            return Err(ScheduleError::InvalidSubmissionDuration {
                min: limits.min_submission_duration,
                max: limits.max_submission_duration,
            });
        }

        Ok(())
    }
}
