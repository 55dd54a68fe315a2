use chrono::{DateTime, TimeDelta, Utc};
use poise::serenity_prelude::UserId;
use thiserror::Error;

/// Lifetime of every button view the bot sends.
pub const SESSION_TIMEOUT: TimeDelta = TimeDelta::seconds(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Completed,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Why an action on a session was refused. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionRejection {
    #[error("This command was not invoked by you!")]
    NotOwner,
    #[error("This session has already concluded!")]
    Concluded,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an interactive session needs at least one item")]
    Empty,
}

/// How the controls of a session should currently be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    Enabled,
    Disabled,
    /// Disabled, with a "Timed out" marker appended.
    TimedOut,
}

/// Single-owner, timeout-bounded state behind a button view.
///
/// Every mutating call checks the actor against the owner and refuses to
/// touch a session that has reached `Completed` or `TimedOut`.
#[derive(Debug, Clone)]
pub struct InteractiveSession<T> {
    owner: UserId,
    items: Vec<T>,
    cursor: usize,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    timeout: TimeDelta,
}

impl<T> InteractiveSession<T> {
    pub fn new(
        items: Vec<T>,
        timeout: TimeDelta,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(InteractiveSession {
            owner,
            items,
            cursor: 0,
            status: SessionStatus::Active,
            created_at,
            timeout,
        })
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current(&self) -> &T {
        &self.items[self.cursor]
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.created_at + self.timeout
    }

    pub fn controls(&self) -> Controls {
        match self.status {
            SessionStatus::Active => Controls::Enabled,
            SessionStatus::Completed => Controls::Disabled,
            SessionStatus::TimedOut => Controls::TimedOut,
        }
    }

    fn authorize(&self, actor: UserId) -> Result<(), SessionRejection> {
        if actor != self.owner {
            return Err(SessionRejection::NotOwner);
        }
        if self.status != SessionStatus::Active {
            return Err(SessionRejection::Concluded);
        }
        Ok(())
    }

    pub fn navigate(&mut self, actor: UserId, direction: Direction) -> Result<&T, SessionRejection> {
        self.authorize(actor)?;

        let len = self.items.len();
        self.cursor = match direction {
            Direction::Next => (self.cursor + 1) % len,
            Direction::Previous => (self.cursor + len - 1) % len,
        };

        Ok(self.current())
    }

    /// Settles the session with `decide`, evaluated against the current item.
    pub fn choose<O>(
        &mut self,
        actor: UserId,
        decide: impl FnOnce(&T) -> O,
    ) -> Result<O, SessionRejection> {
        self.authorize(actor)?;

        let outcome = decide(self.current());
        self.status = SessionStatus::Completed;
        Ok(outcome)
    }

    pub fn stop(&mut self, actor: UserId) -> Result<&T, SessionRejection> {
        self.authorize(actor)?;

        self.status = SessionStatus::Completed;
        Ok(self.current())
    }

    /// Returns `true` only on the call that moves the session to `TimedOut`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == SessionStatus::Active && now - self.created_at >= self.timeout {
            self.status = SessionStatus::TimedOut;
            return true;
        }
        false
    }
}
