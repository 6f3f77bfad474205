//! Fixtures for common optimistic-update scenarios.

use optimist_core::{Signal, Transaction};

/// A small application state with a user list and a current user name.
#[derive(Debug, Clone, Default)]
pub struct UsersApp {
    /// Known users.
    pub users: Signal<Vec<String>>,
    /// Name of the signed-in user.
    pub user_name: Signal<String>,
}

impl UsersApp {
    /// Creates an empty app.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an app whose user list holds `users`.
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let app = Self::new();
        app.users.set(users.into_iter().map(Into::into).collect());
        app
    }

    /// Appends `name` to the user list inside a new transaction and returns it.
    pub fn add_user_optimistically(&self, name: impl Into<String>) -> Transaction {
        let name = name.into();
        Transaction::with_mutation(|| self.users.update(|users| users.push(name)))
    }

    /// Sets the user name inside a new transaction and returns it.
    pub fn rename_optimistically(&self, name: impl Into<String>) -> Transaction {
        let name = name.into();
        Transaction::with_mutation(|| self.user_name.set(name))
    }
}

/// Creates `count` integer signals, all starting at `initial`.
#[must_use]
pub fn counters(count: usize, initial: i32) -> Vec<Signal<i32>> {
    (0..count).map(|_| Signal::new(initial)).collect()
}

/// Creates one integer signal per entry of `initial`.
#[must_use]
pub fn signals(initial: &[i32]) -> Vec<Signal<i32>> {
    initial.iter().copied().map(Signal::new).collect()
}

/// Current values of `signals`.
#[must_use]
pub fn values(signals: &[Signal<i32>]) -> Vec<i32> {
    signals.iter().map(Signal::get).collect()
}
