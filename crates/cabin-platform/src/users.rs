//! User/account state source.

use std::cell::RefCell;

use cabin_core::prelude::*;

/// Stable per-device user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// One user account on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
    pub admin: bool,
}

/// Read-mostly view of the device's user accounts.
///
/// Queries are synchronous and cheap. `remove_user` is the one fallible
/// mutation: a failure is recoverable and surfaces to the user as a retry
/// dialog, never as a crash.
pub trait UserStore {
    /// The user the settings shell is running as.
    fn current_user(&self) -> UserInfo;

    /// All users on the device, current user included.
    fn users(&self) -> Vec<UserInfo>;

    fn user_count(&self) -> usize {
        self.users().len()
    }

    /// Whether the current user may administer other accounts.
    fn current_user_is_admin(&self) -> bool {
        self.current_user().admin
    }

    fn remove_user(&self, id: UserId) -> Result<()>;

    fn add_user(&self, name: &str) -> Result<UserInfo>;
}

/// In-memory user store used by the simulation and by tests.
#[derive(Debug)]
pub struct FakeUserStore {
    inner: RefCell<FakeUsersInner>,
}

#[derive(Debug)]
struct FakeUsersInner {
    users: Vec<UserInfo>,
    current: UserId,
    next_id: u32,
    /// When set, every removal fails with this message (exercises the
    /// retry-dialog path).
    removal_failure: Option<String>,
}

impl Default for FakeUserStore {
    fn default() -> Self {
        Self::with_users(
            vec![
                UserInfo {
                    id: UserId(0),
                    name: "Driver".to_string(),
                    admin: true,
                },
                UserInfo {
                    id: UserId(1),
                    name: "Passenger".to_string(),
                    admin: false,
                },
            ],
            UserId(0),
        )
    }
}

impl FakeUserStore {
    pub fn with_users(users: Vec<UserInfo>, current: UserId) -> Self {
        let next_id = users.iter().map(|u| u.id.0 + 1).max().unwrap_or(0);
        Self {
            inner: RefCell::new(FakeUsersInner {
                users,
                current,
                next_id,
                removal_failure: None,
            }),
        }
    }

    /// Single non-admin user, for exercising `DisabledForUser` paths.
    pub fn single_non_admin(name: &str) -> Self {
        Self::with_users(
            vec![UserInfo {
                id: UserId(0),
                name: name.to_string(),
                admin: false,
            }],
            UserId(0),
        )
    }

    /// Make every subsequent removal fail with `message`.
    pub fn fail_removals(&self, message: impl Into<String>) {
        self.inner.borrow_mut().removal_failure = Some(message.into());
    }

    /// Clear a failure mode installed with [`Self::fail_removals`].
    pub fn clear_removal_failure(&self) {
        self.inner.borrow_mut().removal_failure = None;
    }
}

impl UserStore for FakeUserStore {
    fn current_user(&self) -> UserInfo {
        let inner = self.inner.borrow();
        inner
            .users
            .iter()
            .find(|u| u.id == inner.current)
            .cloned()
            .unwrap_or_else(|| UserInfo {
                id: inner.current,
                name: "Unknown".to_string(),
                admin: false,
            })
    }

    fn users(&self) -> Vec<UserInfo> {
        self.inner.borrow().users.clone()
    }

    fn remove_user(&self, id: UserId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if let Some(message) = &inner.removal_failure {
            return Err(Error::user_removal(message.clone()));
        }
        if id == inner.current {
            return Err(Error::user_removal("cannot remove the active user"));
        }
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(Error::user_removal(format!("no such user: {id}")));
        }
        info!(user = %id, "removed user");
        Ok(())
    }

    fn add_user(&self, name: &str) -> Result<UserInfo> {
        let mut inner = self.inner.borrow_mut();
        let user = UserInfo {
            id: UserId(inner.next_id),
            name: name.to_string(),
            admin: false,
        };
        inner.next_id += 1;
        inner.users.push(user.clone());
        info!(user = %user.id, name, "added user");
        Ok(user)
    }
}
