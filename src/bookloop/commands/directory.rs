//! User accounts: registration, login and removal.
//!
//! The users document maps username to `{ password, role }`. Passwords are stored as
//! Argon2id hashes; see [`crate::password`].

use crate::error::{BookloopError, Result};
use crate::model::{Role, User, UserRecord};
use crate::password::{self, Verification};
use crate::store::{Collection, RecordStore};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub type UserMap = BTreeMap<String, UserRecord>;

fn load_users<S: RecordStore>(store: &S) -> Result<UserMap> {
    store.load(Collection::Users, UserMap::new())
}

/// Create an account. Returns `false` if the username is already taken.
///
/// Only one admin account may exist; registering a second fails with `Forbidden`. The
/// check runs under the users lock, so concurrent admin registrations cannot both win.
pub fn register<S: RecordStore>(
    store: &S,
    username: &str,
    password: &str,
    role: Role,
) -> Result<bool> {
    if role == Role::Admin && has_admin(store)? {
        return Err(admin_exists());
    }
    // Hash outside the lock, it is the slow part
    let hash = password::hash_password(password)?;
    let created = store.update(Collection::Users, UserMap::new(), |users| {
        if role == Role::Admin && any_admin(users) {
            return Err(admin_exists());
        }
        if users.contains_key(username) {
            return Ok(false);
        }
        users.insert(
            username.to_string(),
            UserRecord {
                password: hash,
                role,
            },
        );
        Ok(true)
    })?;
    if created {
        info!(username, %role, "user registered");
    }
    Ok(created)
}

/// The user if `username` exists and `password` verifies, otherwise `None`.
///
/// Unknown users and wrong passwords are indistinguishable to the caller. Legacy
/// plain-text entries are rehashed on a successful login.
pub fn login<S: RecordStore>(store: &S, username: &str, password: &str) -> Result<Option<User>> {
    let users = load_users(store)?;
    let Some(record) = users.get(username) else {
        return Ok(None);
    };

    match password::verify_password(password, &record.password)? {
        Verification::Mismatch => Ok(None),
        Verification::Match => Ok(Some(User::new(username, record.role))),
        Verification::MatchNeedsRehash => {
            upgrade_password(store, username, password)?;
            Ok(Some(User::new(username, record.role)))
        }
    }
}

fn upgrade_password<S: RecordStore>(store: &S, username: &str, password: &str) -> Result<()> {
    let hash = password::hash_password(password)?;
    store.update(Collection::Users, UserMap::new(), |users| {
        if let Some(record) = users.get_mut(username) {
            // Only replace the value we verified against
            if !password::is_hashed(&record.password) {
                record.password = hash;
            }
        }
        Ok(())
    })?;
    warn!(username, "upgraded plain-text password to a hash");
    Ok(())
}

/// Remove an account. Returns the removed user, `None` if there was nothing to remove.
pub fn delete<S: RecordStore>(store: &S, username: &str) -> Result<Option<User>> {
    let removed = store.update(Collection::Users, UserMap::new(), |users| {
        Ok(users
            .remove(username)
            .map(|record| User::new(username, record.role)))
    })?;
    if removed.is_some() {
        info!(username, "user deleted");
    }
    Ok(removed)
}

/// All users, ordered by username.
pub fn list<S: RecordStore>(store: &S) -> Result<Vec<User>> {
    Ok(load_users(store)?
        .into_iter()
        .map(|(username, record)| User::new(username, record.role))
        .collect())
}

pub fn get<S: RecordStore>(store: &S, username: &str) -> Result<Option<User>> {
    Ok(load_users(store)?
        .get(username)
        .map(|record| User::new(username, record.role)))
}

pub fn has_admin<S: RecordStore>(store: &S) -> Result<bool> {
    Ok(any_admin(&load_users(store)?))
}

fn any_admin(users: &UserMap) -> bool {
    users.values().any(|record| record.role == Role::Admin)
}

fn admin_exists() -> BookloopError {
    BookloopError::Forbidden("an admin account already exists".to_string())
}
