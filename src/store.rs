// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user and company store.
//!
//! Backs the [`UserLookup`] collaborator used by the authenticator and the
//! credential check used by login. Passwords are stored as bcrypt hashes.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

use crate::models::{Company, Role, User, UserLookup};

#[cfg(not(test))]
const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;
// Keeps unit tests fast; the hash format is identical.
#[cfg(test)]
const PASSWORD_HASH_COST: u32 = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("User id {0} is already taken")]
    IdTaken(i64),
    #[error("Company {0} not found")]
    UnknownCompany(i64),
    #[error("User {0} not found")]
    UnknownUser(i64),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub company_id: Option<i64>,
}

struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<i64, UserRecord>,
    companies: HashMap<i64, Company>,
    next_user_id: i64,
    next_company_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_company(&mut self, name: impl Into<String>) -> Company {
        self.next_company_id += 1;
        let company = Company {
            id: self.next_company_id,
            name: name.into(),
        };
        self.companies.insert(company.id, company.clone());
        company
    }

    pub fn company(&self, id: i64) -> Option<&Company> {
        self.companies.get(&id)
    }

    pub fn company_by_name(&self, name: &str) -> Option<&Company> {
        self.companies.values().find(|c| c.name == name)
    }

    /// Create a user with the next free id.
    pub fn insert_user(&mut self, new_user: NewUser) -> Result<User, StoreError> {
        self.next_user_id += 1;
        let id = self.next_user_id;
        self.insert_user_with_id(id, new_user)
    }

    /// Create a user with a caller-chosen id.
    ///
    /// Later [`insert_user`](Self::insert_user) calls continue after the
    /// highest id seen.
    pub fn insert_user_with_id(&mut self, id: i64, new_user: NewUser) -> Result<User, StoreError> {
        if self.users.contains_key(&id) {
            return Err(StoreError::IdTaken(id));
        }
        if self.find_by_username(&new_user.username).is_some() {
            return Err(StoreError::UsernameTaken(new_user.username));
        }
        if let Some(company_id) = new_user.company_id {
            if !self.companies.contains_key(&company_id) {
                return Err(StoreError::UnknownCompany(company_id));
            }
        }

        let password_hash = bcrypt::hash(&new_user.password, PASSWORD_HASH_COST)?;
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            role: new_user.role,
            company_id: new_user.company_id,
        };

        self.next_user_id = self.next_user_id.max(id);
        self.users.insert(
            id,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    pub fn delete_user(&mut self, id: i64) -> Result<(), StoreError> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::UnknownUser(id))
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users
            .values()
            .map(|record| &record.user)
            .find(|user| user.username == username)
    }

    /// Check a username/password pair. Returns `None` for an unknown user
    /// or a wrong password.
    ///
    /// An unknown username still pays for one bcrypt verification, so both
    /// failures take the same time.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        let Some(record) = self
            .users
            .values()
            .find(|record| record.user.username == username)
        else {
            if let Some(hash) = dummy_password_hash() {
                let _ = bcrypt::verify(password, hash);
            }
            return None;
        };

        match bcrypt::verify(password, &record.password_hash) {
            Ok(true) => Some(record.user.clone()),
            Ok(false) => None,
            Err(err) => {
                tracing::warn!(user_id = record.user.id, error = %err, "stored password hash is unreadable");
                None
            }
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// Hash checked against when the username is unknown.
fn dummy_password_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| bcrypt::hash("unknown-user", PASSWORD_HASH_COST).ok())
        .as_deref()
}

impl UserLookup for InMemoryStore {
    fn lookup_user_by_id(&self, id: i64) -> Option<User> {
        self.users.get(&id).map(|record| record.user.clone())
    }
}
