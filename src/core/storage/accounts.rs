// src/core/storage/accounts.rs

//! Registered accounts, keyed by email, with Argon2-hashed passwords.

use crate::core::TunecastError;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    /// The Argon2 password hash in PHC string format.
    pub password_hash: String,
}

impl Account {
    pub fn new(email: &str, password: &str) -> Result<Self, TunecastError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(Self {
            email: email.to_string(),
            password_hash,
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.email.clone(), account))
                .collect(),
        }
    }

    /// Creates an account. The email must be well-formed and unused.
    pub fn register(&mut self, email: &str, password: &str) -> Result<&Account, TunecastError> {
        if !is_valid_email(email) {
            return Err(TunecastError::InvalidEmail);
        }
        if self.accounts.contains_key(email) {
            return Err(TunecastError::AccountExists);
        }
        let account = Account::new(email, password)?;
        Ok(self.accounts.entry(email.to_string()).or_insert(account))
    }

    /// Checks credentials. `Ok(false)` means the password did not match.
    pub fn login(&self, email: &str, password: &str) -> Result<bool, TunecastError> {
        let account = self
            .accounts
            .get(email)
            .ok_or(TunecastError::AccountNotFound)?;
        Ok(account.verify_password(password))
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// An email is `local@label.label` with every part non-blank. Whitespace and
/// path separators are refused since the address names the profile file.
pub fn is_valid_email(email: &str) -> bool {
    if email.contains(|c: char| c.is_whitespace() || c == '/' || c == '\\') {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() == 2 && labels.iter().all(|label| !label.is_empty())
}
