// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Access to the persistence layer from request handlers.
//!
//! A file database hands every request its own `SQLite` connection, so
//! requests only contend on the database's own locks and the store-level
//! transactions decide who wins a race. An in-memory database exists only
//! while its connection is open, so requests share that one connection
//! behind a mutex.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

use pemilo_api::ApiError;
use pemilo_persistence::{Persistence, PersistenceError};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::HttpError;

/// Where handlers get their persistence handle from.
#[derive(Clone)]
pub enum Store {
    /// One connection shared by every request.
    Shared(Arc<Mutex<Persistence>>),
    /// A migrated database file. Each request opens its own connection.
    File(Arc<PathBuf>),
}

impl Store {
    /// Wraps a single connection for shared use.
    pub fn shared(persistence: Persistence) -> Self {
        Self::Shared(Arc::new(Mutex::new(persistence)))
    }

    /// Migrates the database at `path` and serves it with a connection per
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn file(path: PathBuf) -> Result<Self, PersistenceError> {
        Persistence::new_with_file(&path)?;
        Ok(Self::File(Arc::new(path)))
    }

    /// Returns a handle for one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `503 Service Unavailable` if a file connection cannot be
    /// opened.
    pub async fn acquire(&self) -> Result<StoreHandle, HttpError> {
        match self {
            Self::Shared(persistence) => {
                Ok(StoreHandle::Shared(persistence.clone().lock_owned().await))
            }
            Self::File(path) => Persistence::open_file(path.as_path())
                .map(|persistence| StoreHandle::Owned(Box::new(persistence)))
                .map_err(|e| HttpError::from(ApiError::from(e))),
        }
    }
}

/// A persistence handle held for the duration of one request.
pub enum StoreHandle {
    Shared(OwnedMutexGuard<Persistence>),
    Owned(Box<Persistence>),
}

impl Deref for StoreHandle {
    type Target = Persistence;

    fn deref(&self) -> &Persistence {
        match self {
            Self::Shared(guard) => guard,
            Self::Owned(persistence) => persistence,
        }
    }
}

impl DerefMut for StoreHandle {
    fn deref_mut(&mut self) -> &mut Persistence {
        match self {
            Self::Shared(guard) => guard,
            Self::Owned(persistence) => persistence,
        }
    }
}
