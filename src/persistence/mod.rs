//! The single persisted slot
//!
//! Only one value survives between sessions: the best level reached, stored
//! as a decimal string under [`crate::consts::BEST_SCORE_KEY`]. LocalStorage backs it on
//! wasm32; everything else gets an in-memory slot.

#[cfg(target_arch = "wasm32")]
use crate::consts::BEST_SCORE_KEY;
use crate::error::StorageError;

/// Raw string slot for the best score
pub trait ScoreStore {
    /// Stored value, `None` when the slot was never written
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&mut self, value: &str) -> Result<(), StorageError>;
}

/// In-memory slot (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn read(&self) -> Result<Option<String>, StorageError> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        (**self).write(value)
    }
}

/// Browser LocalStorage slot (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(BEST_SCORE_KEY)
            .map_err(|e| StorageError::Read {
                key: BEST_SCORE_KEY.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(BEST_SCORE_KEY, value)
            .map_err(|e| StorageError::Write {
                key: BEST_SCORE_KEY.to_string(),
                reason: format!("{e:?}"),
            })
    }
}
