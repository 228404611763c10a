use super::{Storage, StoreError};

/// In-memory storage that keeps keys in insertion order.
///
/// `set_available(false)` makes every operation fail, mimicking a missing
/// or quota-exhausted backend.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: Vec<(String, String)>,
    available: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            entries: Vec::new(),
            available: true,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory storage disabled".to_string()))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.entries.iter().map(|(k, _)| k.clone()).collect())
    }
}
