use super::StoreError;

/// a small key-value store that survives process restarts. every call has
/// completed (and, for file backed stores, reached the disk) when it returns.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// removes all `keys` in one write.
    fn remove_all(&mut self, keys: &[String]) -> Result<(), StoreError>;

    /// all entries, sorted by key.
    fn entries(&self) -> Result<Vec<(String, String)>, StoreError>;
}
