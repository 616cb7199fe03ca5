use super::upload::UploadRepository;
use async_trait::async_trait;
use chroma_core::{AppError, UploadRecord};
use std::sync::{Arc, Mutex, MutexGuard};

/// Upload repository kept in process memory
///
/// Enforces the same uniqueness and ordering rules as the PostgreSQL table.
#[derive(Clone, Default)]
pub struct InMemoryUploadRepository {
    records: Arc<Mutex<Vec<UploadRecord>>>,
}

impl InMemoryUploadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UploadRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UploadRepository for InMemoryUploadRepository {
    async fn insert(&self, record: &UploadRecord) -> Result<(), AppError> {
        let mut records = self.lock();
        if records
            .iter()
            .any(|r| r.saved_filename == record.saved_filename)
        {
            return Err(AppError::Conflict(format!(
                "An upload named {} already exists",
                record.saved_filename
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<UploadRecord>, AppError> {
        // Reverse insertion order first so equal timestamps list the latest insert first
        let mut records: Vec<UploadRecord> = self.lock().iter().rev().cloned().collect();
        records.sort_by(|a, b| b.upload_time.cmp(&a.upload_time));
        Ok(records)
    }

    async fn find_by_saved_filename(
        &self,
        saved_filename: &str,
    ) -> Result<Option<UploadRecord>, AppError> {
        Ok(self
            .lock()
            .iter()
            .find(|r| r.saved_filename == saved_filename)
            .cloned())
    }

    async fn delete_by_saved_filename(&self, saved_filename: &str) -> Result<bool, AppError> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.saved_filename != saved_filename);
        Ok(records.len() != before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
