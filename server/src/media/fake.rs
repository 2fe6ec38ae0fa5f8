//! Fake media host for testing.

use super::{ImageUpload, MediaError, MediaStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records uploads and deletions instead of talking to a real host.
#[derive(Debug, Default)]
pub struct FakeMediaStore {
    uploads: AtomicUsize,
    failing: AtomicBool,
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later upload fail as if the host returned a 500.
    pub fn fail_uploads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// URLs currently held by the fake host.
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaError::Api {
                status: 500,
                message: "upload rejected".to_string(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let url = format!("https://media.test/{}-{}", n, image.file_name);
        self.stored.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        self.stored.lock().unwrap().retain(|u| u != url);
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
