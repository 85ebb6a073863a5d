//! [`RecordingMounter`], a mount primitive for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use jbod_sys::{Error, Mounter, Result};

/// One recorded invocation of [`Mounter::mount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    pub device: PathBuf,
    pub target: PathBuf,
    pub options: Vec<String>,
}

/// Records every mount request and either succeeds or fails with a fixed
/// message. Nothing touches the host.
#[derive(Debug, Default)]
pub struct RecordingMounter {
    calls: Mutex<Vec<MountCall>>,
    failure: Option<String>,
    // Calls that succeed before `failure` applies.
    successes: usize,
}

impl RecordingMounter {
    /// Mounter that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounter that always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
            successes: 0,
        }
    }

    /// Mounter that behaves like a real host: the first mount succeeds and
    /// every later one fails with "already mounted".
    pub fn mounts_once() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some("already mounted".to_string()),
            successes: 1,
        }
    }

    pub fn calls(&self) -> Vec<MountCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mounter for RecordingMounter {
    async fn mount(&self, device: &Path, target: &Path, options: &[String]) -> Result<()> {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(MountCall {
                device: device.to_path_buf(),
                target: target.to_path_buf(),
                options: options.to_vec(),
            });
            calls.len() - 1
        };
        match &self.failure {
            Some(message) if previous >= self.successes => Err(Error::MountFailed {
                device: device.to_path_buf(),
                target: target.to_path_buf(),
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }
}
