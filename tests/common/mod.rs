//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use image_flow_canvas::{AssetHandle, FrameSnapshot, ImageError, ImageProvider, RenderAdapter};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every frame handed to the render adapter.
#[derive(Default, Clone)]
pub struct FrameRecorder {
    pub frames: Rc<RefCell<Vec<FrameSnapshot>>>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Option<FrameSnapshot> {
        self.frames.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl RenderAdapter for FrameRecorder {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.frames.borrow_mut().push(frame.clone());
    }
}

/// Image provider that resolves every identifier except the ones marked missing, and
/// records what it was asked for.
#[derive(Default, Clone)]
pub struct StubImageProvider {
    pub requests: Rc<RefCell<Vec<String>>>,
    pub missing: Rc<RefCell<Vec<String>>>,
}

impl StubImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_missing(&self, identifier: &str) {
        self.missing.borrow_mut().push(identifier.to_string());
    }

    pub fn requested(&self, identifier: &str) -> bool {
        self.requests.borrow().iter().any(|request| request == identifier)
    }
}

impl ImageProvider for StubImageProvider {
    fn resolve(&self, identifier: &str) -> Result<AssetHandle, ImageError> {
        self.requests.borrow_mut().push(identifier.to_string());
        if self.missing.borrow().iter().any(|missing| missing == identifier) {
            Err(ImageError::NotFound(identifier.to_string()))
        } else {
            Ok(AssetHandle::default())
        }
    }
}
