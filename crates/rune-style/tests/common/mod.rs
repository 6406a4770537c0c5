#![allow(dead_code)]

use parking_lot::Mutex;
use rune_style::{DerivedStyle, RenderTarget, StyleError, StyleObserver, TargetId};

#[derive(Default)]
pub struct RecordingObserver {
    styles: Mutex<Vec<DerivedStyle>>,
    diagnostics: Mutex<Vec<StyleError>>,
}

impl RecordingObserver {
    pub fn count(&self) -> usize {
        self.styles.lock().len()
    }

    pub fn last(&self) -> Option<DerivedStyle> {
        self.styles.lock().last().cloned()
    }

    pub fn diagnostics(&self) -> Vec<StyleError> {
        self.diagnostics.lock().clone()
    }
}

impl StyleObserver for RecordingObserver {
    fn on_style_changed(&self, style: &DerivedStyle) {
        self.styles.lock().push(style.clone());
    }

    fn on_diagnostic(&self, error: &StyleError) {
        self.diagnostics.lock().push(error.clone());
    }
}

#[derive(Debug)]
pub struct FakeTarget {
    id: TargetId,
    writes: Mutex<Vec<String>>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self {
            id: TargetId::new(),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

impl RenderTarget for FakeTarget {
    fn id(&self) -> TargetId {
        self.id
    }

    fn write_style(&self, css_text: &str) {
        self.writes.lock().push(css_text.to_string());
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
