use parking_lot::Mutex;
use std::sync::Arc;
use transkey_core::{PluralCategory, PluralRules};

/// Plural rules returning English-like categories and recording every call.
#[derive(Clone, Default)]
pub struct StubPluralRules {
    fixed: Option<PluralCategory>,
    calls: Arc<Mutex<Vec<(i64, bool)>>>,
}

impl StubPluralRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `category`, regardless of count.
    pub fn fixed(category: PluralCategory) -> Self {
        Self {
            fixed: Some(category),
            calls: Arc::default(),
        }
    }

    /// `(count, ordinal)` pairs seen so far.
    pub fn calls(&self) -> Vec<(i64, bool)> {
        self.calls.lock().clone()
    }
}

impl PluralRules for StubPluralRules {
    fn category(&self, count: i64, ordinal: bool) -> PluralCategory {
        self.calls.lock().push((count, ordinal));
        if let Some(category) = self.fixed {
            return category;
        }
        let n = count.unsigned_abs();
        if !ordinal {
            return if n == 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            };
        }
        match (n % 10, n % 100) {
            (1, rem) if rem != 11 => PluralCategory::One,
            (2, rem) if rem != 12 => PluralCategory::Two,
            (3, rem) if rem != 13 => PluralCategory::Few,
            _ => PluralCategory::Other,
        }
    }
}
