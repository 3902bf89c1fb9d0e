/// Callback run by a driver after every completed transaction.
///
/// Every driver owns one of these.  It starts out empty, which makes running it a
/// no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateHook(Option<fn()>);

impl UpdateHook {
    pub const fn new() -> Self {
        Self(None)
    }

    pub fn set(&mut self, hook: fn()) {
        self.0 = Some(hook);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn call(&self) {
        if let Some(hook) = self.0 {
            hook();
        }
    }
}
