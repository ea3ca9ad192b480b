/// Environment switch enabling tree dumps after every frame.
pub const DEBUG_ENV: &str = "IMUI_DEBUG";

/// Runtime knobs of a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Log the retained tree at `trace` level after each `end_frame`.
    pub dump_tree: bool,
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with `dump_tree` turned on when `IMUI_DEBUG` is set.
    pub fn from_env() -> Self {
        Self {
            dump_tree: std::env::var_os(DEBUG_ENV).is_some(),
        }
    }

    pub fn with_dump_tree(mut self, dump_tree: bool) -> Self {
        self.dump_tree = dump_tree;
        self
    }
}
