//! Kind → constructor lookup table.
//!
//! Kinds are identified by a static name. The table is filled explicitly,
//! there is no discovery: a call for a kind nobody registered fails with
//! [`ReconcileError::MissingFactory`].

use std::fmt;
use std::sync::Arc;

use crate::collections::KindMap;
use crate::{Applier, NodeError, ReconcileError, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKind(&'static str);

impl WidgetKind {
    /// Layout scope container laid out left to right.
    pub const HORIZONTAL: WidgetKind = WidgetKind("horizontal");
    /// Layout scope container laid out top to bottom.
    pub const VERTICAL: WidgetKind = WidgetKind("vertical");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Builds fresh widget instances of one kind. Runs on the UI executor.
pub trait WidgetFactory: Send + Sync {
    /// Creates the toolkit node(s) and the instance wrapping them. The
    /// returned handle must still be detached; the reconciler attaches it.
    fn construct(&self, tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError>;
}

impl<F> WidgetFactory for F
where
    F: Fn(&mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> + Send + Sync,
{
    fn construct(&self, tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        self(tree)
    }
}

#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: KindMap<Arc<dyn WidgetFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `kind`, returning the factory it replaced.
    pub fn register(
        &mut self,
        kind: WidgetKind,
        factory: impl WidgetFactory + 'static,
    ) -> Option<Arc<dyn WidgetFactory>> {
        self.factories.insert(kind, Arc::new(factory))
    }

    pub fn with(mut self, kind: WidgetKind, factory: impl WidgetFactory + 'static) -> Self {
        self.register(kind, factory);
        self
    }

    pub fn get(&self, kind: WidgetKind) -> Result<Arc<dyn WidgetFactory>, ReconcileError> {
        self.factories
            .get(&kind)
            .cloned()
            .ok_or(ReconcileError::MissingFactory { kind })
    }

    pub fn contains(&self, kind: WidgetKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn kinds(&self) -> Vec<WidgetKind> {
        let mut kinds: Vec<WidgetKind> = self.factories.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
