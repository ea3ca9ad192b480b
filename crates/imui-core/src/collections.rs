//! Hash containers used by the core. `std-hash` switches them back to `std`.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::{HashMap, HashSet};
}

use crate::{NodeId, WidgetKind};

pub(crate) type KindMap<V> = map::HashMap<WidgetKind, V>;
pub(crate) type NodeSet = map::HashSet<NodeId>;
