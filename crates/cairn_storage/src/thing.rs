//! Directory records.

use cairn_foundation::{Systems, ThingId};
use serde::{Deserialize, Serialize};

use crate::registry::ComponentKind;

/// A thing's directory record: its id and which kinds it holds.
///
/// `systems` bit `i` is set exactly when the table for kind `i` holds a
/// value for `id`. The store maintains this; a `Thing` obtained from the
/// store is a read-only view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thing {
    /// The thing's id.
    pub id: ThingId,
    /// Component presence mask.
    pub systems: Systems,
}

impl Thing {
    /// Creates a record holding no components.
    #[must_use]
    pub const fn new(id: ThingId) -> Self {
        Self {
            id,
            systems: Systems::EMPTY,
        }
    }

    /// Checks if the thing holds `kind`.
    #[must_use]
    pub const fn has(&self, kind: ComponentKind) -> bool {
        self.systems.contains(kind.bit())
    }

    /// Iterates the kinds the thing holds, in registry order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + use<> {
        self.systems.iter().filter_map(ComponentKind::from_bit)
    }
}
