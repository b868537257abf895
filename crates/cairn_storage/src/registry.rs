//! The closed list of component kinds.
//!
//! Each entry names the table field, the component type, and its traits:
//!
//! - `indexed`: a value index is kept, enabling [`Store::get_all_by`](crate::Store::get_all_by)
//! - `track_new`: new holders are appended to a new-list, enabling
//!   [`Store::get_all_new`](crate::Store::get_all_new)
//! - `exports`: the type implements [`ExportRefs`] itself; otherwise an empty
//!   impl is generated
//!
//! Declaration order fixes each kind's bit in [`Systems`] and the order of
//! component blocks in saved data.

use cairn_foundation::Systems;

use crate::component::{Component, ExportRefs, Indexed, KindVisitor, TrackNew};
use crate::components::{
    Actor, Damage, Glyph, Health, Inventory, Item, Name, Player, Pos, Tile, TileAgent,
};
use crate::table::Table;

macro_rules! registry {
    (@indexed true $ty:ident) => {
        impl Indexed for $ty {}
    };
    (@indexed false $ty:ident) => {};
    (@track_new true $ty:ident) => {
        impl TrackNew for $ty {}
    };
    (@track_new false $ty:ident) => {};
    (@exports true $ty:ident) => {};
    (@exports false $ty:ident) => {
        impl ExportRefs for $ty {}
    };
    ($(
        $field:ident: $ty:ident {
            indexed: $indexed:tt,
            track_new: $track_new:tt,
            exports: $exports:tt $(,)?
        }
    ),+ $(,)?) => {
        /// A registered component kind.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ComponentKind {
            $(
                #[doc = concat!("[`", stringify!($ty), "`]")]
                $ty,
            )+
        }

        impl ComponentKind {
            /// Every kind, in registry order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$ty),+];

            /// Block and table name of this kind.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$ty => stringify!($field),)+
                }
            }

            /// Bit position in a thing's [`Systems`] mask.
            #[must_use]
            pub const fn bit(self) -> usize {
                self as usize
            }

            /// Looks up a kind by its bit position.
            #[must_use]
            pub fn from_bit(bit: usize) -> Option<Self> {
                Self::ALL.get(bit).copied()
            }

            /// Looks up a kind by its name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|kind| kind.name() == name)
            }

            /// Whether a value index is kept for this kind.
            #[must_use]
            pub const fn is_indexed(self) -> bool {
                match self {
                    $(Self::$ty => $indexed,)+
                }
            }

            /// Whether new holders of this kind are tracked.
            #[must_use]
            pub const fn tracks_new(self) -> bool {
                match self {
                    $(Self::$ty => $track_new,)+
                }
            }

            pub(crate) fn visit<V: KindVisitor>(self, visitor: &mut V) -> V::Output {
                match self {
                    $(Self::$ty => visitor.visit::<$ty>(),)+
                }
            }
        }

        /// One table per registered kind.
        #[derive(Clone, Debug)]
        pub struct Tables {
            $($field: Table<$ty>,)+
        }

        impl Default for Tables {
            fn default() -> Self {
                Self {
                    $($field: Table::new(),)+
                }
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;
                const INDEXED: bool = $indexed;
                const TRACK_NEW: bool = $track_new;

                fn table(tables: &Tables) -> &Table<Self> {
                    &tables.$field
                }

                fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
                    &mut tables.$field
                }
            }

            registry!(@indexed $indexed $ty);
            registry!(@track_new $track_new $ty);
            registry!(@exports $exports $ty);
        )+
    };
}

registry! {
    pos: Pos { indexed: true, track_new: true, exports: false },
    name: Name { indexed: false, track_new: false, exports: false },
    glyph: Glyph { indexed: false, track_new: false, exports: false },
    tile: Tile { indexed: false, track_new: false, exports: false },
    health: Health { indexed: false, track_new: false, exports: false },
    damage: Damage { indexed: false, track_new: true, exports: false },
    actor: Actor { indexed: false, track_new: true, exports: false },
    item: Item { indexed: false, track_new: false, exports: false },
    inventory: Inventory { indexed: false, track_new: false, exports: true },
    player: Player { indexed: true, track_new: false, exports: false },
    tile_agent: TileAgent { indexed: false, track_new: false, exports: false },
}

/// Number of registered kinds.
pub const KIND_COUNT: usize = ComponentKind::ALL.len();

const _: () = assert!(
    KIND_COUNT <= Systems::CAPACITY,
    "more component kinds than bits in the systems mask"
);
