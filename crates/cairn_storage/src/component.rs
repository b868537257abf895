//! Component traits.
//!
//! Every component kind is declared once in the [`registry`](crate::registry),
//! which implements [`Component`] and the optional capability markers
//! ([`Indexed`], [`TrackNew`]) for it. Store methods that only make sense for
//! some kinds are bounded on the marker traits, so calling them for any
//! other kind does not compile.

use std::fmt::Debug;
use std::hash::Hash;

use cairn_foundation::ThingId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::registry::{ComponentKind, Tables};
use crate::store::Store;
use crate::table::Table;

/// A registered component kind.
///
/// Components are plain values owned by the store. `Eq + Hash` are required
/// so any kind can be indexed by value.
pub trait Component:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + ExportRefs + 'static
{
    /// This kind's registry entry.
    const KIND: ComponentKind;
    /// Whether a value index is maintained for this kind.
    const INDEXED: bool;
    /// Whether new holders are recorded in a new-list.
    const TRACK_NEW: bool;

    #[doc(hidden)]
    fn table(tables: &Tables) -> &Table<Self>;

    #[doc(hidden)]
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

/// Kinds with a reverse lookup from value to holders.
pub trait Indexed: Component {}

/// Kinds whose new holders are tracked until explicitly cleared.
pub trait TrackNew: Component {}

/// Rewrites the thing references a component duplicates on export.
///
/// The default does nothing, which is right for components without
/// references. `remap` returns the id to use in the destination store, or
/// `None` when the referent cannot be carried over; the component decides
/// how to drop such a reference.
pub trait ExportRefs {
    /// Rewrites every duplicate-on-export reference in place.
    fn remap_refs(&mut self, remap: &mut dyn FnMut(ThingId) -> Option<ThingId>) {
        let _ = remap;
    }
}

/// A group of components attached together, in order.
///
/// Implemented for `()` and for tuples of up to eight components. Bundles are
/// only applied by the store itself, to things it has just put in the
/// directory, so the trait is sealed: code outside the crate cannot attach
/// a bundle to an arbitrary id.
///
/// ```compile_fail
/// use cairn_storage::Store;
/// use cairn_storage::components::Name;
///
/// let mut store = Store::new();
/// let id = store.create_obj(()).unwrap();
/// cairn_storage::component::sealed::Attach::attach_to((Name::new("x"),), &mut store, id);
/// ```
pub trait Bundle: sealed::Attach {}

pub(crate) mod sealed {
    use cairn_foundation::ThingId;

    use crate::store::Store;

    pub trait Attach {
        /// Attaches every component to `id`, which must already be in the
        /// directory.
        fn attach_to(self, store: &mut Store, id: ThingId);
    }
}

impl Bundle for () {}

impl sealed::Attach for () {
    fn attach_to(self, _store: &mut Store, _id: ThingId) {}
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {}

        impl<$($name: Component),+> sealed::Attach for ($($name,)+) {
            #[allow(non_snake_case)]
            fn attach_to(self, store: &mut Store, id: ThingId) {
                let ($($name,)+) = self;
                $(store.attach(id, $name);)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);

/// A generic operation over one component kind.
///
/// [`ComponentKind::visit`] dispatches a runtime kind to the matching
/// monomorphized `visit::<T>()`.
pub(crate) trait KindVisitor {
    type Output;

    fn visit<T: Component>(&mut self) -> Self::Output;
}
