//! The authoritative thing/component store.
//!
//! The `Store` owns the thing directory and one table per component kind.
//! Every mutation goes through it, so the directory masks, value indices,
//! and new-lists always agree with the tables.
//!
//! Directory and tables are persistent maps, so cloning a store is cheap.

use cairn_foundation::{Error, IdAllocator, IdRange, Result, ThingId};
use im::OrdMap;
use tracing::debug;

use crate::component::sealed::Attach;
use crate::component::{Bundle, Component, Indexed, KindVisitor, TrackNew};
use crate::config::StoreConfig;
use crate::registry::{ComponentKind, Tables};
use crate::table::Table;
use crate::thing::Thing;

/// Thing directory plus per-kind component tables.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub(crate) directory: OrdMap<ThingId, Thing>,
    pub(crate) ids: IdAllocator,
    pub(crate) tables: Tables,
    pub(crate) config: StoreConfig,
}

impl Store {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the store's configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Identity & lifecycle ---

    /// Creates an ordinary thing holding `components`, added in order.
    ///
    /// Ids increase monotonically and are never reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the ordinary id space is used up.
    pub fn create_obj<B: Bundle>(&mut self, components: B) -> Result<ThingId> {
        let id = self.ids.allocate().ok_or_else(Error::ids_exhausted)?;
        self.directory.insert(id, Thing::new(id));
        components.attach_to(self, id);
        debug!(%id, "created thing");
        Ok(id)
    }

    /// Registers a terrain prototype at a fixed id in `[1, TERRAIN_MAX_ID)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is outside the terrain band or already
    /// registered.
    pub fn register_terrain<B: Bundle>(&mut self, id: ThingId, components: B) -> Result<()> {
        self.register(IdRange::Terrain, id, components)
    }

    /// Registers a special singleton at a fixed id in
    /// `[TERRAIN_MAX_ID, SPECIAL_MAX_ID)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is outside the special band or already
    /// registered.
    pub fn register_special<B: Bundle>(&mut self, id: ThingId, components: B) -> Result<()> {
        self.register(IdRange::Special, id, components)
    }

    fn register<B: Bundle>(&mut self, range: IdRange, id: ThingId, components: B) -> Result<()> {
        if !range.contains(id) {
            return Err(Error::id_out_of_range(id, range));
        }
        if self.directory.contains_key(&id) {
            return Err(Error::already_registered(id));
        }
        self.directory.insert(id, Thing::new(id));
        components.attach_to(self, id);
        debug!(%id, %range, "registered built-in thing");
        Ok(())
    }

    /// Looks up a thing's directory record.
    #[must_use]
    pub fn get_obj(&self, id: ThingId) -> Option<&Thing> {
        self.directory.get(&id)
    }

    /// Destroys an ordinary thing, removing every component it holds.
    ///
    /// # Errors
    ///
    /// Returns an error for terrain and special ids, or if `id` is absent.
    pub fn destroy_obj(&mut self, id: ThingId) -> Result<()> {
        if id.is_builtin() {
            return Err(Error::not_destroyable(id));
        }
        let thing = *self.get_obj(id).ok_or_else(|| Error::thing_not_found(id))?;
        for kind in thing.kinds() {
            kind.visit(&mut Strip { store: self, id });
        }
        self.directory.remove(&id);
        debug!(%id, "destroyed thing");
        Ok(())
    }

    /// Number of things in the directory, built-ins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Returns true if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Iterates directory records in id order.
    pub fn things(&self) -> impl Iterator<Item = &Thing> + '_ {
        self.directory.values()
    }

    /// The id the next [`create_obj`](Self::create_obj) will return.
    #[must_use]
    pub fn next_id(&self) -> ThingId {
        self.ids.peek()
    }

    /// Kinds held by `id`, in registry order. Empty if `id` is absent.
    #[must_use]
    pub fn components_of(&self, id: ThingId) -> Vec<ComponentKind> {
        self.get_obj(id)
            .map(|thing| thing.kinds().collect())
            .unwrap_or_default()
    }

    // --- Per-kind operations ---

    /// Attaches `component` to `id`, replacing any value of the same kind.
    ///
    /// For indexed kinds the id is appended to the new value's bucket; the
    /// bucket of a replaced value is not cleaned, so [`remove`](Self::remove)
    /// first when moving a thing between values. For track-new kinds the id
    /// is appended to the new-list even if already present.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the directory.
    pub fn add<T: Component>(&mut self, id: ThingId, component: T) -> Result<()> {
        if !self.directory.contains_key(&id) {
            return Err(Error::thing_not_found(id));
        }
        self.attach(id, component);
        Ok(())
    }

    /// Detaches kind `T` from `id`, returning the removed value.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the directory.
    pub fn remove<T: Component>(&mut self, id: ThingId) -> Result<Option<T>> {
        if !self.directory.contains_key(&id) {
            return Err(Error::thing_not_found(id));
        }
        Ok(self.detach::<T>(id))
    }

    /// Gets the `T` held by `id`.
    #[must_use]
    pub fn get<T: Component>(&self, id: ThingId) -> Option<&T> {
        T::table(&self.tables).get(id)
    }

    /// Checks if `id` holds a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, id: ThingId) -> bool {
        T::table(&self.tables).contains(id)
    }

    /// All holders of `T`.
    #[must_use]
    pub fn get_all<T: Component>(&self) -> Vec<ThingId> {
        T::table(&self.tables).ids().collect()
    }

    /// Holders of exactly `value`, in the order they acquired it.
    #[must_use]
    pub fn get_all_by<T: Indexed>(&self, value: &T) -> &[ThingId] {
        T::table(&self.tables).holders_of(value)
    }

    /// Ids that acquired `T` since the last [`clear_new`](Self::clear_new),
    /// duplicates included.
    #[must_use]
    pub fn get_all_new<T: TrackNew>(&self) -> &[ThingId] {
        T::table(&self.tables).fresh()
    }

    /// Empties the new-list for `T`; stored values are unaffected.
    pub fn clear_new<T: TrackNew>(&mut self) {
        T::table_mut(&mut self.tables).clear_fresh();
    }

    /// Read access to the whole table for `T`.
    #[must_use]
    pub fn table<T: Component>(&self) -> &Table<T> {
        T::table(&self.tables)
    }

    /// Stores `component` for a thing known to be in the directory.
    pub(crate) fn attach<T: Component>(&mut self, id: ThingId, component: T) {
        let Some(thing) = self.directory.get_mut(&id) else {
            return;
        };
        thing.systems.insert(T::KIND.bit());
        T::table_mut(&mut self.tables).insert(id, component);
    }

    fn detach<T: Component>(&mut self, id: ThingId) -> Option<T> {
        if let Some(thing) = self.directory.get_mut(&id) {
            thing.systems.remove(T::KIND.bit());
        }
        T::table_mut(&mut self.tables).remove(id)
    }
}

/// Detaches one kind from a thing being destroyed.
struct Strip<'a> {
    store: &'a mut Store,
    id: ThingId,
}

impl KindVisitor for Strip<'_> {
    type Output = ();

    fn visit<T: Component>(&mut self) {
        self.store.detach::<T>(self.id);
    }
}
