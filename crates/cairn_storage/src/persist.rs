//! Block-structured save and load.
//!
//! Saved data is a `things` block followed by one block per component kind,
//! in registry order:
//!
//! ```text
//! things { next_id, count, thing* }
//! <kind> { count, entry*, [new] }     entry = (id, value); new only for track-new kinds
//! ```
//!
//! Only ordinary things are written. Indices are never stored: records of an
//! indexed kind are written bucket by bucket so that re-inserting them in
//! file order rebuilds the same bucket order.
//!
//! Loading builds a complete new store from the source and the pre-load
//! store, and only replaces the target once everything has been read. The
//! pre-load store supplies terrain and special things, which always win over
//! anything the file says about reserved ids.

use std::collections::HashSet;

use cairn_foundation::{Error, IdAllocator, Result, Systems, ThingId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::component::{Component, KindVisitor};
use crate::document::{BlockDocument, BlockWriter};
use crate::registry::ComponentKind;
use crate::store::Store;
use crate::thing::Thing;

/// Name of the block holding the directory.
pub const THINGS_BLOCK: &str = "things";

/// Receives saved data.
pub trait SaveSink {
    /// Opens a nested block.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept a block here.
    fn begin_block(&mut self, name: &str) -> Result<()>;

    /// Closes the innermost open block.
    ///
    /// # Errors
    ///
    /// Returns an error if no block is open.
    fn end_block(&mut self) -> Result<()>;

    /// Writes a named value into the current block.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn put<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()>;
}

/// Supplies saved data, in the order it was written.
///
/// Every method fails with a load error ([`Error::is_load`]) when the next
/// entry is missing or is not what was asked for.
pub trait LoadSource {
    /// Enters the next entry, which must be a block named `name`.
    ///
    /// # Errors
    ///
    /// Returns a load failure if the next entry is anything else.
    fn check_and_enter_block(&mut self, name: &str) -> Result<()>;

    /// Leaves the current block, which must be fully consumed.
    ///
    /// # Errors
    ///
    /// Returns a load failure if entries remain or no block is open.
    fn check_and_leave_block(&mut self) -> Result<()>;

    /// Decodes the next entry, which must be a value named `name`.
    ///
    /// # Errors
    ///
    /// Returns a load failure if the entry is missing, misnamed, or corrupt.
    fn parse<T: DeserializeOwned>(&mut self, name: &str) -> Result<T>;
}

impl Store {
    /// Writes the store to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a block or value.
    pub fn save<S: SaveSink>(&self, sink: &mut S) -> Result<()> {
        let things: Vec<&Thing> = self
            .directory
            .values()
            .filter(|thing| self.persists(thing.id))
            .collect();

        sink.begin_block(THINGS_BLOCK)?;
        sink.put("next_id", &self.ids.peek())?;
        sink.put("count", &(things.len() as u64))?;
        for thing in &things {
            sink.put("thing", *thing)?;
        }
        sink.end_block()?;

        for kind in ComponentKind::ALL {
            kind.visit(&mut SaveTable {
                store: self,
                sink: &mut *sink,
            })?;
        }

        info!(
            things = things.len(),
            next_id = %self.ids.peek(),
            "saved store"
        );
        Ok(())
    }

    /// Replaces the store's contents with data read from `source`.
    ///
    /// Terrain and special things registered in this store are kept as they
    /// are (unless the configuration says otherwise). On failure the store
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a load failure if a block is missing, out of order, truncated,
    /// or inconsistent.
    pub fn load<L: LoadSource>(&mut self, source: &mut L) -> Result<()> {
        let loaded = Self::read_from(source, self)?;
        *self = loaded;
        Ok(())
    }

    /// Builds a store from `source`, taking terrain and special things from
    /// `previous`.
    ///
    /// The new store inherits `previous`'s configuration.
    ///
    /// # Errors
    ///
    /// Returns a load failure if a block is missing, out of order, truncated,
    /// or inconsistent.
    pub fn read_from<L: LoadSource>(source: &mut L, previous: &Store) -> Result<Store> {
        let mut store = Store::with_config(previous.config.clone());

        let saved_masks = store
            .read_things(source, previous)
            .map_err(|e| locate(e, THINGS_BLOCK))?;

        for kind in ComponentKind::ALL {
            kind.visit(&mut LoadTable {
                source: &mut *source,
                store: &mut store,
                previous,
            })
            .map_err(|e| locate(e, kind.name()))?;
        }

        store.settle_masks(&saved_masks)?;

        info!(
            things = saved_masks.len(),
            next_id = %store.ids.peek(),
            "loaded store"
        );
        Ok(store)
    }

    /// Saves into a fresh [`BlockDocument`].
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    pub fn save_document(&self) -> Result<BlockDocument> {
        let mut writer = BlockWriter::new();
        self.save(&mut writer)?;
        writer.finish()
    }

    /// Loads from a [`BlockDocument`], rejecting trailing data.
    ///
    /// # Errors
    ///
    /// Returns a load failure as [`load`](Self::load) does, or if the
    /// document holds entries past the last component block.
    pub fn load_document(&mut self, document: &BlockDocument) -> Result<()> {
        let mut reader = document.reader();
        let loaded = Self::read_from(&mut reader, self)?;
        reader.finish()?;
        *self = loaded;
        Ok(())
    }

    /// Saves to `MessagePack` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.save_document()?.to_bytes()
    }

    /// Loads from bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns a load failure if the bytes are corrupt or inconsistent.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let document = BlockDocument::from_bytes(bytes)?;
        self.load_document(&document)
    }

    fn persists(&self, id: ThingId) -> bool {
        id.is_ordinary() || self.config.persist_builtin
    }

    /// Reads the `things` block into the directory and returns the saved
    /// mask of every ordinary thing.
    fn read_things<L: LoadSource>(
        &mut self,
        source: &mut L,
        previous: &Store,
    ) -> Result<Vec<(ThingId, Systems)>> {
        source.check_and_enter_block(THINGS_BLOCK)?;

        let next: ThingId = source.parse("next_id")?;
        self.ids = IdAllocator::resume(next).ok_or_else(|| {
            Error::load(format!("id counter {next} is inside the reserved range"))
        })?;

        let count: u64 = source.parse("count")?;
        let mut saved = Vec::new();
        let mut skipped = 0usize;
        for _ in 0..count {
            let thing: Thing = source.parse("thing")?;
            if thing.id.is_builtin() {
                skipped += 1;
                continue;
            }
            if !self.ids.has_issued(thing.id) {
                return Err(Error::load(format!(
                    "thing {} was never issued (counter at {next})",
                    thing.id
                )));
            }
            if self.directory.contains_key(&thing.id) {
                return Err(Error::load(format!("duplicate thing {}", thing.id)));
            }
            self.directory.insert(thing.id, Thing::new(thing.id));
            saved.push((thing.id, thing.systems));
        }
        source.check_and_leave_block()?;

        if skipped > 0 {
            warn!(skipped, "ignored saved records for built-in things");
        }
        if self.config.restore_builtin {
            for thing in previous.directory.values().filter(|t| t.id.is_builtin()) {
                self.directory.insert(thing.id, *thing);
            }
        }
        Ok(saved)
    }

    /// Checks (or repairs) every ordinary thing's mask against the tables.
    fn settle_masks(&self, saved: &[(ThingId, Systems)]) -> Result<()> {
        for (id, saved_mask) in saved {
            let Some(thing) = self.directory.get(id) else {
                continue;
            };
            if thing.systems == *saved_mask {
                continue;
            }
            if self.config.verify_masks {
                return Err(Error::load(format!(
                    "thing {id} was saved with {saved_mask:?} but holds {:?}",
                    thing.systems
                )));
            }
            debug!(%id, "repaired component mask");
        }
        Ok(())
    }
}

/// Adds `block` to errors raised outside the source, which carry no path.
fn locate(err: Error, block: &str) -> Error {
    if err.context.is_some() {
        err
    } else {
        err.in_block(block)
    }
}

struct SaveTable<'a, S> {
    store: &'a Store,
    sink: &'a mut S,
}

impl<S: SaveSink> KindVisitor for SaveTable<'_, S> {
    type Output = Result<()>;

    fn visit<T: Component>(&mut self) -> Result<()> {
        let table = self.store.table::<T>();
        let records: Vec<(ThingId, &T)> = table
            .save_order()
            .into_iter()
            .filter(|(id, _)| self.store.persists(*id))
            .collect();

        self.sink.begin_block(T::KIND.name())?;
        self.sink.put("count", &(records.len() as u64))?;
        for record in &records {
            self.sink.put("entry", record)?;
        }
        if T::TRACK_NEW {
            self.sink.put("new", &table.fresh())?;
        }
        self.sink.end_block()
    }
}

struct LoadTable<'a, L> {
    source: &'a mut L,
    store: &'a mut Store,
    previous: &'a Store,
}

impl<L: LoadSource> KindVisitor for LoadTable<'_, L> {
    type Output = Result<()>;

    fn visit<T: Component>(&mut self) -> Result<()> {
        self.source.check_and_enter_block(T::KIND.name())?;

        let count: u64 = self.source.parse("count")?;
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut skipped = 0usize;
        for _ in 0..count {
            let (id, value): (ThingId, T) = self.source.parse("entry")?;
            if id.is_builtin() {
                skipped += 1;
                continue;
            }
            if !self.store.directory.contains_key(&id) {
                return Err(Error::load(format!("record for unknown thing {id}")));
            }
            if !seen.insert(id) {
                return Err(Error::load(format!("duplicate record for thing {id}")));
            }
            records.push((id, value));
        }
        let fresh: Vec<ThingId> = if T::TRACK_NEW {
            self.source.parse("new")?
        } else {
            Vec::new()
        };
        self.source.check_and_leave_block()?;

        if skipped > 0 {
            warn!(kind = T::KIND.name(), skipped, "ignored saved records for built-in things");
        }

        let restore_builtin = self.store.config.restore_builtin;
        let table = T::table_mut(&mut self.store.tables);
        if restore_builtin {
            for (id, value) in self.previous.table::<T>().save_order() {
                if id.is_builtin() {
                    table.restore(id, value.clone());
                }
            }
        }
        for (id, value) in records {
            table.restore(id, value);
            if let Some(thing) = self.store.directory.get_mut(&id) {
                thing.systems.insert(T::KIND.bit());
            }
        }
        table.restore_fresh(fresh);
        Ok(())
    }
}
