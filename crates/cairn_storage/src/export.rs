//! Cross-store export.
//!
//! Exporting copies a thing into another store under a freshly allocated id,
//! together with every thing it reaches through duplicate-on-export
//! references ([`ExportRefs`](crate::component::ExportRefs)). A memo of
//! `source id -> destination id` covers the whole call, so a dependent
//! reachable along several paths is copied once and a reference cycle
//! terminates.
//!
//! References to terrain and special things are not copied: they resolve to
//! the same id when the destination has registered it, and are dropped
//! otherwise.

use std::collections::HashMap;

use cairn_foundation::ThingId;
use tracing::debug;

use crate::component::{Component, KindVisitor};
use crate::store::Store;

/// Source-to-destination ids assigned during one export call.
pub type ExportMemo = HashMap<ThingId, ThingId>;

impl Store {
    /// Copies `id` and its dependents into `dest`.
    ///
    /// Returns the root's id in `dest`, or `None` if `id` is not in this
    /// store. A dependent that cannot be copied because `dest` has run out of
    /// ids is dropped like a dangling reference.
    pub fn export_obj(&self, id: ThingId, dest: &mut Store) -> Option<ThingId> {
        let mut memo = ExportMemo::new();
        let root = self.export_with(id, dest, &mut memo)?;
        debug!(source = %id, dest = %root, copied = memo.len(), "exported thing");
        Some(root)
    }

    /// Copies `id` into `dest` unless `memo` already holds a copy.
    ///
    /// Several exports sharing one memo copy each dependent once across all
    /// of them.
    pub fn export_with(
        &self,
        id: ThingId,
        dest: &mut Store,
        memo: &mut ExportMemo,
    ) -> Option<ThingId> {
        if let Some(copied) = memo.get(&id) {
            return Some(*copied);
        }
        let thing = *self.get_obj(id)?;

        let copy = dest.create_obj(()).ok()?;
        memo.insert(id, copy);
        for kind in thing.kinds() {
            kind.visit(&mut CopyComponent {
                source: self,
                dest: &mut *dest,
                memo: &mut *memo,
                from: id,
                to: copy,
            });
        }
        Some(copy)
    }

    /// Resolves a reference found inside an exported value.
    fn export_ref(&self, id: ThingId, dest: &mut Store, memo: &mut ExportMemo) -> Option<ThingId> {
        if id.is_builtin() {
            return dest.get_obj(id).map(|thing| thing.id);
        }
        self.export_with(id, dest, memo)
    }
}

/// Copies one kind from an exported thing to its copy.
struct CopyComponent<'a> {
    source: &'a Store,
    dest: &'a mut Store,
    memo: &'a mut ExportMemo,
    from: ThingId,
    to: ThingId,
}

impl KindVisitor for CopyComponent<'_> {
    type Output = ();

    fn visit<T: Component>(&mut self) {
        let Some(value) = self.source.get::<T>(self.from) else {
            return;
        };
        let mut value = value.clone();
        let source = self.source;
        let dest = &mut *self.dest;
        let memo = &mut *self.memo;
        value.remap_refs(&mut |referent| source.export_ref(referent, dest, memo));
        self.dest.attach(self.to, value);
    }
}
