//! Interning registry
//!
//! One table per record type maps a normalized identity key to a weak
//! handle on the live instance. A lookup that still resolves is a cache hit
//! and never runs the build function. Entries are removed by the instance's
//! drop hook, so the registry never keeps a record alive.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::evolution;
use super::normalizer::{existing_key, normalize, IdentityRemap};
use crate::config::RegistryConfig;
use crate::domain::entities::{Draft, Handle, Interned, Record};
use crate::domain::value_objects::{Fields, Identity, Key, RegistryStats, TableStats};
use crate::error::{RecordError, RecordResult};

thread_local! {
    static GLOBAL: Registry = Registry::new();
}

/// Owner of every per-type table.
///
/// Cloning is cheap and yields another handle to the same tables.
#[derive(Clone)]
pub struct Registry {
    state: Rc<RefCell<RegistryState>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState::new(config))),
        }
    }

    /// The default registry of the current thread, created on first use
    pub fn global() -> Self {
        GLOBAL.with(Registry::clone)
    }

    pub(crate) fn from_state(state: Rc<RefCell<RegistryState>>) -> Self {
        Self { state }
    }

    pub fn config(&self) -> RegistryConfig {
        self.state.borrow().config.clone()
    }

    /// Replace the configuration. Only allowed while no table exists.
    pub fn configure(&self, config: RegistryConfig) -> RecordResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.tables.is_empty() {
            return Err(RecordError::RegistryInUse {
                live: state.tables.len(),
            });
        }
        debug!(?config, "registry reconfigured");
        state.config = config;
        Ok(())
    }

    /// Intern a record from constructor arguments.
    ///
    /// The identity is derived from `args`; `R::create` only runs on a miss.
    pub fn from_args<R: Record>(&self, args: Fields) -> RecordResult<Handle<R>> {
        let identity = R::derive_identity(&args)?;
        self.from_closure(identity, move || R::create(args))
    }

    /// Return the live instance for `identity`, or build, store and return
    /// a new one.
    ///
    /// `build` runs at most once and only on a miss. A build error leaves
    /// no trace in the tables.
    pub fn from_closure<R, F, D>(&self, identity: Identity, build: F) -> RecordResult<Handle<R>>
    where
        R: Record,
        F: FnOnce() -> RecordResult<D>,
        D: Into<Draft<R>>,
    {
        let lookup = self.state.borrow_mut().lookup::<R>(&identity);
        let (key, fresh) = match lookup? {
            Lookup::Hit(inner) => {
                trace!(record = R::name(), %identity, "intern hit");
                return Ok(Handle::from_inner(inner));
            }
            Lookup::Miss { key, fresh } => (key, fresh),
        };
        trace!(record = R::name(), %identity, "intern miss");

        // build may intern other records, so the state must not be borrowed
        let draft: Draft<R> = match build() {
            Ok(draft) => draft.into(),
            Err(err) => {
                self.state
                    .borrow_mut()
                    .abandon(TypeId::of::<R>(), &key, fresh);
                return Err(err);
            }
        };

        let (value, stamped) = draft.into_parts();
        let inner = Rc::new(Interned::new(
            value,
            stamped.unwrap_or(identity),
            key.clone(),
            Rc::downgrade(&self.state),
        ));

        let existing = self.state.borrow_mut().store::<R>(key, &inner);
        match existing {
            Some(existing) => {
                // dropped here, after the borrow, so its release hook can run
                drop(inner);
                Ok(Handle::from_inner(existing))
            }
            None => Ok(Handle::from_inner(inner)),
        }
    }

    /// Derive a new interned record from `record` with `overrides` applied
    pub fn with<R: Record>(&self, record: &Handle<R>, overrides: Fields) -> RecordResult<Handle<R>> {
        evolution::evolve(self, record, overrides)
    }

    /// Number of live instances of `R`
    pub fn live_count<R: Record>(&self) -> usize {
        self.state
            .borrow()
            .tables
            .get(&TypeId::of::<R>())
            .map_or(0, Table::live)
    }

    /// Number of record types with a table
    pub fn table_count(&self) -> usize {
        self.state.borrow().tables.len()
    }

    /// Number of composite identities of `R` holding an integer key
    pub fn composite_key_count<R: Record>(&self) -> usize {
        self.state
            .borrow()
            .tables
            .get(&TypeId::of::<R>())
            .and_then(|table| table.remap.as_ref())
            .map_or(0, IdentityRemap::len)
    }

    /// Snapshot of every table
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.borrow();
        let mut tables: Vec<TableStats> = state
            .tables
            .values()
            .map(|table| TableStats {
                record: table.record,
                object_keyed: table.kind == KeyKind::Object,
                entries: table.entries.len(),
                live: table.live(),
                composite_keys: table.remap.as_ref().map_or(0, IdentityRemap::len),
            })
            .collect();
        tables.sort_by(|a, b| a.record.cmp(b.record));
        RegistryStats { tables }
    }

    /// Whether a live instance of `R` exists for `identity`.
    ///
    /// Never allocates a composite key.
    pub fn contains<R: Record>(&self, identity: &Identity) -> bool {
        let state = self.state.borrow();
        let Some(table) = state.tables.get(&TypeId::of::<R>()) else {
            return false;
        };
        existing_key(identity, table.remap.as_ref())
            .and_then(|key| table.entries.get(&key))
            .is_some_and(|weak| weak.strong_count() > 0)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Registry")
                .field("config", &state.config)
                .field("tables", &state.tables.len())
                .finish(),
            Err(_) => f.write_str("Registry { <busy> }"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Object,
    Scalar,
}

impl KeyKind {
    fn of(identity: &Identity) -> Self {
        if identity.is_object() {
            KeyKind::Object
        } else {
            KeyKind::Scalar
        }
    }

    fn of_key(key: &Key) -> Self {
        if key.is_object() {
            KeyKind::Object
        } else {
            KeyKind::Scalar
        }
    }
}

struct Table {
    record: &'static str,
    kind: KeyKind,
    entries: HashMap<Key, Weak<dyn Any>>,
    remap: Option<IdentityRemap>,
}

impl Table {
    fn new(record: &'static str, kind: KeyKind) -> Self {
        debug!(record, ?kind, "record table created");
        Self {
            record,
            kind,
            entries: HashMap::new(),
            remap: None,
        }
    }

    fn live(&self) -> usize {
        self.entries
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.remap.as_ref().map_or(true, IdentityRemap::is_empty)
    }

    fn resolve<R: Record>(&self, key: &Key) -> Option<Rc<Interned<R>>> {
        self.entries
            .get(key)
            .and_then(Weak::upgrade)
            .and_then(|any| any.downcast::<Interned<R>>().ok())
    }
}

enum Lookup<R: Record> {
    Hit(Rc<Interned<R>>),
    Miss { key: Key, fresh: bool },
}

/// Tables shared by every clone of a [`Registry`]
pub(crate) struct RegistryState {
    config: RegistryConfig,
    tables: HashMap<TypeId, Table>,
}

impl RegistryState {
    fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            tables: HashMap::new(),
        }
    }

    fn lookup<R: Record>(&mut self, identity: &Identity) -> RecordResult<Lookup<R>> {
        let type_id = TypeId::of::<R>();
        let result = self.lookup_in::<R>(type_id, identity);
        if result.is_err() {
            self.drop_if_empty(type_id);
        }
        result
    }

    fn lookup_in<R: Record>(&mut self, type_id: TypeId, identity: &Identity) -> RecordResult<Lookup<R>> {
        let Self { config, tables } = self;
        let kind = KeyKind::of(identity);
        let table = tables
            .entry(type_id)
            .or_insert_with(|| Table::new(R::name(), kind));

        if table.kind != kind {
            return Err(RecordError::MixedIdentityKinds {
                record: R::name().to_string(),
            });
        }

        let (key, fresh) = normalize(
            identity,
            &mut table.remap,
            config.composite_lookup,
            config.composite_key_limit,
        )
        .map_err(|exhausted| RecordError::KeyExhausted {
            record: R::name().to_string(),
            limit: exhausted.limit,
        })?;

        match table.resolve::<R>(&key) {
            Some(inner) => Ok(Lookup::Hit(inner)),
            None => Ok(Lookup::Miss { key, fresh }),
        }
    }

    /// Store `inner` under `key`, unless a live instance got there first
    fn store<R: Record>(&mut self, key: Key, inner: &Rc<Interned<R>>) -> Option<Rc<Interned<R>>> {
        let kind = KeyKind::of_key(&key);
        let table = self
            .tables
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Table::new(R::name(), kind));

        if let Some(existing) = table.resolve::<R>(&key) {
            return Some(existing);
        }

        let weak: Weak<Interned<R>> = Rc::downgrade(inner);
        let weak: Weak<dyn Any> = weak;
        table.entries.insert(key, weak);
        None
    }

    /// Undo a miss whose build failed
    fn abandon(&mut self, type_id: TypeId, key: &Key, fresh: bool) {
        if let (Some(table), Key::Composite(slot)) = (self.tables.get_mut(&type_id), key) {
            let occupied = table
                .entries
                .get(key)
                .is_some_and(|weak| weak.strong_count() > 0);
            if fresh && !occupied {
                table.entries.remove(key);
                if let Some(remap) = table.remap.as_mut() {
                    remap.release(*slot);
                }
            }
        }
        self.drop_if_empty(type_id);
    }

    /// Drop hook of an interned instance, keyed by where it was stored
    pub(crate) fn release(&mut self, type_id: TypeId, record: &str, key: &Key, identity: &Identity) {
        let Some(table) = self.tables.get_mut(&type_id) else {
            return;
        };

        // a live instance under the same key is a newer one; leave it
        let dead = table
            .entries
            .get(key)
            .is_some_and(|weak| weak.strong_count() == 0);
        if !dead {
            return;
        }

        table.entries.remove(key);
        if let (Key::Composite(slot), Some(remap)) = (key, table.remap.as_mut()) {
            remap.release(*slot);
        }
        trace!(record, %identity, "record evicted");
        self.drop_if_empty(type_id);
    }

    fn drop_if_empty(&mut self, type_id: TypeId) {
        if !self.config.drop_empty_tables {
            return;
        }
        if !self.tables.get(&type_id).is_some_and(Table::is_empty) {
            return;
        }
        if let Some(table) = self.tables.remove(&type_id) {
            debug!(record = table.record, "record table dropped");
        }
    }
}
