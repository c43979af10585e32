//! Object key storage with versioning support.
//!
//! Provides [`ObjectStore`], an enum dispatching between [`KeyStore`]
//! (un-versioned) and [`VersionedKeyStore`] (versioned). Uses `BTreeMap`
//! internally so keys are always sorted, which listing relies on for
//! lexicographic order and marker-based resumption.
//!
//! Version IDs are assigned by the caller; the stores only order and replace
//! versions.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use tracing::debug;

use super::object::{ObjectHead, ObjectVersion, S3Object};
use crate::utils::NULL_VERSION_ID;

// ---------------------------------------------------------------------------
// List result types
// ---------------------------------------------------------------------------

/// Result of a `ListObjects` / `ListObjectsV2` walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    /// The current objects that match the listing criteria, in key order.
    pub objects: Vec<ObjectHead>,
    /// Common prefixes when a delimiter is used, sorted and deduplicated.
    pub common_prefixes: Vec<String>,
    /// Whether more matching entries exist past this page.
    pub is_truncated: bool,
    /// The last key or common prefix returned, when truncated.
    pub next_marker: Option<String>,
}

/// Result of a `ListObjectVersions` walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionListResult {
    /// Object versions and delete markers, by key, newest first within a key.
    pub versions: Vec<VersionListEntry>,
    /// Common prefixes when a delimiter is used, sorted and deduplicated.
    pub common_prefixes: Vec<String>,
    /// Whether the result is truncated.
    pub is_truncated: bool,
    /// The key marker for the next page.
    pub next_key_marker: Option<String>,
    /// The version-id marker for the next page.
    pub next_version_id_marker: Option<String>,
}

/// A single entry in a version listing, augmented with `is_latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionListEntry {
    /// The underlying object version or delete marker.
    pub version: ObjectVersion,
    /// Whether this is the newest version for its key.
    pub is_latest: bool,
}

// ---------------------------------------------------------------------------
// ObjectStore (enum dispatch)
// ---------------------------------------------------------------------------

/// Top-level object store that dispatches to either an un-versioned or
/// versioned backing store.
#[derive(Debug)]
pub enum ObjectStore {
    /// Un-versioned storage. Each key maps to exactly one object.
    Unversioned(KeyStore),
    /// Versioned storage. Each key maps to an ordered list of versions.
    Versioned(VersionedKeyStore),
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::Unversioned(KeyStore::default())
    }
}

impl ObjectStore {
    /// Store a version.
    ///
    /// Un-versioned stores overwrite the key's single entry (a delete marker
    /// there simply removes the key). Versioned stores prepend, replacing any
    /// existing `"null"` version first when the new version is `"null"`.
    pub fn insert(&mut self, version: ObjectVersion) {
        match self {
            Self::Unversioned(ks) => match version {
                ObjectVersion::Object(obj) => {
                    ks.put(*obj);
                }
                ObjectVersion::DeleteMarker(dm) => {
                    ks.delete(&dm.key);
                }
            },
            Self::Versioned(vs) => vs.insert(version),
        }
    }

    /// Get the current object for a key.
    ///
    /// Returns `None` when the key is absent or its newest version is a
    /// delete marker.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&S3Object> {
        match self {
            Self::Unversioned(ks) => ks.get(key),
            Self::Versioned(vs) => vs.get(key),
        }
    }

    /// Get a specific version of an object by key and version ID.
    #[must_use]
    pub fn get_version(&self, key: &str, version_id: &str) -> Option<&S3Object> {
        match self {
            // In un-versioned stores, the only valid version_id is "null".
            Self::Unversioned(ks) => {
                if version_id == NULL_VERSION_ID {
                    ks.get(key)
                } else {
                    None
                }
            }
            Self::Versioned(vs) => vs.get_version(key, version_id),
        }
    }

    /// Check if a specific version ID for a key is a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self, key: &str, version_id: &str) -> bool {
        match self {
            Self::Unversioned(_) => false,
            Self::Versioned(vs) => vs.is_delete_marker(key, version_id),
        }
    }

    /// Remove a key's single entry (un-versioned semantics).
    ///
    /// Versioned stores never drop history this way; use
    /// [`ObjectStore::insert`] with a delete marker instead.
    pub fn remove(&mut self, key: &str) -> Option<S3Object> {
        match self {
            Self::Unversioned(ks) => ks.delete(key),
            Self::Versioned(_) => None,
        }
    }

    /// Delete a specific version of an object.
    pub fn delete_version(&mut self, key: &str, version_id: &str) -> Option<ObjectVersion> {
        match self {
            Self::Unversioned(ks) => {
                if version_id == NULL_VERSION_ID {
                    ks.delete(key).map(|o| ObjectVersion::Object(Box::new(o)))
                } else {
                    None
                }
            }
            Self::Versioned(vs) => vs.delete_version(key, version_id),
        }
    }

    /// List current objects matching a prefix, delimiter, marker, and max-keys.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ListResult {
        match self {
            Self::Unversioned(ks) => ks.list_objects(prefix, delimiter, marker, max_keys),
            Self::Versioned(vs) => vs.list_objects(prefix, delimiter, marker, max_keys),
        }
    }

    /// List object versions.
    #[must_use]
    pub fn list_object_versions(
        &self,
        prefix: &str,
        delimiter: &str,
        key_marker: &str,
        version_id_marker: &str,
        max_keys: usize,
    ) -> VersionListResult {
        match self {
            Self::Unversioned(ks) => {
                ks.list_object_versions(prefix, delimiter, key_marker, max_keys)
            }
            Self::Versioned(vs) => {
                vs.list_object_versions(prefix, delimiter, key_marker, version_id_marker, max_keys)
            }
        }
    }

    /// Count of keys with a current (non-delete-marker) object.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unversioned(ks) => ks.len(),
            Self::Versioned(vs) => vs.len(),
        }
    }

    /// Whether the store contains zero current objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transition from un-versioned to versioned storage.
    ///
    /// If already versioned this is a no-op. Existing objects are migrated
    /// into single-element version lists and take the `"null"` version ID.
    pub fn transition_to_versioned(&mut self) {
        if let Self::Unversioned(ks) = self {
            debug!(keys = ks.len(), "transitioning object store from unversioned to versioned");
            let mut vs = VersionedKeyStore::default();
            for (key, mut obj) in std::mem::take(&mut ks.objects) {
                obj.version_id = Some(NULL_VERSION_ID.to_owned());
                vs.objects
                    .insert(key, vec![ObjectVersion::Object(Box::new(obj))]);
            }
            *self = Self::Versioned(vs);
        }
    }

    /// Whether the store is in versioned mode.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        matches!(self, Self::Versioned(_))
    }
}

// ---------------------------------------------------------------------------
// KeyStore (un-versioned)
// ---------------------------------------------------------------------------

/// Un-versioned key store. Each key maps to exactly one `S3Object`.
#[derive(Debug, Default)]
pub struct KeyStore {
    /// Sorted map of object key to object.
    objects: BTreeMap<String, S3Object>,
}

impl KeyStore {
    /// Insert or replace an object. Returns the previous object if any.
    pub fn put(&mut self, object: S3Object) -> Option<S3Object> {
        self.objects.insert(object.key.clone(), object)
    }

    /// Get an object by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&S3Object> {
        self.objects.get(key)
    }

    /// Remove an object by key. Returns the removed object if any.
    pub fn delete(&mut self, key: &str) -> Option<S3Object> {
        self.objects.remove(key)
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// List objects matching prefix, delimiter, marker, and max-keys.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ListResult {
        let page = walk_current(
            self.objects.range::<str, _>(start_bound(prefix, marker)),
            prefix,
            delimiter,
            marker,
            max_keys,
        );
        ListResult {
            objects: page.objects.into_iter().map(ObjectHead::from).collect(),
            common_prefixes: page.common_prefixes,
            is_truncated: page.is_truncated,
            next_marker: page.next_marker,
        }
    }

    /// List object versions: each object is its own, latest, version.
    #[must_use]
    fn list_object_versions(
        &self,
        prefix: &str,
        delimiter: &str,
        key_marker: &str,
        max_keys: usize,
    ) -> VersionListResult {
        let page = walk_current(
            self.objects.range::<str, _>(start_bound(prefix, key_marker)),
            prefix,
            delimiter,
            key_marker,
            max_keys,
        );
        let versions = page
            .objects
            .into_iter()
            .map(|obj| VersionListEntry {
                version: ObjectVersion::Object(Box::new(obj.clone())),
                is_latest: true,
            })
            .collect();
        VersionListResult {
            versions,
            common_prefixes: page.common_prefixes,
            is_truncated: page.is_truncated,
            next_key_marker: page.next_marker,
            next_version_id_marker: None,
        }
    }
}

// ---------------------------------------------------------------------------
// VersionedKeyStore
// ---------------------------------------------------------------------------

/// Versioned key store. Each key maps to an ordered list of versions
/// (newest first). The first entry is the "latest" version for any key.
#[derive(Debug, Default)]
pub struct VersionedKeyStore {
    /// Sorted map of object key to its version list (newest first).
    objects: BTreeMap<String, Vec<ObjectVersion>>,
}

impl VersionedKeyStore {
    /// Prepend a version to its key's history.
    ///
    /// A `"null"` version replaces any `"null"` version already in the
    /// history, so a key holds at most one.
    pub fn insert(&mut self, version: ObjectVersion) {
        debug!(
            key = version.key(),
            version_id = version.version_id_or_null(),
            delete_marker = version.is_delete_marker(),
            "storing version"
        );
        let history = self.objects.entry(version.key().to_owned()).or_default();
        if version.version_id() == Some(NULL_VERSION_ID) {
            history.retain(|v| v.version_id() != Some(NULL_VERSION_ID));
        }
        history.insert(0, version);
    }

    /// Get the current object for a key.
    ///
    /// Returns `None` if the key doesn't exist or if the latest version is a
    /// delete marker (per S3 semantics, the object appears deleted).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&S3Object> {
        self.objects
            .get(key)
            .and_then(|versions| versions.first()?.as_object())
    }

    /// Get a specific version of an object.
    #[must_use]
    pub fn get_version(&self, key: &str, version_id: &str) -> Option<&S3Object> {
        self.find(key, version_id).and_then(ObjectVersion::as_object)
    }

    /// Check if a specific version ID for a key is a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self, key: &str, version_id: &str) -> bool {
        self.find(key, version_id)
            .is_some_and(ObjectVersion::is_delete_marker)
    }

    fn find(&self, key: &str, version_id: &str) -> Option<&ObjectVersion> {
        self.objects
            .get(key)?
            .iter()
            .find(|v| v.version_id() == Some(version_id))
    }

    /// Remove a specific version (object or delete marker) entirely.
    ///
    /// The next newest version becomes current; a key whose history empties
    /// disappears.
    pub fn delete_version(&mut self, key: &str, version_id: &str) -> Option<ObjectVersion> {
        let versions = self.objects.get_mut(key)?;
        let idx = versions
            .iter()
            .position(|v| v.version_id() == Some(version_id))?;
        let removed = versions.remove(idx);
        if versions.is_empty() {
            self.objects.remove(key);
        }
        Some(removed)
    }

    /// Count of keys that have a non-delete-marker version as their latest
    /// entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects
            .values()
            .filter(|versions| versions.first().is_some_and(|v| !v.is_delete_marker()))
            .count()
    }

    /// Whether zero keys have a latest non-delete-marker version.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List the current object for each key, skipping keys whose newest
    /// version is a delete marker.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: usize,
    ) -> ListResult {
        let current = self
            .objects
            .range::<str, _>(start_bound(prefix, marker))
            .filter_map(|(key, versions)| Some((key, versions.first()?.as_object()?)));

        let page = walk_current(current, prefix, delimiter, marker, max_keys);
        ListResult {
            objects: page.objects.into_iter().map(ObjectHead::from).collect(),
            common_prefixes: page.common_prefixes,
            is_truncated: page.is_truncated,
            next_marker: page.next_marker,
        }
    }

    /// List all versions (objects and delete markers).
    ///
    /// With both markers set, the walk resumes inside `key_marker`'s history
    /// right after `version_id_marker`. If that version is gone, it resumes
    /// at the first older version, or at the start of the history when the
    /// missing marker is the null version. With only `key_marker`, it resumes
    /// at the next key.
    #[must_use]
    pub fn list_object_versions(
        &self,
        prefix: &str,
        delimiter: &str,
        key_marker: &str,
        version_id_marker: &str,
        max_keys: usize,
    ) -> VersionListResult {
        let mut walk = Walk::new(prefix, delimiter, key_marker, max_keys);
        let mut versions: Vec<VersionListEntry> = Vec::new();
        let mut next_version_id: Option<String> = None;

        let resume_inside_key = !key_marker.is_empty() && !version_id_marker.is_empty();
        let start = if resume_inside_key {
            (Bound::Included(key_marker), Bound::Unbounded)
        } else {
            start_bound(prefix, key_marker)
        };

        'keys: for (key, history) in self.objects.range::<str, _>(start) {
            match walk.visit(key) {
                Visit::Past => break,
                Visit::Skip => continue,
                Visit::Prefix(cp) => {
                    if !walk.push_prefix(cp) {
                        break;
                    }
                    next_version_id = None;
                    continue;
                }
                Visit::Entry => {}
            }

            let mut skipping = resume_inside_key && key == key_marker;
            let marker_present = skipping
                && history
                    .iter()
                    .any(|v| v.version_id_or_null() == version_id_marker);
            // A vanished null marker cannot be placed in the history.
            if skipping && !marker_present && version_id_marker == NULL_VERSION_ID {
                skipping = false;
            }
            for (idx, version) in history.iter().enumerate() {
                if skipping {
                    let id = version.version_id_or_null();
                    if marker_present {
                        if id == version_id_marker {
                            skipping = false;
                        }
                        continue;
                    }
                    if !sorts_before_marker(id, version_id_marker) {
                        continue;
                    }
                    skipping = false;
                }
                if !walk.admit(key) {
                    break 'keys;
                }
                next_version_id = Some(version.version_id_or_null().to_owned());
                versions.push(VersionListEntry {
                    version: version.clone(),
                    is_latest: idx == 0,
                });
            }
        }

        let is_truncated = walk.is_truncated;
        let page = walk.finish::<()>(Vec::new());
        VersionListResult {
            versions,
            common_prefixes: page.common_prefixes,
            is_truncated,
            next_key_marker: page.next_marker,
            next_version_id_marker: if is_truncated { next_version_id } else { None },
        }
    }
}

// ---------------------------------------------------------------------------
// Shared listing walk
// ---------------------------------------------------------------------------

/// Where a key-range scan should begin: just past `marker` when it lies at
/// or after `prefix`, otherwise at `prefix` itself.
fn start_bound<'a>(prefix: &'a str, marker: &'a str) -> (Bound<&'a str>, Bound<&'a str>) {
    if !marker.is_empty() && marker >= prefix {
        (Bound::Excluded(marker), Bound::Unbounded)
    } else {
        (Bound::Included(prefix), Bound::Unbounded)
    }
}

/// Whether version `id` is older than `marker`.
///
/// Generated IDs are fixed-width decimals, so string order is creation
/// order. A null ID has no place in that order and never qualifies.
fn sorts_before_marker(id: &str, marker: &str) -> bool {
    id != NULL_VERSION_ID && id.len() == marker.len() && id < marker
}

/// How a key takes part in a listing page.
#[derive(Debug, PartialEq, Eq)]
enum Visit {
    /// The key sorts after every key under the prefix; stop scanning.
    Past,
    /// The key contributes nothing.
    Skip,
    /// The key rolls up into a common prefix not yet reported.
    Prefix(String),
    /// The key is listed as an entry.
    Entry,
}

/// One page of a walk, before results are converted to the public types.
#[derive(Debug)]
struct WalkPage<T> {
    objects: Vec<T>,
    common_prefixes: Vec<String>,
    is_truncated: bool,
    next_marker: Option<String>,
}

/// Bookkeeping shared by every listing walk.
///
/// Entries and newly seen common prefixes both take one slot out of
/// `max_keys`. A common prefix that sorts at or before the marker was
/// reported by an earlier page and is never repeated.
#[derive(Debug)]
struct Walk<'p> {
    prefix: &'p str,
    delimiter: &'p str,
    marker: &'p str,
    max_keys: usize,
    count: usize,
    common_prefixes: BTreeSet<String>,
    last: Option<String>,
    is_truncated: bool,
}

impl<'p> Walk<'p> {
    fn new(prefix: &'p str, delimiter: &'p str, marker: &'p str, max_keys: usize) -> Self {
        Self {
            prefix,
            delimiter,
            marker,
            max_keys,
            count: 0,
            common_prefixes: BTreeSet::new(),
            last: None,
            is_truncated: false,
        }
    }

    fn visit(&self, key: &str) -> Visit {
        let Some(rest) = key.strip_prefix(self.prefix) else {
            return if key > self.prefix {
                Visit::Past
            } else {
                Visit::Skip
            };
        };
        if !self.delimiter.is_empty() {
            if let Some(pos) = rest.find(self.delimiter) {
                let cp = &key[..self.prefix.len() + pos + self.delimiter.len()];
                if cp <= self.marker || self.common_prefixes.contains(cp) {
                    return Visit::Skip;
                }
                return Visit::Prefix(cp.to_owned());
            }
        }
        Visit::Entry
    }

    /// Take a slot for an entry under `key`. Returns `false` once the page is
    /// full, marking the result truncated.
    fn admit(&mut self, key: &str) -> bool {
        if self.count >= self.max_keys {
            self.is_truncated = true;
            return false;
        }
        self.count += 1;
        if self.last.as_deref() != Some(key) {
            self.last = Some(key.to_owned());
        }
        true
    }

    /// Take a slot for a new common prefix.
    fn push_prefix(&mut self, cp: String) -> bool {
        if !self.admit(&cp) {
            return false;
        }
        self.common_prefixes.insert(cp);
        true
    }

    fn finish<T>(self, objects: Vec<T>) -> WalkPage<T> {
        WalkPage {
            objects,
            common_prefixes: self.common_prefixes.into_iter().collect(),
            is_truncated: self.is_truncated,
            next_marker: if self.is_truncated { self.last } else { None },
        }
    }
}

/// Walk `(key, current object)` pairs in key order and cut one page.
fn walk_current<'a>(
    objects: impl Iterator<Item = (&'a String, &'a S3Object)>,
    prefix: &str,
    delimiter: &str,
    marker: &str,
    max_keys: usize,
) -> WalkPage<&'a S3Object> {
    let mut walk = Walk::new(prefix, delimiter, marker, max_keys);
    let mut listed = Vec::new();

    for (key, obj) in objects {
        match walk.visit(key) {
            Visit::Past => break,
            Visit::Skip => {}
            Visit::Prefix(cp) => {
                if !walk.push_prefix(cp) {
                    break;
                }
            }
            Visit::Entry => {
                if !walk.admit(key) {
                    break;
                }
                listed.push(obj);
            }
        }
    }

    walk.finish(listed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
