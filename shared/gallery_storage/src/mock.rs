//! In-memory object store for tests
//!
//! `MockObjectStore` keeps objects in a sorted map (S3 lists keys in
//! lexicographic order), records every call, can be told to fail an
//! operation, and can pause the next call of an operation so a test can
//! interleave other work while that call is in flight.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::{
    generate_object_key, public_object_url, ObjectStore, ObjectSummary, TransportError,
    TransportResult, UploadableFile,
};

/// Remote operations of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `upload`
    Upload,
    /// `delete`
    Delete,
    /// `list`
    List,
}

/// A recorded call to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// An upload, with the key generated for it
    Upload {
        /// Generated object key
        key: String,
        /// Reported file name
        name: String,
        /// Reported MIME type
        mime_type: String,
    },
    /// A delete of `key`
    Delete {
        /// Key that was deleted
        key: String,
    },
    /// A listing
    List,
}

/// Holds one paused call until the test releases it
#[derive(Debug, Default)]
pub struct OperationGate {
    started: Notify,
    released: Notify,
}

impl OperationGate {
    /// Resolves once the paused call has been issued
    ///
    /// For listings, the snapshot of the bucket has already been taken at
    /// that point.
    pub async fn wait_until_started(&self) {
        self.started.notified().await;
    }

    /// Lets the paused call complete
    pub fn release(&self) {
        self.released.notify_one();
    }

    async fn hold(&self) {
        self.started.notify_one();
        self.released.notified().await;
    }
}

/// In-memory [`ObjectStore`]
pub struct MockObjectStore {
    bucket_name: String,
    region: String,
    objects: Mutex<BTreeMap<String, UploadableFile>>,
    failing: Mutex<HashSet<Operation>>,
    gates: Mutex<HashMap<Operation, Arc<OperationGate>>>,
    calls: Mutex<Vec<Call>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockObjectStore {
    /// Creates an empty store that builds URLs for `bucket_name` in `region`
    #[must_use]
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            objects: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Seeds the store with empty objects under `keys`
    #[must_use]
    pub fn with_objects<I, K>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.insert_object(key);
        }
        self
    }

    /// Stores an empty object under `key` without recording a call, as if
    /// another client had uploaded it
    pub fn insert_object(&self, key: impl Into<String>) {
        let key = key.into();
        let file = UploadableFile::new(key.clone(), "image/png", Vec::new());
        lock(&self.objects).insert(key, file);
    }

    /// Keys currently stored, in listing order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        lock(&self.objects).keys().cloned().collect()
    }

    /// Contents stored under `key`, if any
    #[must_use]
    pub fn object(&self, key: &str) -> Option<UploadableFile> {
        lock(&self.objects).get(key).cloned()
    }

    /// Makes every following call of `operation` fail
    pub fn fail(&self, operation: Operation) {
        lock(&self.failing).insert(operation);
    }

    /// Undoes [`MockObjectStore::fail`]
    pub fn recover(&self, operation: Operation) {
        lock(&self.failing).remove(&operation);
    }

    /// Pauses the next call of `operation` until the returned gate is released
    #[must_use]
    pub fn pause(&self, operation: Operation) -> Arc<OperationGate> {
        let gate = Arc::new(OperationGate::default());
        lock(&self.gates).insert(operation, Arc::clone(&gate));
        gate
    }

    /// Every call issued so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Number of calls issued for `operation`
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| {
                matches!(
                    (call, operation),
                    (Call::Upload { .. }, Operation::Upload)
                        | (Call::Delete { .. }, Operation::Delete)
                        | (Call::List, Operation::List)
                )
            })
            .count()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn take_gate(&self, operation: Operation) -> Option<Arc<OperationGate>> {
        lock(&self.gates).remove(&operation)
    }

    fn check(&self, operation: Operation) -> TransportResult<()> {
        if lock(&self.failing).contains(&operation) {
            return Err(TransportError::Unavailable(format!(
                "{operation:?} rejected by mock store"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(&self, file: UploadableFile) -> TransportResult<String> {
        let key = generate_object_key(&file.name);
        self.record(Call::Upload {
            key: key.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
        });

        let gate = self.take_gate(Operation::Upload);
        if let Some(gate) = gate {
            gate.hold().await;
        }

        self.check(Operation::Upload)?;
        lock(&self.objects).insert(key.clone(), file);
        Ok(key)
    }

    async fn delete(&self, key: &str) -> TransportResult<()> {
        self.record(Call::Delete {
            key: key.to_string(),
        });

        let gate = self.take_gate(Operation::Delete);
        if let Some(gate) = gate {
            gate.hold().await;
        }

        self.check(Operation::Delete)?;
        lock(&self.objects).remove(key);
        Ok(())
    }

    async fn list(&self) -> TransportResult<Vec<ObjectSummary>> {
        self.record(Call::List);
        let snapshot: Vec<ObjectSummary> =
            self.keys().into_iter().map(ObjectSummary::new).collect();

        let gate = self.take_gate(Operation::List);
        if let Some(gate) = gate {
            gate.hold().await;
        }

        self.check(Operation::List)?;
        Ok(snapshot)
    }

    fn url_for(&self, key: &str) -> String {
        public_object_url(&self.bucket_name, &self.region, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_listing_is_lexicographic() {
        let store = MockObjectStore::new("bucket", "us-east-1").with_objects(["b", "c", "a"]);

        let keys: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|object| object.key)
            .collect();

        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_upload_stores_under_generated_key() {
        let store = MockObjectStore::new("bucket", "us-east-1");

        let key = store
            .upload(UploadableFile::new("cat.png", "image/png", vec![1, 2, 3]))
            .await
            .unwrap();

        assert!(key.ends_with("-cat.png"));
        assert_eq!(store.keys(), vec![key.clone()]);
        assert_eq!(store.object(&key).unwrap().bytes, vec![1, 2, 3]);
        assert_eq!(store.count(Operation::Upload), 1);
    }

    #[tokio::test]
    async fn test_failing_operation_leaves_objects_untouched() {
        let store = MockObjectStore::new("bucket", "us-east-1").with_objects(["a"]);
        store.fail(Operation::Delete);

        let result = store.delete("a").await;

        assert!(matches!(result, Err(TransportError::Unavailable(_))));
        assert_eq!(store.keys(), vec!["a"]);

        store.recover(Operation::Delete);
        store.delete("a").await.unwrap();
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_missing_key_succeeds() {
        let store = MockObjectStore::new("bucket", "us-east-1");

        store.delete("missing").await.unwrap();

        assert_eq!(
            store.calls(),
            vec![Call::Delete {
                key: "missing".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_paused_listing_returns_snapshot_taken_before_pause() {
        let store = Arc::new(MockObjectStore::new("bucket", "us-east-1").with_objects(["a"]));
        let gate = store.pause(Operation::List);

        let listing = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.list().await }
        });

        gate.wait_until_started().await;
        store.insert_object("b");
        gate.release();

        let keys: Vec<String> = listing
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|object| object.key)
            .collect();
        assert_eq!(keys, vec!["a"]);
        assert_eq!(store.keys(), vec!["a", "b"]);
    }
}
