//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use groupgate_core::{MemberId, SubscriptionRecord, SubscriptionStatus};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    // Serializes read-modify-write sequences; individual batches are already
    // atomic, the mutex covers the read half.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn lock_writes(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    fn get_record(&self, member_id: MemberId) -> Result<Option<SubscriptionRecord>> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let key = keys::member_key(member_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn member_for_ref(&self, subscription_ref: &str) -> Result<Option<MemberId>> {
        let cf = self.cf(cf::SUBSCRIPTIONS_BY_REF)?;
        let key = keys::subscription_ref_key(subscription_ref);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|bytes| keys::member_id_from_key(&bytes))
            .transpose()
    }
}

impl Store for RocksStore {
    fn upsert_subscription(
        &self,
        member_id: MemberId,
        subscription_ref: Option<&str>,
        payer_ref: Option<&str>,
        status: SubscriptionStatus,
        period_end: i64,
    ) -> Result<SubscriptionRecord> {
        let _guard = self.lock_writes()?;

        let cf_subs = self.cf(cf::SUBSCRIPTIONS)?;
        let cf_by_ref = self.cf(cf::SUBSCRIPTIONS_BY_REF)?;

        let existing = self.get_record(member_id)?;
        let created_at = existing
            .as_ref()
            .map_or_else(|| chrono::Utc::now().timestamp(), |r| r.created_at);

        let record = SubscriptionRecord {
            member_id,
            subscription_ref: subscription_ref.map(String::from),
            payer_ref: payer_ref.map(String::from),
            status,
            period_end,
            created_at,
        };

        let member_key = keys::member_key(member_id);
        let value = Self::serialize(&record)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_subs, member_key, &value);

        // A re-subscribe replaces the provider identifier; drop the stale
        // index entry so lookups for the old ref stop resolving.
        if let Some(old_ref) = existing.and_then(|r| r.subscription_ref) {
            if subscription_ref != Some(old_ref.as_str()) {
                batch.delete_cf(&cf_by_ref, keys::subscription_ref_key(&old_ref));
            }
        }
        if let Some(new_ref) = subscription_ref {
            batch.put_cf(&cf_by_ref, keys::subscription_ref_key(new_ref), member_key);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(record)
    }

    fn get_subscription(&self, member_id: MemberId) -> Result<Option<SubscriptionRecord>> {
        self.get_record(member_id)
    }

    fn find_by_subscription(
        &self,
        subscription_ref: &str,
    ) -> Result<Option<(MemberId, SubscriptionStatus)>> {
        let Some(member_id) = self.member_for_ref(subscription_ref)? else {
            return Ok(None);
        };

        match self.get_record(member_id)? {
            Some(record) => Ok(Some((member_id, record.status))),
            None => {
                // Index entry outlived its record; treat as absent.
                tracing::warn!(
                    subscription_ref,
                    member_id = %member_id,
                    "dangling subscription index entry"
                );
                Ok(None)
            }
        }
    }

    fn set_status(
        &self,
        subscription_ref: &str,
        status: SubscriptionStatus,
        period_end: Option<i64>,
    ) -> Result<()> {
        let _guard = self.lock_writes()?;

        let member_id = self
            .member_for_ref(subscription_ref)?
            .ok_or(StoreError::NotFound)?;
        let mut record = self.get_record(member_id)?.ok_or(StoreError::NotFound)?;

        record.status = status;
        if let Some(period_end) = period_end {
            record.period_end = period_end;
        }

        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let value = Self::serialize(&record)?;
        self.db
            .put_cf(&cf, keys::member_key(member_id), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_expired(&self, now: i64) -> Result<Vec<MemberId>> {
        let cf = self.cf(cf::SUBSCRIPTIONS)?;
        let mut expired = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let record: SubscriptionRecord = Self::deserialize(&value)?;

            if record.is_expired(now) {
                expired.push(record.member_id);
            }
        }

        Ok(expired)
    }
}
