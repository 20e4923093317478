//! Typed collections over a key-value store.
//!
//! A [`Collection`] is a JSON array of records stored under one key. All
//! writes replace the whole array.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use kiddiebox_core::{
    ChatMessage, ChatMessageId, Enrollment, EnrollmentId, Product, ProductId, User, UserId,
};

use super::{KeyValueStore, StorageError, read_json, write_json};

/// A record with a unique identifier.
pub trait Record: Serialize + DeserializeOwned {
    /// Identifier type.
    type Id: PartialEq;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;
}

impl Record for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

impl Record for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Record for Enrollment {
    type Id = EnrollmentId;

    fn id(&self) -> &EnrollmentId {
        &self.id
    }
}

impl Record for ChatMessage {
    type Id = ChatMessageId;

    fn id(&self) -> &ChatMessageId {
        &self.id
    }
}

/// A named collection of records of one type.
pub struct Collection<'a, S: ?Sized, T> {
    store: &'a S,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<'a, S, T> Collection<'a, S, T>
where
    S: KeyValueStore + ?Sized,
    T: Record,
{
    /// Bind a collection to `key` in `store`.
    #[must_use]
    pub const fn new(store: &'a S, key: &'static str) -> Self {
        Self {
            store,
            key,
            _record: PhantomData,
        }
    }

    /// The storage key of this collection.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Whether the collection has been written at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn exists(&self) -> Result<bool, StorageError> {
        self.store.contains(self.key)
    }

    /// Read all records. An absent collection reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Deserialization` if the stored JSON does not
    /// match the record shape.
    pub fn read(&self) -> Result<Vec<T>, StorageError> {
        Ok(read_json(self.store, self.key)?.unwrap_or_default())
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_all(&self, records: &[T]) -> Result<(), StorageError> {
        write_json(self.store, self.key, records)
    }

    /// Find a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn find(&self, id: &T::Id) -> Result<Option<T>, StorageError> {
        Ok(self.read()?.into_iter().find(|record| record.id() == id))
    }

    /// Replace the record with the same ID, or append it if none exists.
    ///
    /// Returns `true` if an existing record was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn upsert(&self, record: T) -> Result<bool, StorageError> {
        let mut records = self.read()?;
        let replaced = match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                records.push(record);
                false
            }
        };
        self.write_all(&records)?;
        Ok(replaced)
    }

    /// Append a record without checking for an existing ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn append(&self, record: T) -> Result<(), StorageError> {
        self.extend(std::iter::once(record))
    }

    /// Append several records in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn extend(&self, new_records: impl IntoIterator<Item = T>) -> Result<(), StorageError> {
        let mut records = self.read()?;
        records.extend(new_records);
        self.write_all(&records)
    }

    /// Remove every record with the given ID and persist the remainder.
    ///
    /// Returns `true` if anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn delete_by_id(&self, id: &T::Id) -> Result<bool, StorageError> {
        let mut records = self.read()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        self.write_all(&records)?;
        Ok(records.len() != before)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::{MemoryStore, init_db, keys};

    fn message(id: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id: ChatMessageId::new(id),
            sender_id: UserId::new("user1"),
            sender_name: "Sample User".to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            is_tutor: false,
        }
    }

    #[test]
    fn test_read_absent_is_empty() {
        let store = MemoryStore::new();
        let chat: Collection<'_, _, ChatMessage> = Collection::new(&store, keys::CHAT);
        assert!(chat.read().unwrap().is_empty());
        assert!(!chat.exists().unwrap());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let chat = Collection::new(&store, keys::CHAT);

        assert!(!chat.upsert(message("m1", "first")).unwrap());
        assert!(!chat.upsert(message("m2", "second")).unwrap());
        assert!(chat.upsert(message("m1", "edited")).unwrap());

        let records: Vec<ChatMessage> = chat.read().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "edited");
        assert_eq!(records[1].text, "second");
    }

    #[test]
    fn test_delete_by_id() {
        let store = MemoryStore::new();
        let chat = Collection::new(&store, keys::CHAT);
        chat.write_all(&[message("m1", "a"), message("m2", "b")])
            .unwrap();

        assert!(chat.delete_by_id(&ChatMessageId::new("m1")).unwrap());
        assert!(!chat.delete_by_id(&ChatMessageId::new("missing")).unwrap());

        let records: Vec<ChatMessage> = chat.read().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, ChatMessageId::new("m2"));
    }

    #[test]
    fn test_delete_by_id_keeps_other_records_intact() {
        let store = MemoryStore::new();
        init_db(&store).unwrap();
        let products: Collection<'_, _, Product> = Collection::new(&store, keys::PRODUCTS);

        let before: Vec<serde_json::Value> =
            serde_json::from_str(&store.get(keys::PRODUCTS).unwrap().unwrap()).unwrap();
        let untouched: Vec<String> = products
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.id.as_str() != "c1")
            .map(|p| serde_json::to_string(p).unwrap())
            .collect();

        assert!(products.delete_by_id(&ProductId::new("c1")).unwrap());

        let raw_after = store.get(keys::PRODUCTS).unwrap().unwrap();
        let after: Vec<serde_json::Value> = serde_json::from_str(&raw_after).unwrap();
        let expected: Vec<&serde_json::Value> =
            before.iter().filter(|p| p["id"] != "c1").collect();
        assert_eq!(after.iter().collect::<Vec<_>>(), expected);
        assert_eq!(raw_after, format!("[{}]", untouched.join(",")));
    }

    #[test]
    fn test_append_keeps_order() {
        let store = MemoryStore::new();
        let chat = Collection::new(&store, keys::CHAT);
        chat.append(message("m1", "hi")).unwrap();
        chat.append(message("m2", "there")).unwrap();

        let texts: Vec<String> = chat
            .read()
            .unwrap()
            .into_iter()
            .map(|m: ChatMessage| m.text)
            .collect();
        assert_eq!(texts, ["hi", "there"]);
    }
}
