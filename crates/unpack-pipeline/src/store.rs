//! Data product store with scoped read leases
//!
//! The store exclusively owns every product decoded for the current event
//! and lends them out as read-only leases. A lease is valid for the current
//! event only: callers must drop their leases before `clear` wipes the store
//! for the next event. Leases are `Arc`-backed, so violating the protocol can
//! never dangle, but `clear` flags it because a retained lease means event
//! data is outliving the iteration that produced it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};

type AnyProduct = Arc<dyn Any + Send + Sync>;

/// Owner of all data products for the event currently in flight.
#[derive(Default)]
pub struct ProductStore {
    products: HashMap<String, AnyProduct>,
}

impl ProductStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product under a name, replacing any previous product with
    /// that name.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, product: T) {
        let name = name.into();
        debug!("Storing data product '{}'", name);
        self.products.insert(name, Arc::new(product));
    }

    /// Check whether a named product is present
    pub fn has_product(&self, name: &str) -> bool {
        self.products.contains_key(name)
    }

    /// Take out a read lease on a named product.
    ///
    /// Returns `None` if no product is registered under the name. The lease
    /// is untyped; callers narrow it with [`UntypedLease::downcast`].
    pub fn checkout_read(&self, name: &str) -> Option<UntypedLease> {
        self.products.get(name).map(|product| UntypedLease {
            name: name.to_string(),
            inner: Arc::clone(product),
        })
    }

    /// Number of products currently held
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True if no products are held
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Drop all products ahead of the next event.
    ///
    /// Every lease handed out for this event must already be released;
    /// an outstanding lease is a protocol violation and is logged.
    pub fn clear(&mut self) {
        for (name, product) in self.products.drain() {
            if Arc::strong_count(&product) > 1 {
                warn!(
                    "Data product '{}' still has an outstanding read lease at clear",
                    name
                );
            }
        }
    }
}

/// An untyped read lease on one data product.
pub struct UntypedLease {
    name: String,
    inner: AnyProduct,
}

impl UntypedLease {
    /// Name the product was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Narrow the lease to a concrete product type.
    ///
    /// Fails with the original lease if the stored product is not a `T`.
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<ProductLease<T>, UntypedLease> {
        let name = self.name;
        match self.inner.downcast::<T>() {
            Ok(inner) => Ok(ProductLease { inner }),
            Err(inner) => Err(UntypedLease { name, inner }),
        }
    }
}

impl fmt::Debug for UntypedLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedLease")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A typed, read-only lease on one data product.
///
/// Dropping the lease releases it. The lease must not be retained past the
/// owning store's `clear` for the event that produced it.
pub struct ProductLease<T> {
    inner: Arc<T>,
}

impl<T> Deref for ProductLease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for ProductLease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProductLease").field(&*self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_presence() {
        let mut store = ProductStore::new();
        assert!(store.is_empty());

        store.insert("Thing", 42u32);
        assert!(store.has_product("Thing"));
        assert!(!store.has_product("Other"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_checkout_and_downcast() {
        let mut store = ProductStore::new();
        store.insert("Value", 7u32);

        let lease = store.checkout_read("Value").unwrap();
        assert_eq!(lease.name(), "Value");

        let typed = lease.downcast::<u32>().unwrap();
        assert_eq!(*typed, 7);
    }

    #[test]
    fn test_downcast_wrong_type_returns_lease() {
        let mut store = ProductStore::new();
        store.insert("Value", 7u32);

        let lease = store.checkout_read("Value").unwrap();
        let err = lease.downcast::<String>().unwrap_err();
        assert_eq!(err.name(), "Value");

        // The lease is still usable with the right type
        assert!(err.downcast::<u32>().is_ok());
    }

    #[test]
    fn test_checkout_missing_product() {
        let store = ProductStore::new();
        assert!(store.checkout_read("Missing").is_none());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = ProductStore::new();
        store.insert("A", 1u32);
        store.insert("B", 2u32);

        store.clear();
        assert!(store.is_empty());
        assert!(!store.has_product("A"));
    }

    #[test]
    fn test_clear_with_outstanding_lease_does_not_dangle() {
        let mut store = ProductStore::new();
        store.insert("Value", 7u32);

        let lease = store.checkout_read("Value").unwrap().downcast::<u32>().unwrap();
        store.clear();

        // Protocol violation, but the data stays alive for the holder.
        assert_eq!(*lease, 7);
        assert!(store.is_empty());
    }
}
