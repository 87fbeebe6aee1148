//! Routing of source files by payment category.

use tracing::{info, warn};

use crate::error::{NfscanError, Result};
use crate::models::config::RoutingConfig;
use crate::models::fields::PaymentCategory;
use crate::models::record::ValidatedRecord;
use crate::storage::ObjectStore;

/// Where a source file is moved to, inside its own bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub category: String,
    /// `<category>/<file_name>`
    pub key: String,
}

/// Maps validated records to destinations.
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: RoutingConfig,
}

impl Router {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Destination for a record. A record without a payment method goes to
    /// the "other" category.
    pub fn route(&self, record: &ValidatedRecord, file_name: &str) -> Destination {
        let category = match record.payment_method {
            Some(PaymentCategory::CashOrPix) => &self.config.cash_category,
            Some(PaymentCategory::Other) | None => &self.config.other_category,
        };
        Destination {
            category: category.clone(),
            key: format!("{}/{}", category, file_name),
        }
    }

    /// Move `source_key` to the destination: copy, then delete the source.
    ///
    /// A failed copy leaves storage untouched. A failed delete after a
    /// successful copy leaves both objects and is reported as
    /// [`NfscanError::PartialRelocation`].
    pub fn relocate<S: ObjectStore + ?Sized>(
        &self,
        store: &S,
        bucket: &str,
        source_key: &str,
        destination: &Destination,
    ) -> Result<()> {
        store.copy(bucket, source_key, &destination.key)?;

        if let Err(source) = store.delete(bucket, source_key) {
            warn!(
                "Copied {}/{} to {} but could not delete the source: {}",
                bucket, source_key, destination.key, source
            );
            return Err(NfscanError::PartialRelocation {
                bucket: bucket.to_string(),
                source_key: source_key.to_string(),
                destination_key: destination.key.clone(),
                source,
            });
        }

        info!("Moved {}/{} to {}", bucket, source_key, destination.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::LocalStore;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn record(payment: Option<PaymentCategory>) -> ValidatedRecord {
        ValidatedRecord {
            payment_method: payment,
            ..Default::default()
        }
    }

    #[test]
    fn test_route_by_payment() {
        let router = Router::default();
        assert_eq!(
            router.route(&record(Some(PaymentCategory::CashOrPix)), "inv1.png"),
            Destination {
                category: "cash".into(),
                key: "cash/inv1.png".into()
            }
        );
        assert_eq!(
            router.route(&record(Some(PaymentCategory::Other)), "inv1.png").key,
            "other/inv1.png"
        );
        assert_eq!(router.route(&record(None), "inv1.png").key, "other/inv1.png");
    }

    #[test]
    fn test_route_custom_categories() {
        let router = Router::new(RoutingConfig {
            cash_category: "dinheiro".into(),
            other_category: "outros".into(),
        });
        assert_eq!(
            router.route(&record(Some(PaymentCategory::CashOrPix)), "a.jpg").key,
            "dinheiro/a.jpg"
        );
    }

    #[test]
    fn test_relocate_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("notas")).unwrap();
        std::fs::write(dir.path().join("notas/inv1.png"), b"png").unwrap();
        let store = LocalStore::new(dir.path());

        let router = Router::default();
        let destination = router.route(&record(Some(PaymentCategory::CashOrPix)), "inv1.png");
        router.relocate(&store, "notas", "inv1.png", &destination).unwrap();

        assert!(!store.exists("notas", "inv1.png").unwrap());
        assert!(store.exists("notas", "cash/inv1.png").unwrap());
    }

    /// Store whose copies succeed and whose deletes always fail.
    #[derive(Default)]
    struct UndeletableStore {
        copies: Mutex<Vec<(String, String)>>,
    }

    impl ObjectStore for UndeletableStore {
        fn get(&self, bucket: &str, key: &str) -> std::result::Result<Vec<u8>, StorageError> {
            Err(StorageError::NotFound {
                bucket: bucket.into(),
                key: key.into(),
            })
        }

        fn copy(&self, _bucket: &str, source: &str, destination: &str) -> std::result::Result<(), StorageError> {
            self.copies
                .lock()
                .unwrap()
                .push((source.to_string(), destination.to_string()));
            Ok(())
        }

        fn delete(&self, _bucket: &str, _key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn exists(&self, _bucket: &str, _key: &str) -> std::result::Result<bool, StorageError> {
            Ok(true)
        }
    }

    #[test]
    fn test_failed_delete_is_partial_relocation() {
        let store = UndeletableStore::default();
        let router = Router::default();
        let destination = router.route(&record(Some(PaymentCategory::Other)), "inv1.png");

        let err = router
            .relocate(&store, "notas", "inv1.png", &destination)
            .unwrap_err();

        match err {
            NfscanError::PartialRelocation {
                source_key,
                destination_key,
                ..
            } => {
                assert_eq!(source_key, "inv1.png");
                assert_eq!(destination_key, "other/inv1.png");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.copies.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_copy_leaves_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("notas")).unwrap();
        let store = LocalStore::new(dir.path());

        let router = Router::default();
        let destination = router.route(&record(None), "missing.png");
        let err = router
            .relocate(&store, "notas", "missing.png", &destination)
            .unwrap_err();
        assert!(matches!(err, NfscanError::Storage(StorageError::NotFound { .. })));
    }
}
