use pinhole_generator::{Alphabet, RandomGenerator};
use pinhole_storage::{Backend, PersistentStore, Storage, StorageSettings, VolatileStore};
use pinhole_test_infra::{contract, TempDatabase};
use std::sync::Arc;

fn two_symbol_generator() -> RandomGenerator {
    RandomGenerator::with_alphabet(1, Alphabet::new("01").unwrap()).unwrap()
}

mod volatile {
    use super::*;

    #[tokio::test]
    async fn round_trip() {
        contract::round_trip(&VolatileStore::new()).await;
    }

    #[tokio::test]
    async fn unique_identifiers() {
        contract::unique_identifiers(&VolatileStore::new(), 500).await;
    }

    #[tokio::test]
    async fn expiration() {
        contract::expiration(&VolatileStore::new()).await;
    }

    #[tokio::test]
    async fn never_expires() {
        contract::never_expires(&VolatileStore::new()).await;
    }

    #[tokio::test]
    async fn unknown_not_found() {
        contract::unknown_not_found(&VolatileStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts() {
        contract::concurrent_puts(Arc::new(VolatileStore::new()), 200).await;
    }

    #[tokio::test]
    async fn capacity_exhausted() {
        let store = VolatileStore::with_generator(two_symbol_generator());
        contract::capacity_exhausted(&store, 2).await;
    }
}

mod persistent {
    use super::*;

    fn open(db: &TempDatabase) -> PersistentStore {
        PersistentStore::open(db.path()).unwrap()
    }

    #[tokio::test]
    async fn round_trip() {
        let db = TempDatabase::new().unwrap();
        contract::round_trip(&open(&db)).await;
    }

    #[tokio::test]
    async fn unique_identifiers() {
        let db = TempDatabase::new().unwrap();
        contract::unique_identifiers(&open(&db), 100).await;
    }

    #[tokio::test]
    async fn expiration() {
        let db = TempDatabase::new().unwrap();
        contract::expiration(&open(&db)).await;
    }

    #[tokio::test]
    async fn never_expires() {
        let db = TempDatabase::new().unwrap();
        contract::never_expires(&open(&db)).await;
    }

    #[tokio::test]
    async fn unknown_not_found() {
        let db = TempDatabase::new().unwrap();
        contract::unknown_not_found(&open(&db)).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts() {
        let db = TempDatabase::new().unwrap();
        contract::concurrent_puts(Arc::new(open(&db)), 50).await;
    }

    #[tokio::test]
    async fn capacity_exhausted() {
        let db = TempDatabase::new().unwrap();
        let store = PersistentStore::open_with_generator(db.path(), two_symbol_generator()).unwrap();
        contract::capacity_exhausted(&store, 2).await;
    }
}

mod facade {
    use super::*;

    #[tokio::test]
    async fn volatile_backend_honours_contract() {
        let settings = StorageSettings::builder().backend(Backend::Volatile).build();
        let storage = Storage::open(&settings).unwrap();

        contract::round_trip(&storage).await;
        contract::unknown_not_found(&storage).await;
        contract::expiration(&storage).await;
    }

    #[tokio::test]
    async fn persistent_backend_honours_contract() {
        let db = TempDatabase::new().unwrap();
        let settings = StorageSettings::builder()
            .backend(Backend::Persistent {
                path: db.path().to_path_buf(),
            })
            .build();
        let storage = Storage::open(&settings).unwrap();

        contract::round_trip(&storage).await;
        contract::unknown_not_found(&storage).await;
        contract::expiration(&storage).await;
    }

    #[tokio::test]
    async fn exhaustion_through_facade() {
        let settings = StorageSettings::builder()
            .backend(Backend::Volatile)
            .uri_length(1)
            .alphabet(Alphabet::new("xy").unwrap())
            .build();
        let storage = Storage::open(&settings).unwrap();

        contract::capacity_exhausted(&storage, 2).await;
    }

    #[tokio::test]
    async fn works_as_trait_object() {
        let settings = StorageSettings::builder().backend(Backend::Volatile).build();
        let storage: Arc<dyn pinhole_storage::UrlStorage> =
            Arc::new(Storage::open(&settings).unwrap());

        contract::round_trip(storage.as_ref()).await;
        contract::concurrent_puts(storage, 20).await;
    }
}
