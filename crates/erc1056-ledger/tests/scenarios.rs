//! End-to-end registry scenarios on the local ledger.

use erc1056_crypto::Secp256k1KeyPair;
use erc1056_ledger::{LedgerError, LocalLedger, ManualClock};
use erc1056_registry::{
    Action, Address, Bytes32, ChangePointer, ErrorKind, RegistryError, RegistryEvent,
};
use erc1056_storage::RocksDbStorage;
use std::sync::Arc;
use tempfile::TempDir;

const REGISTRY: Address = Address([0x10; 20]);
const START: u64 = 1_700_000_000;
const DAY: u64 = 86_400;

struct TestLedger {
    ledger: LocalLedger<RocksDbStorage, ManualClock>,
    clock: Arc<ManualClock>,
    _temp_dir: TempDir,
}

async fn create_test_ledger() -> TestLedger {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(RocksDbStorage::open(temp_dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(START));
    let ledger = LocalLedger::open(storage, Arc::clone(&clock), REGISTRY, 64)
        .await
        .unwrap();
    TestLedger {
        ledger,
        clock,
        _temp_dir: temp_dir,
    }
}

fn keypair(seed: u8) -> (Secp256k1KeyPair, Address) {
    let keypair = Secp256k1KeyPair::from_secret_bytes(&[seed; 32]).unwrap();
    let address = Address(keypair.address());
    (keypair, address)
}

fn tag(text: &str) -> Bytes32 {
    Bytes32::from_short_str(text).unwrap()
}

#[tokio::test]
async fn test_delegate_expires_when_time_advances() {
    let TestLedger { ledger, clock, _temp_dir } = create_test_ledger().await;
    let identity = Address([1u8; 20]);
    let delegate = Address([2u8; 20]);

    ledger
        .add_delegate(identity, identity, tag("sigAuth"), delegate, DAY)
        .await
        .unwrap();
    assert!(ledger
        .is_valid_delegate(identity, tag("sigAuth"), delegate)
        .await
        .unwrap());

    clock.advance(DAY + 1);
    assert!(!ledger
        .is_valid_delegate(identity, tag("sigAuth"), delegate)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_attribute_set_and_revoke_events() {
    let TestLedger { ledger, clock, _temp_dir } = create_test_ledger().await;
    let identity = Address([1u8; 20]);
    let name = tag("did/svc/MessagingService");
    let value = b"https://msg.example.com".to_vec();

    let set = ledger
        .set_attribute(identity, identity, name, value.clone(), DAY)
        .await
        .unwrap();
    assert_eq!(set.event.valid_to(), Some(START + DAY));

    let active = ledger.journal().active_attributes(identity, START).await.unwrap();
    assert_eq!(active.len(), 1);

    clock.advance(5);
    let revoked = ledger
        .revoke_attribute(identity, identity, name, value.clone())
        .await
        .unwrap();
    assert_eq!(revoked.event.valid_to(), Some(0));
    assert_eq!(revoked.event.previous_change(), set.position);

    let history = ledger.journal().history(identity).await.unwrap();
    assert_eq!(history, vec![revoked, set]);
    assert!(ledger
        .journal()
        .active_attributes(identity, START)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_relayed_delegate_and_replay() {
    let TestLedger { ledger, _temp_dir, .. } = create_test_ledger().await;
    let (owner_key, identity) = keypair(1);
    let relayer = Address([0xaa; 20]);
    let delegate = Address([2u8; 20]);

    let action = Action::AddDelegate {
        delegate_type: tag("sigAuth"),
        delegate,
        validity: DAY,
    };
    let digest = ledger.signing_digest(identity, &action).await.unwrap();
    let signature = owner_key.sign_digest(&digest).unwrap();

    ledger
        .add_delegate_signed(relayer, identity, &signature, tag("sigAuth"), delegate, DAY)
        .await
        .unwrap();
    assert!(ledger
        .is_valid_delegate(identity, tag("sigAuth"), delegate)
        .await
        .unwrap());

    let err = ledger
        .add_delegate_signed(relayer, identity, &signature, tag("sigAuth"), delegate, DAY)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Registry(RegistryError::SignerNotOwner { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(ledger.journal().history(identity).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_transactions_consume_heights() {
    let TestLedger { ledger, _temp_dir, .. } = create_test_ledger().await;
    let identity = Address([1u8; 20]);

    let err = ledger
        .change_owner(Address([9u8; 20]), identity, Address([9u8; 20]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(ledger.height().await, 1);
    assert_eq!(
        ledger.last_change_pointer(identity).await.unwrap(),
        ChangePointer::GENESIS
    );

    let logged = ledger
        .change_owner(identity, identity, Address([3u8; 20]))
        .await
        .unwrap();
    assert_eq!(logged.position, ChangePointer(2));
    assert_eq!(
        ledger.current_controller(identity).await.unwrap(),
        Address([3u8; 20])
    );
}

#[tokio::test]
async fn test_history_spans_every_event_kind() {
    let TestLedger { ledger, clock, _temp_dir } = create_test_ledger().await;
    let identity = Address([1u8; 20]);
    let other = Address([4u8; 20]);
    let owner = Address([5u8; 20]);

    ledger
        .add_delegate(identity, identity, tag("veriKey"), Address([2u8; 20]), DAY)
        .await
        .unwrap();
    ledger
        .set_attribute(other, other, tag("did/svc/X"), b"x".to_vec(), DAY)
        .await
        .unwrap();
    clock.advance(60);
    ledger
        .set_attribute(identity, identity, tag("did/svc/Y"), b"y".to_vec(), DAY)
        .await
        .unwrap();
    ledger.change_owner(identity, identity, owner).await.unwrap();
    ledger
        .revoke_delegate(owner, identity, tag("veriKey"), Address([2u8; 20]))
        .await
        .unwrap();

    let history = ledger.journal().history(identity).await.unwrap();
    let positions: Vec<u64> = history.iter().map(|l| l.position.0).collect();
    assert_eq!(positions, vec![5, 4, 3, 1]);

    assert!(matches!(
        history[0].event,
        RegistryEvent::DelegateChanged { valid_to: 0, .. }
    ));
    assert!(matches!(
        history[1].event,
        RegistryEvent::ControllerChanged { owner: o, .. } if o == owner
    ));
    assert_eq!(history[2].timestamp, START + 60);
    assert_eq!(ledger.journal().history(other).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_time_never_goes_backward() {
    let TestLedger { ledger, clock, _temp_dir } = create_test_ledger().await;
    let identity = Address([1u8; 20]);

    let first = ledger
        .set_attribute(identity, identity, tag("did/svc/X"), b"x".to_vec(), 10)
        .await
        .unwrap();
    clock.set(START - 1_000);
    let second = ledger
        .revoke_attribute(identity, identity, tag("did/svc/X"), b"x".to_vec())
        .await
        .unwrap();

    assert_eq!(first.timestamp, START);
    assert_eq!(second.timestamp, START);
}

#[tokio::test]
async fn test_ledger_resumes_after_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let identity = Address([1u8; 20]);
    let clock = Arc::new(ManualClock::new(START));

    {
        let storage = Arc::new(RocksDbStorage::open(temp_dir.path()).unwrap());
        let ledger = LocalLedger::open(storage, Arc::clone(&clock), REGISTRY, 8)
            .await
            .unwrap();
        ledger
            .change_owner(identity, identity, Address([3u8; 20]))
            .await
            .unwrap();
        ledger
            .change_owner(Address([3u8; 20]), identity, Address([4u8; 20]))
            .await
            .unwrap();
    }

    let storage = Arc::new(RocksDbStorage::open(temp_dir.path()).unwrap());
    let ledger = LocalLedger::open(storage, clock, REGISTRY, 8).await.unwrap();
    assert_eq!(ledger.height().await, 2);

    let logged = ledger
        .change_owner(Address([4u8; 20]), identity, Address([5u8; 20]))
        .await
        .unwrap();
    assert_eq!(logged.position, ChangePointer(3));
    assert_eq!(ledger.journal().history(identity).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_database_directory_outlives_setup() {
    let TestLedger {
        ledger,
        _temp_dir: temp_dir,
        ..
    } = create_test_ledger().await;
    let identity = Address([1u8; 20]);

    ledger
        .change_owner(identity, identity, Address([2u8; 20]))
        .await
        .unwrap();

    assert!(temp_dir.path().join("CURRENT").exists());
    assert_eq!(ledger.height().await, 1);
}

#[tokio::test]
async fn test_live_feed_receives_committed_events() {
    let TestLedger { ledger, _temp_dir, .. } = create_test_ledger().await;
    let mut feed = ledger.journal().subscribe();
    let identity = Address([1u8; 20]);

    let _ = ledger
        .change_owner(Address([9u8; 20]), identity, Address([9u8; 20]))
        .await;
    let logged = ledger
        .change_owner(identity, identity, Address([3u8; 20]))
        .await
        .unwrap();

    assert_eq!(feed.recv().await.unwrap(), logged);
    assert!(feed.try_recv().is_err());
}
