//! Signed meta-transaction tests.

use super::helpers::*;
use crate::*;

#[tokio::test]
async fn test_relayed_change_owner() {
    let (registry, sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);
    let relayer = address(0xaa);
    let new_owner = address(2);

    let action = Action::ChangeOwner { new_owner };
    let signature = sign(&registry, &owner_key, identity, &action).await;

    let logged = registry
        .change_owner_signed(&blocks.next(relayer), identity, &signature, new_owner)
        .await
        .unwrap();

    assert_eq!(
        logged.event,
        RegistryEvent::ControllerChanged {
            identity,
            owner: new_owner,
            previous_change: ChangePointer::GENESIS,
        }
    );
    assert_eq!(registry.current_controller(identity).await.unwrap(), new_owner);
    assert_eq!(sink.committed_events().len(), 1);
}

#[tokio::test]
async fn test_signed_add_delegate_cannot_be_replayed() {
    let (registry, sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);
    let relayer = address(0xaa);
    let delegate = address(2);
    let sig_auth = tag("sigAuth");

    let action = Action::AddDelegate {
        delegate_type: sig_auth,
        delegate,
        validity: 86_400,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;

    let ctx = blocks.next(relayer);
    registry
        .add_delegate_signed(&ctx, identity, &signature, sig_auth, delegate, 86_400)
        .await
        .unwrap();
    assert!(registry
        .is_valid_delegate(identity, sig_auth, delegate, ctx.timestamp)
        .await
        .unwrap());

    let err = registry
        .add_delegate_signed(&blocks.next(relayer), identity, &signature, sig_auth, delegate, 86_400)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(registry.last_change_pointer(identity).await.unwrap(), ctx.position);
    assert_eq!(sink.committed_events().len(), 1);
}

#[tokio::test]
async fn test_signature_from_non_owner_rejected() {
    let (registry, _sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (_, identity) = keypair(1);
    let (intruder, _) = keypair(2);

    let action = Action::ChangeOwner {
        new_owner: address(9),
    };
    let signature = sign(&registry, &intruder, identity, &action).await;

    let err = registry
        .change_owner_signed(&blocks.next(address(0xaa)), identity, &signature, address(9))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));
    assert!(err.to_string().starts_with("signer is not the current owner"));
    assert_eq!(registry.current_controller(identity).await.unwrap(), identity);
}

#[tokio::test]
async fn test_signature_bound_to_parameters() {
    let (registry, _sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);
    let delegate = address(2);

    let action = Action::AddDelegate {
        delegate_type: tag("sigAuth"),
        delegate,
        validity: 60,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;

    let err = registry
        .add_delegate_signed(&blocks.next(address(0xaa)), identity, &signature, tag("sigAuth"), delegate, 86_400)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));

    let err = registry
        .add_delegate_signed(&blocks.next(address(0xaa)), identity, &signature, tag("veriKey"), delegate, 60)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));
}

#[tokio::test]
async fn test_signature_bound_to_registry() {
    let (registry, _sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);
    let new_owner = address(2);

    let action = Action::ChangeOwner { new_owner };
    let foreign = signing_digest(&address(0x77), ChangePointer::GENESIS, &action);
    let signature = owner_key.sign_digest(&foreign).unwrap();

    let err = registry
        .change_owner_signed(&blocks.next(address(0xaa)), identity, &signature, new_owner)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));
}

#[tokio::test]
async fn test_malformed_signature_rejected() {
    let (registry, sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (_, identity) = keypair(1);

    let signature = EcdsaSignature {
        v: 29,
        r: [1u8; 32],
        s: [1u8; 32],
    };
    let err = registry
        .change_owner_signed(&blocks.next(address(0xaa)), identity, &signature, address(2))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::InvalidSignature(_)));
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert!(sink.committed_events().is_empty());
}

#[tokio::test]
async fn test_signed_change_owner_to_zero_rejected() {
    let (registry, _sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);

    let action = Action::ChangeOwner {
        new_owner: Address::ZERO,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;

    let err = registry
        .change_owner_signed(&blocks.next(address(0xaa)), identity, &signature, Address::ZERO)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "new owner cannot be zero address for signed change"
    );
    assert_eq!(registry.current_controller(identity).await.unwrap(), identity);
}

#[tokio::test]
async fn test_signing_digest_tracks_nonce() {
    let (registry, _sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (_, identity) = keypair(1);
    let action = Action::RevokeDelegate {
        delegate_type: tag("sigAuth"),
        delegate: address(2),
    };

    let before = registry.signing_digest(identity, &action).await.unwrap();
    assert_eq!(before, signing_digest(&REGISTRY, ChangePointer::GENESIS, &action));

    let ctx = blocks.next(identity);
    registry
        .revoke_delegate(&ctx, identity, tag("sigAuth"), address(2))
        .await
        .unwrap();

    let after = registry.signing_digest(identity, &action).await.unwrap();
    assert_ne!(before, after);
    assert_eq!(after, signing_digest(&REGISTRY, ctx.position, &action));
}

#[tokio::test]
async fn test_every_signed_operation() {
    let (registry, sink, _temp_dir) = create_test_registry();
    let mut blocks = Blocks::new();
    let (owner_key, identity) = keypair(1);
    let (next_key, next_owner) = keypair(2);
    let relayer = address(0xaa);
    let delegate = address(3);
    let sig_auth = tag("sigAuth");
    let name = tag("did/svc/MessagingService");
    let value = b"https://msg.example.com".to_vec();

    let action = Action::AddDelegate {
        delegate_type: sig_auth,
        delegate,
        validity: 100,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;
    registry
        .add_delegate_signed(&blocks.next(relayer), identity, &signature, sig_auth, delegate, 100)
        .await
        .unwrap();

    let action = Action::RevokeDelegate {
        delegate_type: sig_auth,
        delegate,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;
    let revoked = blocks.next(relayer);
    registry
        .revoke_delegate_signed(&revoked, identity, &signature, sig_auth, delegate)
        .await
        .unwrap();
    assert!(!registry
        .is_valid_delegate(identity, sig_auth, delegate, revoked.timestamp)
        .await
        .unwrap());

    let action = Action::SetAttribute {
        name,
        value: value.clone(),
        validity: 100,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;
    registry
        .set_attribute_signed(&blocks.next(relayer), identity, &signature, name, value.clone(), 100)
        .await
        .unwrap();

    let action = Action::RevokeAttribute {
        name,
        value: value.clone(),
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;
    registry
        .revoke_attribute_signed(&blocks.next(relayer), identity, &signature, name, value.clone())
        .await
        .unwrap();

    let action = Action::ChangeOwner {
        new_owner: next_owner,
    };
    let signature = sign(&registry, &owner_key, identity, &action).await;
    registry
        .change_owner_signed(&blocks.next(relayer), identity, &signature, next_owner)
        .await
        .unwrap();

    // Old key no longer authorizes; the new controller's key does.
    let action = Action::RevokeAttribute {
        name,
        value: value.clone(),
    };
    let stale = sign(&registry, &owner_key, identity, &action).await;
    let err = registry
        .revoke_attribute_signed(&blocks.next(relayer), identity, &stale, name, value.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SignerNotOwner { .. }));

    let fresh = sign(&registry, &next_key, identity, &action).await;
    registry
        .revoke_attribute_signed(&blocks.next(relayer), identity, &fresh, name, value)
        .await
        .unwrap();

    let names: Vec<&str> = sink.committed_events().iter().map(|l| l.event.name()).collect();
    assert_eq!(
        names,
        vec![
            "DelegateChanged",
            "DelegateChanged",
            "AttributeChanged",
            "AttributeChanged",
            "ControllerChanged",
            "AttributeChanged",
        ]
    );
}
