//! Signed action encoding.
//!
//! Each mutation family has a fixed parameter schema. The signed payload is
//!
//! ```text
//! action_hash  = keccak256(keccak256(name) ‖ keccak256(packed params))
//! payload_hash = keccak256(registry ‖ uint256(nonce) ‖ action_hash)
//! digest       = keccak256("\x19Ethereum Signed Message:\n32" ‖ payload_hash)
//! ```
//!
//! where packing follows `abi.encodePacked`: addresses are 20 bytes, tags 32
//! bytes, integers 32-byte big-endian words, byte strings raw.

use crate::types::{uint256, Address, Bytes32, ChangePointer};
use erc1056_crypto::{eth_signed_message_hash, keccak256, keccak256_concat};
use serde::{Deserialize, Serialize};

/// A registry mutation and its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ChangeOwner {
        new_owner: Address,
    },
    AddDelegate {
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    },
    RevokeDelegate {
        delegate_type: Bytes32,
        delegate: Address,
    },
    SetAttribute {
        name: Bytes32,
        #[serde(with = "crate::types::hex_bytes")]
        value: Vec<u8>,
        validity: u64,
    },
    RevokeAttribute {
        name: Bytes32,
        #[serde(with = "crate::types::hex_bytes")]
        value: Vec<u8>,
    },
}

impl Action {
    /// Symbolic name hashed into the type tag
    pub fn name(&self) -> &'static str {
        match self {
            Action::ChangeOwner { .. } => "changeOwner",
            Action::AddDelegate { .. } => "addDelegate",
            Action::RevokeDelegate { .. } => "revokeDelegate",
            Action::SetAttribute { .. } => "setAttribute",
            Action::RevokeAttribute { .. } => "revokeAttribute",
        }
    }

    /// `keccak256(name)`
    pub fn type_tag(&self) -> [u8; 32] {
        keccak256(self.name().as_bytes())
    }

    /// Tightly packed parameter tuple
    pub fn packed_params(&self) -> Vec<u8> {
        let mut packed = Vec::new();
        match self {
            Action::ChangeOwner { new_owner } => {
                packed.extend_from_slice(new_owner.as_bytes());
            }
            Action::AddDelegate {
                delegate_type,
                delegate,
                validity,
            } => {
                packed.extend_from_slice(delegate_type.as_bytes());
                packed.extend_from_slice(delegate.as_bytes());
                packed.extend_from_slice(&uint256(*validity));
            }
            Action::RevokeDelegate {
                delegate_type,
                delegate,
            } => {
                packed.extend_from_slice(delegate_type.as_bytes());
                packed.extend_from_slice(delegate.as_bytes());
            }
            Action::SetAttribute {
                name,
                value,
                validity,
            } => {
                packed.extend_from_slice(name.as_bytes());
                packed.extend_from_slice(value);
                packed.extend_from_slice(&uint256(*validity));
            }
            Action::RevokeAttribute { name, value } => {
                packed.extend_from_slice(name.as_bytes());
                packed.extend_from_slice(value);
            }
        }
        packed
    }

    /// `keccak256(type_tag ‖ keccak256(packed_params))`
    pub fn action_hash(&self) -> [u8; 32] {
        let params_hash = keccak256(&self.packed_params());
        keccak256_concat(&[&self.type_tag()[..], &params_hash[..]])
    }
}

/// `keccak256(registry ‖ uint256(nonce) ‖ action_hash)`
pub fn payload_hash(registry: &Address, nonce: ChangePointer, action: &Action) -> [u8; 32] {
    keccak256_concat(&[
        &registry.as_bytes()[..],
        &nonce.to_uint256()[..],
        &action.action_hash()[..],
    ])
}

/// Digest the controller signs: the EIP-191 personal message of the payload hash
pub fn signing_digest(registry: &Address, nonce: ChangePointer, action: &Action) -> [u8; 32] {
    eth_signed_message_hash(&payload_hash(registry, nonce, action))
}
