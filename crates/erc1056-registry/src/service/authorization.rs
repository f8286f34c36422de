//! Direct and signed authorization against the current controller.

use crate::{action::Action, errors::*, traits::EventSink, types::*};
use erc1056_crypto::{recover_address, EcdsaSignature};
use erc1056_storage::Storage;
use tracing::warn;

use super::DidRegistryService;

/// Proof that a mutation is permitted
#[derive(Debug, Clone, Copy)]
pub(crate) enum Authority<'a> {
    /// Authenticated transaction sender
    Direct(Address),
    /// Controller's signature over the action at the current nonce
    Signed(&'a EcdsaSignature),
}

impl<S, E> DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    /// Check `authority` for `action` on `identity`
    ///
    /// Returns the identity's prior change pointer, which is both the nonce
    /// the signature was checked against and the `previous_change` of the
    /// event about to be emitted.
    pub(super) async fn authorize(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        action: &Action,
    ) -> Result<ChangePointer> {
        let prior = self.begin_change(ctx, identity).await?;
        let owner = self.current_controller_internal(identity).await?;

        match authority {
            Authority::Direct(sender) => {
                if sender != owner {
                    warn!(
                        identity = %identity,
                        sender = %sender,
                        action = action.name(),
                        "Rejected change from non-owner"
                    );
                    return Err(RegistryError::NotCurrentOwner { identity, sender });
                }
            }
            Authority::Signed(signature) => {
                let digest = crate::action::signing_digest(&self.registry_address, prior, action);
                let signer = recover_address(&digest, signature).map_err(|e| {
                    warn!(
                        identity = %identity,
                        action = action.name(),
                        error = %e,
                        "Rejected malformed signature"
                    );
                    RegistryError::InvalidSignature(e.to_string())
                })?;
                let signer = Address(signer);

                if signer != owner {
                    warn!(
                        identity = %identity,
                        signer = %signer,
                        nonce = %prior,
                        action = action.name(),
                        "Rejected signature from non-owner"
                    );
                    return Err(RegistryError::SignerNotOwner { identity, signer });
                }
            }
        }

        Ok(prior)
    }
}
