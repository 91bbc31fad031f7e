use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::ProvisionError;
use crate::model::{CoreExchange, DepositAddressAssignment, TokenResolver};

/// Push every assignment to `adapter`, one task each, and wait for all of
/// them. A token the resolver does not know fails the whole run; a failed
/// update is only logged.
pub async fn provision_deposit_addresses(
    adapter: Arc<dyn CoreExchange>,
    assignments: Vec<DepositAddressAssignment>,
    tokens: Arc<dyn TokenResolver>,
) -> Result<(), ProvisionError> {
    let exchange = adapter.id();
    let mut tasks = JoinSet::new();
    for assignment in assignments {
        let adapter = adapter.clone();
        let tokens = tokens.clone();
        tasks.spawn(async move {
            let token = tokens
                .get_internal_token_by_id(&assignment.token)
                .map_err(|error| ProvisionError::UnknownToken {
                    token: assignment.token.clone(),
                    error,
                })?;
            match adapter.update_deposit_address(&token, &assignment.address).await {
                Ok(()) => debug!(%exchange, token = %token.id, "deposit address updated"),
                Err(err) => warn!(%exchange, token = %token.id, "cannot update deposit address: {err:#}"),
            }
            Ok(())
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|error| Err(ProvisionError::Task { error }));
        if let Err(err) = result {
            if first_error.is_none() {
                first_error = Some(err);
            } else {
                warn!(%exchange, "provisioning: {err}");
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
