//! Notification fan-out.
//!
//! Resolves role-tagged audiences to push tokens, sends, and prunes
//! tokens the push service reports as permanently dead. Transient
//! per-token failures keep the token for a future retry; only an
//! unreachable push service fails the caller.

use crate::dispatch::push::{PushClient, PushMessage, SendOutcome};
use crate::error::PipelineError;
use crate::logging::LogContext;
use crate::storage::models::{Role, User};
use crate::storage::DurableStore;

/// Counts from one fan-out.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub pruned_tokens: usize,
}

/// Send one multicast push to every user in the target roles that has a
/// deliverable token.
///
/// Zero resolvable recipients is a normal no-op: `{sent: 0, failed: 0}`.
pub fn send_to_roles(
    store: &dyn DurableStore,
    push: &dyn PushClient,
    roles: &[Role],
    message: &PushMessage,
    ctx: &LogContext,
) -> Result<DispatchReport, PipelineError> {
    let recipients: Vec<(String, String)> = store
        .users_with_roles(roles)?
        .into_iter()
        .filter_map(|u| {
            let token = u.deliverable_token()?.to_string();
            Some((u.id, token))
        })
        .collect();

    if recipients.is_empty() {
        log::info!("{} PUSH_NO_RECIPIENTS roles={:?}", ctx, roles);
        return Ok(DispatchReport::default());
    }

    log::debug!(
        "{} PUSH_MULTICAST recipients={} payload={}",
        ctx,
        recipients.len(),
        serde_json::to_string(message).unwrap_or_default()
    );

    let tokens: Vec<String> = recipients.iter().map(|(_, t)| t.clone()).collect();
    let outcomes = push.send_multicast(message, &tokens)?;

    let mut report = DispatchReport::default();
    let mut stale_user_ids = Vec::new();

    for ((user_id, _), outcome) in recipients.iter().zip(outcomes) {
        match outcome {
            SendOutcome::Delivered => report.sent += 1,
            SendOutcome::InvalidToken => {
                report.failed += 1;
                stale_user_ids.push(user_id.clone());
            }
            SendOutcome::Transient(reason) => {
                report.failed += 1;
                log::warn!(
                    "{} PUSH_TOKEN_TRANSIENT_FAILURE user={} reason={}",
                    ctx,
                    user_id,
                    reason
                );
            }
        }
    }

    if !stale_user_ids.is_empty() {
        store.clear_push_tokens(&stale_user_ids)?;
        report.pruned_tokens = stale_user_ids.len();
        log::info!(
            "{} STALE_TOKENS_PRUNED count={}",
            ctx,
            stale_user_ids.len()
        );
    }

    log::info!(
        "{} PUSH_DISPATCHED sent={} failed={} pruned={}",
        ctx,
        report.sent,
        report.failed,
        report.pruned_tokens
    );

    Ok(report)
}

/// Send a single-target push to one user.
///
/// Returns whether the message was delivered. A missing or dead token
/// is a soft no-op; a permanently invalid token is cleared.
pub fn send_to_user(
    store: &dyn DurableStore,
    push: &dyn PushClient,
    user: &User,
    message: &PushMessage,
    ctx: &LogContext,
) -> Result<bool, PipelineError> {
    let token = match user.deliverable_token() {
        Some(t) => t.to_string(),
        None => {
            log::info!("{} PUSH_SKIPPED_NO_TOKEN user={}", ctx, user.id);
            return Ok(false);
        }
    };

    match push.send_single(message, &token)? {
        SendOutcome::Delivered => {
            log::info!("{} PUSH_DELIVERED user={}", ctx, user.id);
            Ok(true)
        }
        SendOutcome::InvalidToken => {
            store.clear_push_tokens(&[user.id.clone()])?;
            log::info!("{} STALE_TOKEN_PRUNED user={}", ctx, user.id);
            Ok(false)
        }
        SendOutcome::Transient(reason) => {
            log::warn!(
                "{} PUSH_TOKEN_TRANSIENT_FAILURE user={} reason={}",
                ctx,
                user.id,
                reason
            );
            Ok(false)
        }
    }
}
