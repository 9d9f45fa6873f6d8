//! Reaction handlers
//!
//! Form endpoints for thread and comment reactions. Every successful post
//! redirects back to the thread page; failures answer with the JSON error
//! body and the status of the failure.

use axum::{extract::State, response::Redirect, Json};
use forum_core::{Identity, Polarity, ReactionTarget, ThreadId};
use forum_service::dto::{CommentReactionForm, ThreadQuery, ThreadReactionForm, ThreadSummaryResponse};
use forum_service::ReactionService;
use tracing::warn;

use crate::extractors::{CurrentIdentity, QueryParams, ValidatedForm, ViewerIdentity};
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Transition {
    React,
    Change,
}

fn thread_page(thread_id: ThreadId) -> Redirect {
    Redirect::to(&format!("/thread?id={thread_id}"))
}

async fn apply(
    state: &AppState,
    identity: &Identity,
    target: ReactionTarget,
    polarity: Polarity,
    transition: Transition,
) -> ApiResult<()> {
    let service = ReactionService::new(state.service_context());
    match transition {
        Transition::React => service.react(target, identity, polarity).await?,
        Transition::Change => service.change_reaction(target, identity, polarity).await?,
    };
    Ok(())
}

async fn thread_reaction(
    state: AppState,
    identity: CurrentIdentity,
    form: ThreadReactionForm,
    transition: Transition,
) -> ApiResult<Redirect> {
    let (thread_id, polarity) = form.parse()?;
    apply(
        &state,
        &identity.0,
        ReactionTarget::Thread(thread_id),
        polarity,
        transition,
    )
    .await?;
    Ok(thread_page(thread_id))
}

async fn comment_reaction(
    state: AppState,
    identity: CurrentIdentity,
    form: CommentReactionForm,
    transition: Transition,
) -> ApiResult<Redirect> {
    let (comment_id, polarity) = form.parse()?;

    // The actor is always the session identity
    if let Some(claimed) = form.claimed_user_id() {
        let actual = identity.0.user_id().map(i64::from);
        if actual != Some(claimed) {
            warn!(claimed, actual = ?actual, "Ignoring user_id that does not match the session");
        }
    }

    apply(
        &state,
        &identity.0,
        ReactionTarget::Comment(comment_id),
        polarity,
        transition,
    )
    .await?;

    Ok(match form.redirect_thread() {
        Some(thread_id) => thread_page(thread_id),
        None => Redirect::to("/index"),
    })
}

/// Like or dislike a thread
///
/// POST /like-dislike
pub async fn react_to_thread(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedForm(form): ValidatedForm<ThreadReactionForm>,
) -> ApiResult<Redirect> {
    thread_reaction(state, identity, form, Transition::React).await
}

/// Flip an existing thread reaction
///
/// POST /like-dislike/change
pub async fn change_thread_reaction(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedForm(form): ValidatedForm<ThreadReactionForm>,
) -> ApiResult<Redirect> {
    thread_reaction(state, identity, form, Transition::Change).await
}

/// Like or dislike a comment
///
/// POST /comment-like-dislike
pub async fn react_to_comment(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedForm(form): ValidatedForm<CommentReactionForm>,
) -> ApiResult<Redirect> {
    comment_reaction(state, identity, form, Transition::React).await
}

/// Flip an existing comment reaction
///
/// POST /comment-like-dislike/change
pub async fn change_comment_reaction(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    ValidatedForm(form): ValidatedForm<CommentReactionForm>,
) -> ApiResult<Redirect> {
    comment_reaction(state, identity, form, Transition::Change).await
}

/// Counters of a thread and its comments
///
/// GET /thread?id=
pub async fn thread_summary(
    State(state): State<AppState>,
    ViewerIdentity(viewer): ViewerIdentity,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> ApiResult<Json<ThreadSummaryResponse>> {
    let thread_id = query.parse()?;
    let summary = ReactionService::new(state.service_context())
        .thread_summary(thread_id, &viewer)
        .await?;
    Ok(Json(summary))
}
