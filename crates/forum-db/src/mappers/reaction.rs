//! Reaction model -> entity mapper

use forum_core::{
    DomainError, Polarity, ReactionRecord, ReactionTally, ReactionTarget, TargetKind, UserId,
};

use crate::models::{ReactionModel, TallyModel};

pub fn target_kind_from_str(s: &str) -> Result<TargetKind, DomainError> {
    match s {
        "thread" => Ok(TargetKind::Thread),
        "comment" => Ok(TargetKind::Comment),
        other => Err(DomainError::DatabaseError(format!(
            "unknown reaction target kind: {other}"
        ))),
    }
}

impl TryFrom<ReactionModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let kind = target_kind_from_str(&model.target_kind)?;
        let polarity = Polarity::try_from(model.like_type)
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(ReactionRecord {
            target: ReactionTarget::from_parts(kind, model.target_id),
            user_id: UserId::new(model.user_id),
            polarity,
            created_at: model.created_at,
        })
    }
}

impl From<TallyModel> for ReactionTally {
    fn from(model: TallyModel) -> Self {
        ReactionTally::new(model.likes, model.dislikes)
    }
}
