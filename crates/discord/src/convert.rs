//! Conversions between the engine's event model and serenity wire types.

use {
    palaver_interactions::Emoji,
    serenity::all::{EmojiId, ReactionType},
};

pub(crate) fn to_reaction_type(emoji: &Emoji) -> ReactionType {
    match emoji {
        Emoji::Unicode(glyph) => ReactionType::Unicode(glyph.clone()),
        Emoji::Custom { id, name } => ReactionType::Custom {
            animated: false,
            id: EmojiId::new(*id),
            name: name.clone(),
        },
    }
}

pub(crate) fn from_reaction_type(reaction: &ReactionType) -> Emoji {
    match reaction {
        ReactionType::Unicode(glyph) => Emoji::Unicode(glyph.clone()),
        ReactionType::Custom { id, name, .. } => Emoji::Custom {
            id: id.get(),
            name: name.clone(),
        },
        other => Emoji::Unicode(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_round_trip() {
        let emoji = Emoji::unicode("👍");
        assert_eq!(from_reaction_type(&to_reaction_type(&emoji)), emoji);
    }

    #[test]
    fn custom_round_trip() {
        let emoji = Emoji::Custom {
            id: 42,
            name: Some("blob".to_owned()),
        };
        assert_eq!(from_reaction_type(&to_reaction_type(&emoji)), emoji);
    }
}
