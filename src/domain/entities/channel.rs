//! Channel definition and moderation rules.
//!
//! Channels are loaded once from configuration at startup. A definition is
//! immutable; membership and history live in the channel registry.

use serde::{Deserialize, Serialize};

/// Kind of moderation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Case-insensitive substring match against `match_value`
    Keyword,
    /// Marker for repetition spam. Detection itself is structural and
    /// applies to every channel, so this kind never transforms text.
    Spam,
}

/// What a matching rule does to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Replace every occurrence with `replacement_text`
    Replace,
    /// Inert. Kept so configurations round-trip through the query API.
    Flag,
}

/// A single moderation directive attached to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub id: String,

    #[serde(rename = "type", alias = "kind")]
    pub kind: RuleKind,

    /// Pattern for KEYWORD rules. Empty means the rule never matches.
    #[serde(rename = "value", alias = "match_value", default)]
    pub match_value: String,

    pub action: RuleAction,

    #[serde(
        alias = "replacement_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub replacement_text: Option<String>,
}

impl FilterRule {
    /// Build a KEYWORD/REPLACE rule.
    pub fn keyword(
        id: impl Into<String>,
        match_value: impl Into<String>,
        replacement_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Keyword,
            match_value: match_value.into(),
            action: RuleAction::Replace,
            replacement_text: Some(replacement_text.into()),
        }
    }

    /// Build a SPAM/FLAG marker rule.
    pub fn spam_flag(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Spam,
            match_value: String::new(),
            action: RuleAction::Flag,
            replacement_text: None,
        }
    }

    /// Whether this rule rewrites text when its pattern is found.
    pub fn is_replacing_keyword(&self) -> bool {
        self.kind == RuleKind::Keyword && !self.match_value.is_empty()
    }

    /// Replacement text, empty when none was configured.
    pub fn replacement(&self) -> &str {
        self.replacement_text.as_deref().unwrap_or_default()
    }
}

/// Static description of a channel, as found in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDefinition {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(alias = "filter_rules", default)]
    pub filter_rules: Vec<FilterRule>,
}

impl ChannelDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        filter_rules: Vec<FilterRule>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            filter_rules,
        }
    }
}

/// Channels available when no configuration overrides them.
pub fn default_channels() -> Vec<ChannelDefinition> {
    vec![
        ChannelDefinition::new(
            "genel-sohbet",
            "Genel Sohbet",
            "Herkesin katılabileceği genel sohbet odası",
            vec![
                FilterRule::keyword("1", "kötü kelime", "***"),
                FilterRule::spam_flag("2"),
            ],
        ),
        ChannelDefinition::new(
            "spor-sohbet",
            "Spor Sohbeti",
            "Spor hakkında konuşmak için",
            Vec::new(),
        ),
    ]
}
