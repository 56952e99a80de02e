use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new_random() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

id_newtype!(ProfileId);
id_newtype!(CommerceId);
id_newtype!(EventId);

/// Lifecycle state of an event. The database stores English or French
/// literals; unknown literals are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Active,
    Inactive,
    Draft,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Positive,
    Negative,
    Neutral,
}

impl EventStatus {
    pub fn parse(literal: &str) -> Self {
        match literal {
            "active" | "actif" => Self::Active,
            "inactive" | "inactif" => Self::Inactive,
            "draft" | "brouillon" => Self::Draft,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn badge_label(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Draft => "Brouillon",
            Self::Other(literal) => literal,
        }
    }

    pub fn badge_tone(&self) -> BadgeTone {
        match self {
            Self::Active => BadgeTone::Positive,
            Self::Inactive => BadgeTone::Negative,
            Self::Draft | Self::Other(_) => BadgeTone::Neutral,
        }
    }

    /// Literal written back when a status is picked from the form.
    pub fn as_literal(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
            Self::Other(literal) => literal,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub commerce_id: CommerceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_participants: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participants_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn status(&self) -> EventStatus {
        EventStatus::parse(&self.status)
    }

    pub fn conditions_text(&self) -> Option<&str> {
        self.conditions.as_deref().filter(|text| !text.is_empty())
    }

    pub fn image_source(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Editable subset of an event, produced by the create/edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub commerce_id: CommerceId,
    pub title: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    pub max_participants: u32,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl EventDraft {
    pub fn empty(commerce_id: CommerceId) -> Self {
        Self {
            commerce_id,
            title: String::new(),
            short_description: String::new(),
            image_url: None,
            location: String::new(),
            conditions: None,
            max_participants: 0,
            status: EventStatus::Draft.as_literal().to_string(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            commerce_id: event.commerce_id,
            title: event.title.clone(),
            short_description: event.short_description.clone(),
            image_url: event.image_url.clone(),
            location: event.location.clone(),
            conditions: event.conditions.clone(),
            max_participants: event.max_participants,
            status: event.status.clone(),
            start_date: event.start_date.clone(),
            end_date: event.end_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: ProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
