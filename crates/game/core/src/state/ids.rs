//! Identifier newtypes shared by state, content and the runtime.

use core::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Player or NPC identity.
    EntityId
);
string_id!(
    /// Opaque room identifier supplied by the world layer.
    RoomId
);
string_id!(
    /// NPC template identifier (e.g. `"bandit"`).
    TemplateId
);
string_id!(
    /// Skill identifier. Base skills use their category name (`"sword"`).
    SkillId
);
string_id!(ItemId);
string_id!(TechniqueId);

/// Identifies one physical opponent instance: the `index`-th copy of
/// `template` placed in `room`.
///
/// This composite is the key of every shared opponent record in the
/// persistence store, so two players fighting "the second bandit" in the
/// same room see the same health.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpponentKey {
    pub room: RoomId,
    pub template: TemplateId,
    pub index: u32,
}

impl OpponentKey {
    pub fn new(room: RoomId, template: TemplateId, index: u32) -> Self {
        Self {
            room,
            template,
            index,
        }
    }

    /// Entity id used for the opponent's snapshot.
    pub fn entity_id(&self) -> EntityId {
        EntityId(self.to_string())
    }
}

impl fmt::Display for OpponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.room, self.template, self.index)
    }
}
