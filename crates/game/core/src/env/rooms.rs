use crate::state::{OpponentKey, RoomId, TemplateId};

/// `count` instances of `template` live in the room.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    pub template: TemplateId,
    pub count: u32,
}

impl RosterEntry {
    pub fn new(template: impl Into<TemplateId>, count: u32) -> Self {
        Self {
            template: template.into(),
            count,
        }
    }
}

/// Combat-relevant room data. Exits and descriptions belong to the world
/// layer and are not modelled here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoomDefinition {
    pub name: String,
    /// Fighting is forbidden here.
    pub safe: bool,
    pub roster: Vec<RosterEntry>,
}

impl RoomDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn safe(mut self) -> Self {
        self.safe = true;
        self
    }

    pub fn with_roster(mut self, template: impl Into<TemplateId>, count: u32) -> Self {
        self.roster.push(RosterEntry::new(template, count));
        self
    }

    /// Number of instances of `template` placed here.
    pub fn count_of(&self, template: &TemplateId) -> u32 {
        self.roster
            .iter()
            .filter(|entry| &entry.template == template)
            .map(|entry| entry.count)
            .sum()
    }

    /// Every opponent instance the roster places in room `id`.
    pub fn instances<'a>(&'a self, id: &'a RoomId) -> impl Iterator<Item = OpponentKey> + 'a {
        self.roster.iter().flat_map(move |entry| {
            (0..entry.count)
                .map(move |index| OpponentKey::new(id.clone(), entry.template.clone(), index))
        })
    }
}

/// Oracle providing room definitions.
pub trait RoomOracle: Send + Sync {
    fn room(&self, id: &RoomId) -> Option<RoomDefinition>;
}
