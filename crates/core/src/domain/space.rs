use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub String);

/// A named node in the zone hierarchy. Zones point at their floor through
/// `parent_id`; floors have no parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<SpaceId>,
}

/// Lookup over the zone→floor hierarchy, built once per request.
///
/// Only one parent level is supported: a zone resolves to its floor and the
/// walk stops there, never continuing to an arbitrary depth.
#[derive(Debug)]
pub struct SpaceIndex<'a> {
    by_id: HashMap<&'a str, &'a Space>,
    by_name: HashMap<String, &'a Space>,
}

impl<'a> SpaceIndex<'a> {
    pub fn build(spaces: &'a [Space]) -> Self {
        let mut by_id = HashMap::with_capacity(spaces.len());
        let mut by_name = HashMap::with_capacity(spaces.len());
        for space in spaces {
            by_id.insert(space.id.0.as_str(), space);
            by_name.insert(space.name.trim().to_ascii_lowercase(), space);
        }
        Self { by_id, by_name }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&'a Space> {
        self.by_name.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Resolve the floor name for a zone. `None` when the zone is unknown
    /// or has no resolvable parent.
    pub fn floor_of(&self, zone_name: &str) -> Option<&'a str> {
        let zone = self.find_by_name(zone_name)?;
        let parent_id = zone.parent_id.as_ref()?;
        self.by_id.get(parent_id.0.as_str()).map(|parent| parent.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Space, SpaceId, SpaceIndex};

    fn spaces() -> Vec<Space> {
        vec![
            Space { id: SpaceId("SP-F3".to_string()), name: "3rd Floor".to_string(), parent_id: None },
            Space {
                id: SpaceId("SP-MKT".to_string()),
                name: "Marketing Zone".to_string(),
                parent_id: Some(SpaceId("SP-F3".to_string())),
            },
            Space {
                id: SpaceId("SP-ORPHAN".to_string()),
                name: "Annex".to_string(),
                parent_id: Some(SpaceId("SP-MISSING".to_string())),
            },
        ]
    }

    #[test]
    fn resolves_zone_to_its_floor() {
        let spaces = spaces();
        let index = SpaceIndex::build(&spaces);
        assert_eq!(index.floor_of("marketing zone"), Some("3rd Floor"));
    }

    #[test]
    fn unknown_zone_or_dangling_parent_resolves_to_none() {
        let spaces = spaces();
        let index = SpaceIndex::build(&spaces);
        assert_eq!(index.floor_of("Cafeteria"), None);
        assert_eq!(index.floor_of("Annex"), None);
        assert_eq!(index.floor_of("3rd Floor"), None);
    }
}
