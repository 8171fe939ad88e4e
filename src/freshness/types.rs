//! Freshness value objects: per-item and per-pack compilation state.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Compilation state of a single item as seen from its parent pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Clean,
    Absent,
    Dirty,
    Orphan,
}

/// Compilation state of a whole pack.
///
/// Declared in precedence order so that `Ord` gives the rollup rule directly:
/// `corrupt > dirty > absent > clean`, worst state wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackState {
    Clean,
    Absent,
    Dirty,
    Corrupt,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemState::Clean => "clean",
            ItemState::Absent => "absent",
            ItemState::Dirty => "dirty",
            ItemState::Orphan => "orphan",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for PackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PackState::Clean => "clean",
            PackState::Absent => "absent",
            PackState::Dirty => "dirty",
            PackState::Corrupt => "corrupt",
        };
        write!(f, "{s}")
    }
}

/// Freshness of one item in a pack's item list.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFreshness {
    pub name: String,
    pub is_composite: bool,
    pub state: ItemState,
}

/// Recursive freshness tree mirroring the pack directory structure.
///
/// Computed fresh on every `assess` call and discarded after use; each node
/// exclusively owns its children. `deep_state` is derived on demand, never
/// stored.
#[derive(Debug, Clone)]
pub struct PackFreshness {
    pub pack_root: PathBuf,
    pub state: PackState,
    pub items: Vec<ItemFreshness>,
    pub children: Vec<PackFreshness>,
}

impl PackFreshness {
    /// Worst state among this pack's own state and every descendant's deep
    /// state.
    pub fn deep_state(&self) -> PackState {
        self.children
            .iter()
            .map(PackFreshness::deep_state)
            .fold(self.state, PackState::max)
    }
}

impl Serialize for PackFreshness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // deep_state is derived, so plain derive would drop it from reports
        let mut st = serializer.serialize_struct("PackFreshness", 5)?;
        st.serialize_field("pack_root", &self.pack_root)?;
        st.serialize_field("state", &self.state)?;
        st.serialize_field("deep_state", &self.deep_state())?;
        st.serialize_field("items", &self.items)?;
        st.serialize_field("children", &self.children)?;
        st.end()
    }
}
