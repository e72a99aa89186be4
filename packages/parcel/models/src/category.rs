//! Land category (jimok) groups and the sidebar visibility toggles.
//!
//! The feature service encodes a parcel's land category as the last
//! character of its category symbol. Several codes collapse into one
//! display group; everything unknown lands in
//! [`CategoryGroup::Unclassified`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Dry field (jeon).
pub const DRY_FIELD_CODE: char = '전';
/// Paddy (dap).
pub const PADDY_CODE: char = '답';
/// Orchard (gwa).
pub const ORCHARD_CODE: char = '과';
/// Salt field (yeom).
pub const SALT_FIELD_CODE: char = '염';
/// Fish farm (yang).
pub const FISH_FARM_CODE: char = '양';
/// Forest (im).
pub const FOREST_CODE: char = '임';

/// Display group a land category code belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CategoryGroup {
    /// Paddy, dry field, and orchard.
    Farmland,
    /// Salt evaporation field.
    SaltField,
    /// Fish farm.
    FishFarm,
    /// Forest land.
    Forest,
    /// Any other code. Never filled.
    Unclassified,
}

impl CategoryGroup {
    /// Groups that have a sidebar toggle, in sidebar order.
    pub const TOGGLEABLE: &'static [Self] =
        &[Self::Farmland, Self::SaltField, Self::FishFarm, Self::Forest];

    /// Classifies a single category code. Total over all `char`s.
    #[must_use]
    pub const fn from_code(code: char) -> Self {
        match code {
            DRY_FIELD_CODE | PADDY_CODE | ORCHARD_CODE => Self::Farmland,
            SALT_FIELD_CODE => Self::SaltField,
            FISH_FARM_CODE => Self::FishFarm,
            FOREST_CODE => Self::Forest,
            _ => Self::Unclassified,
        }
    }

    /// Returns the codes that map to this group.
    #[must_use]
    pub const fn codes(self) -> &'static [char] {
        match self {
            Self::Farmland => &[DRY_FIELD_CODE, PADDY_CODE, ORCHARD_CODE],
            Self::SaltField => &[SALT_FIELD_CODE],
            Self::FishFarm => &[FISH_FARM_CODE],
            Self::Forest => &[FOREST_CODE],
            Self::Unclassified => &[],
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Farmland => "농지",
            Self::SaltField => "염전",
            Self::FishFarm => "양어장",
            Self::Forest => "임야",
            Self::Unclassified => "기타",
        }
    }

    /// Emoji shown in front of the sidebar label.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Farmland => "🟧",
            Self::SaltField => "🟩",
            Self::FishFarm => "🟥",
            Self::Forest => "⬛",
            Self::Unclassified => "⬜",
        }
    }

    /// Fill color, or `None` for groups that are never filled.
    #[must_use]
    pub const fn color(self) -> Option<&'static str> {
        match self {
            Self::Farmland => Some("#f4a261"),
            Self::SaltField => Some("#2a9d8f"),
            Self::FishFarm => Some("#e76f51"),
            Self::Forest => Some("#264653"),
            Self::Unclassified => None,
        }
    }
}

/// Which category groups are currently filled on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CategoryVisibility {
    /// Farmland toggle.
    pub farmland: bool,
    /// Salt field toggle.
    pub salt_field: bool,
    /// Fish farm toggle.
    pub fish_farm: bool,
    /// Forest toggle.
    pub forest: bool,
}

impl Default for CategoryVisibility {
    fn default() -> Self {
        Self::ALL_VISIBLE
    }
}

impl CategoryVisibility {
    /// Every toggle on, the state on first load.
    pub const ALL_VISIBLE: Self = Self {
        farmland: true,
        salt_field: true,
        fish_farm: true,
        forest: true,
    };

    /// Returns whether `group` is filled. [`CategoryGroup::Unclassified`]
    /// never is.
    #[must_use]
    pub const fn is_visible(&self, group: CategoryGroup) -> bool {
        match group {
            CategoryGroup::Farmland => self.farmland,
            CategoryGroup::SaltField => self.salt_field,
            CategoryGroup::FishFarm => self.fish_farm,
            CategoryGroup::Forest => self.forest,
            CategoryGroup::Unclassified => false,
        }
    }

    /// Returns a copy with `group`'s toggle set to `visible`.
    #[must_use]
    pub const fn with(mut self, group: CategoryGroup, visible: bool) -> Self {
        match group {
            CategoryGroup::Farmland => self.farmland = visible,
            CategoryGroup::SaltField => self.salt_field = visible,
            CategoryGroup::FishFarm => self.fish_farm = visible,
            CategoryGroup::Forest => self.forest = visible,
            CategoryGroup::Unclassified => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_farmland_codes() {
        for code in ['전', '답', '과'] {
            assert_eq!(CategoryGroup::from_code(code), CategoryGroup::Farmland);
        }
    }

    #[test]
    fn classifies_single_code_groups() {
        assert_eq!(CategoryGroup::from_code('염'), CategoryGroup::SaltField);
        assert_eq!(CategoryGroup::from_code('양'), CategoryGroup::FishFarm);
        assert_eq!(CategoryGroup::from_code('임'), CategoryGroup::Forest);
    }

    #[test]
    fn unknown_codes_are_unclassified() {
        for code in ['대', '도', 'x', ' '] {
            assert_eq!(CategoryGroup::from_code(code), CategoryGroup::Unclassified);
        }
    }

    #[test]
    fn codes_round_trip_through_from_code() {
        for group in CategoryGroup::TOGGLEABLE {
            for code in group.codes() {
                assert_eq!(CategoryGroup::from_code(*code), *group);
            }
        }
    }

    #[test]
    fn toggleable_groups_have_colors() {
        for group in CategoryGroup::TOGGLEABLE {
            assert!(group.color().is_some(), "{group} has no color");
        }
        assert!(CategoryGroup::Unclassified.color().is_none());
    }

    #[test]
    fn parses_group_names() {
        assert_eq!(
            "saltField".parse::<CategoryGroup>().unwrap(),
            CategoryGroup::SaltField
        );
        assert_eq!(CategoryGroup::FishFarm.to_string(), "fishFarm");
    }

    #[test]
    fn toggling_one_group_leaves_others() {
        let visibility = CategoryVisibility::default().with(CategoryGroup::Forest, false);
        assert!(!visibility.is_visible(CategoryGroup::Forest));
        assert!(visibility.is_visible(CategoryGroup::Farmland));
        assert!(visibility.is_visible(CategoryGroup::SaltField));
        assert!(visibility.is_visible(CategoryGroup::FishFarm));
        assert!(!visibility.is_visible(CategoryGroup::Unclassified));
    }

    #[test]
    fn missing_toggles_default_to_on() {
        let visibility: CategoryVisibility =
            serde_json::from_value(serde_json::json!({ "fishFarm": false })).unwrap();
        assert!(visibility.farmland);
        assert!(!visibility.fish_farm);
    }
}
