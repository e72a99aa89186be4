//! Category code to fill color lookup.

use parcel_map_parcel_models::{CategoryGroup, CategoryVisibility};

/// Returns the fill color for a parcel with category `code`, or `None`
/// when its group is unclassified or toggled off.
#[must_use]
pub const fn color_for(code: char, visibility: &CategoryVisibility) -> Option<&'static str> {
    let group = CategoryGroup::from_code(code);
    if visibility.is_visible(group) {
        group.color()
    } else {
        None
    }
}
