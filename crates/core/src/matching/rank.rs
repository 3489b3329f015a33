use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::desk::Desk;
use crate::domain::preferences::EffectivePreferences;
use crate::matching::index::ReferenceIndex;

/// Sort one partition in place by the fixed three-key comparator:
/// equipment match count descending, then least-recently-used first, then
/// utilization ascending with missing metrics treated as the worst case.
/// `sort_by` is stable, so full ties keep their original relative order.
pub fn rank(desks: &mut [Desk], prefs: &EffectivePreferences, index: &ReferenceIndex) {
    desks.sort_by(|a, b| {
        equipment_matches(b, prefs)
            .cmp(&equipment_matches(a, prefs))
            .then_with(|| cmp_last_used(a.last_used, b.last_used))
            .then_with(|| {
                index
                    .utilization_rate(&a.area_id)
                    .partial_cmp(&index.utilization_rate(&b.area_id))
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Partial credit lives here: filtering demanded the full equipment set
/// only when needs were stated, ranking rewards whatever overlaps.
pub fn equipment_matches(desk: &Desk, prefs: &EffectivePreferences) -> usize {
    prefs.equipment_needs.iter().filter(|tag| desk.has_feature(tag)).count()
}

fn cmp_last_used(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // a never-used desk sorts as least recently used
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}
