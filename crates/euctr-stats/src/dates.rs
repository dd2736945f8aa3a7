//! Date sanity checks used by the reporting analyses.

use chrono::NaiveDate;

/// True iff any two non-null dates in the tuple coincide exactly.
///
/// Multiple date sources for one trial (registry results, other registries,
/// journal publication) should never agree to the day; an exact match is a
/// strong signal of a data-entry copy rather than independent dates.
pub fn duplicate_date_check(dates: &[Option<NaiveDate>]) -> bool {
    let mut seen = Vec::with_capacity(dates.len());
    for date in dates.iter().flatten() {
        if seen.contains(date) {
            return true;
        }
        seen.push(*date);
    }
    false
}
