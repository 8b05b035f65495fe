//! Human-readable party lists.

use crate::types::PartyRecord;

/// Separator placed between two parties. The Hebrew "and" prefix attaches
/// to the following name.
pub const CONJUNCTION: &str = " ו-";

/// Format one party as `"{LAST_NAME} {FIRST_NAME} {ID_KIND} {ID}"`.
#[must_use]
pub fn format_party(party: &PartyRecord) -> String {
    format!(
        "{} {} {} {}",
        party.last_name, party.first_name, party.id_kind, party.id
    )
}

/// Join all parties in order into a single conjunction list.
///
/// An empty slice yields an empty string; the last party is never followed
/// by a conjunction.
///
/// # Examples
/// ```
/// use dealdocs_core::parties::format_party_list;
/// use dealdocs_core::PartyRecord;
///
/// let party = PartyRecord::new("Cohen", "Dana", "ID", "1");
/// assert_eq!(format_party_list(&[party]), "Cohen Dana ID 1");
/// assert_eq!(format_party_list(&[]), "");
/// ```
#[must_use]
pub fn format_party_list(parties: &[PartyRecord]) -> String {
    parties
        .iter()
        .map(format_party)
        .collect::<Vec<_>>()
        .join(CONJUNCTION)
}
