//! Machine lookup
//!
//! Resolves a scanned or typed string against the catalog. Pure and
//! recomputed on every call; nothing is cached.

use mtrack_model::Machine;

/// First machine whose QR code or primary id equals `candidate`
///
/// A single pass in catalog order: a machine matching by id that comes before
/// another matching by QR code wins.
#[must_use]
pub fn find_machine<'a>(machines: &'a [Machine], candidate: &str) -> Option<&'a Machine> {
    machines.iter().find(|m| m.answers_to(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog() -> Vec<Machine> {
        vec![
            Machine::new("m1", "QR1", "Press A"),
            Machine::new("m2", "QR2", "Lathe B"),
            Machine::new("QR2", "QR3", "Mill C"),
        ]
    }

    #[test]
    fn finds_by_qr_code() {
        let machines = catalog();
        assert_eq!(find_machine(&machines, "QR1").map(|m| m.name.as_str()), Some("Press A"));
    }

    #[test]
    fn finds_by_primary_id() {
        let machines = catalog();
        assert_eq!(find_machine(&machines, "m2").map(|m| m.name.as_str()), Some("Lathe B"));
    }

    #[test]
    fn first_match_in_catalog_order_wins() {
        // "QR2" is Lathe B's QR code and Mill C's id; Lathe B comes first.
        let machines = catalog();
        assert_eq!(find_machine(&machines, "QR2").map(|m| m.name.as_str()), Some("Lathe B"));
    }

    #[test]
    fn unknown_and_empty() {
        let machines = catalog();
        assert!(find_machine(&machines, "unknown").is_none());
        assert!(find_machine(&machines, "").is_none());
        assert!(find_machine(&[], "QR1").is_none());
    }

    fn machine_strategy() -> impl Strategy<Value = Machine> {
        ("[a-c]{1,2}", "[a-c]{1,2}", "[a-z]{3}").prop_map(|(id, qr, name)| Machine::new(id, qr, name))
    }

    proptest! {
        #[test]
        fn prop_matches_reference_scan(
            machines in prop::collection::vec(machine_strategy(), 0..8),
            candidate in "[a-c]{0,2}",
        ) {
            let expected = machines
                .iter()
                .position(|m| m.qr_code == candidate || m.id.as_str() == candidate);
            let found = find_machine(&machines, &candidate)
                .and_then(|hit| machines.iter().position(|m| std::ptr::eq(m, hit)));
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn prop_lookup_leaves_catalog_untouched(
            machines in prop::collection::vec(machine_strategy(), 0..8),
            candidate in "[a-c]{0,2}",
        ) {
            let before = machines.clone();
            let _ = find_machine(&machines, &candidate);
            prop_assert_eq!(machines, before);
        }
    }
}
