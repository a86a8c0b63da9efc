mod tests {
    use myrtio_metar_composer::roster::{Roster, Slot};

    #[test]
    fn test_slot_parse() {
        assert_eq!(Slot::parse("KSEA"), Slot::Airport("KSEA".to_owned()));
        assert_eq!(Slot::parse("  kpdx \r"), Slot::Airport("KPDX".to_owned()));
        assert_eq!(Slot::parse("SKIP"), Slot::Skip);
        assert_eq!(Slot::parse("skip"), Slot::Skip);
        assert_eq!(Slot::parse(""), Slot::Skip);
        assert_eq!(Slot::parse("   "), Slot::Skip);
    }

    #[test]
    fn test_roster_matches_pixel_count() {
        let text = "KSEA\nSKIP\nKPDX\n";
        for pixel_count in [1, 2, 3, 5, 50] {
            assert_eq!(Roster::parse(text, pixel_count).len(), pixel_count);
        }
    }

    #[test]
    fn test_roster_pads_with_skip() {
        let roster = Roster::parse("KSEA", 3);
        assert_eq!(roster.get(0), Some(&Slot::Airport("KSEA".to_owned())));
        assert_eq!(roster.get(1), Some(&Slot::Skip));
        assert_eq!(roster.get(2), Some(&Slot::Skip));
        assert_eq!(roster.get(3), None);
    }

    #[test]
    fn test_roster_truncates() {
        let roster = Roster::parse("KSEA\nKPDX\nKBFI", 2);
        let codes: Vec<_> = roster.airports().map(|(_, code)| code).collect();
        assert_eq!(codes, ["KSEA", "KPDX"]);
    }

    #[test]
    fn test_airports_keep_slot_index() {
        let roster = Roster::parse("KSEA\nSKIP\n\nKPDX", 4);
        let airports: Vec<_> = roster.airports().collect();
        assert_eq!(airports, [(0, "KSEA"), (3, "KPDX")]);
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::empty(4);
        assert_eq!(roster.len(), 4);
        assert!(roster.slots().iter().all(|slot| *slot == Slot::Skip));
        assert_eq!(roster.airports().count(), 0);
    }
}
