mod tests {
    use std::collections::HashMap;

    use myrtio_metar_composer::classify::{
        Condition, ConditionClassifier, LIGHTNING_KEYWORDS, SNOW_KEYWORDS, contains_keyword,
        derive_category,
    };
    use myrtio_metar_composer::roster::Roster;
    use myrtio_metar_composer::weather::{
        AirportRecord, FlightCategory, Visibility, WeatherSnapshot,
    };

    fn observed(raw: &str) -> AirportRecord {
        AirportRecord {
            flight_category: Some(FlightCategory::Vfr),
            raw_observation: raw.to_owned(),
            ..AirportRecord::default()
        }
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(derive_category(Some(5.0), None), FlightCategory::Vfr);
        assert_eq!(derive_category(Some(4.99), None), FlightCategory::Mvfr);
        assert_eq!(derive_category(Some(3.0), None), FlightCategory::Mvfr);
        assert_eq!(derive_category(Some(2.99), None), FlightCategory::Ifr);
        assert_eq!(derive_category(Some(1.0), None), FlightCategory::Ifr);
        assert_eq!(derive_category(Some(0.9), None), FlightCategory::Lifr);
        assert_eq!(derive_category(None, Some(5000.0)), FlightCategory::Missing);
    }

    #[test]
    fn test_ceiling_thresholds() {
        assert_eq!(derive_category(Some(10.0), Some(3000.0)), FlightCategory::Vfr);
        assert_eq!(derive_category(Some(10.0), Some(2999.0)), FlightCategory::Mvfr);
        assert_eq!(derive_category(Some(10.0), Some(1000.0)), FlightCategory::Mvfr);
        assert_eq!(derive_category(Some(10.0), Some(999.0)), FlightCategory::Ifr);
        assert_eq!(derive_category(Some(10.0), Some(500.0)), FlightCategory::Ifr);
        assert_eq!(derive_category(Some(10.0), Some(499.0)), FlightCategory::Lifr);
    }

    #[test]
    fn test_keywords_match_whole_words() {
        assert!(contains_keyword("KSEA 121853Z TS OVC010", &LIGHTNING_KEYWORDS));
        assert!(contains_keyword("KSEA 121853Z VCTS", &LIGHTNING_KEYWORDS));
        assert!(contains_keyword("KSEA 121853Z LTG DSNT", &LIGHTNING_KEYWORDS));
        assert!(!contains_keyword("KTSA 121853Z 10SM CLR", &LIGHTNING_KEYWORDS));
        assert!(!contains_keyword("KSEA 121853Z TSRA", &LIGHTNING_KEYWORDS));

        assert!(contains_keyword("KDEN 121853Z -SN BR", &SNOW_KEYWORDS));
        assert!(contains_keyword("KDEN 121853Z BLSN", &SNOW_KEYWORDS));
        assert!(!contains_keyword("KSNA 121853Z 10SM", &SNOW_KEYWORDS));
        assert!(!contains_keyword("", &SNOW_KEYWORDS));
    }

    #[test]
    fn test_classify_record() {
        let classifier = ConditionClassifier::new(20.0);

        let calm = classifier.classify(&observed("KSEA 10SM"));
        assert_eq!(calm.category, FlightCategory::Vfr);
        assert!(!calm.windy && !calm.lightning && !calm.snow);

        let gusty = AirportRecord {
            wind_speed: Some(12.0),
            wind_gust: Some(28.0),
            ..observed("")
        };
        assert!(classifier.classify(&gusty).windy);

        let at_threshold = AirportRecord {
            wind_speed: Some(20.0),
            ..observed("")
        };
        assert!(!classifier.classify(&at_threshold).windy);

        let stormy = classifier.classify(&observed("KDEN VCTS -SN"));
        assert!(stormy.lightning);
        assert!(stormy.snow);
    }

    #[test]
    fn test_category_derived_when_absent() {
        let classifier = ConditionClassifier::new(20.0);
        let record = AirportRecord {
            visibility: Some(Visibility::Text("1/2".to_owned())),
            ..AirportRecord::default()
        };
        assert_eq!(classifier.classify(&record).category, FlightCategory::Lifr);

        let unparseable = AirportRecord {
            visibility: Some(Visibility::Text("fog".to_owned())),
            ..AirportRecord::default()
        };
        let classification = classifier.classify(&unparseable);
        assert_eq!(classification.category, FlightCategory::Missing);
        assert!(classification.has(Condition::Missing));
    }

    #[test]
    fn test_classify_roster() {
        let roster = Roster::parse("KSEA\nSKIP\nKPDX\nKBFI", 4);
        let snapshot = WeatherSnapshot::new(
            HashMap::from([
                (
                    "KSEA".to_owned(),
                    AirportRecord {
                        wind_speed: Some(5.0),
                        ..observed("KSEA SN")
                    },
                ),
                (
                    "KPDX".to_owned(),
                    AirportRecord {
                        flight_category: Some(FlightCategory::Ifr),
                        wind_speed: Some(25.0),
                        ..observed("KPDX TS")
                    },
                ),
                ("KLAX".to_owned(), observed("KLAX")),
            ]),
            None,
        );

        let classified = ConditionClassifier::new(20.0).classify_roster(&roster, &snapshot);
        assert_eq!(classified.category("KSEA"), FlightCategory::Vfr);
        assert_eq!(classified.category("KPDX"), FlightCategory::Ifr);
        assert_eq!(classified.category("KBFI"), FlightCategory::Missing);

        let windy = classified.set(Condition::Windy);
        assert_eq!(windy.len(), 1);
        assert!(windy.contains("KPDX"));
        assert!(classified.set(Condition::Lightning).contains("KPDX"));
        assert!(classified.set(Condition::Snow).contains("KSEA"));
        assert!(classified.set(Condition::Missing).contains("KBFI"));
        assert!(!classified.set(Condition::Missing).contains("KLAX"));
    }
}
