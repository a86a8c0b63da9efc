mod tests {
    use chrono::{NaiveDate, NaiveTime, Timelike};
    use myrtio_metar_composer::sun::sun_times;

    fn minutes(time: NaiveTime) -> u32 {
        time.hour() * 60 + time.minute()
    }

    #[test]
    fn test_seattle_midsummer() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        let times = sun_times(47.6, -122.3, date);

        // 05:11 and 21:11 PDT
        let sunrise = minutes(times.sunrise.unwrap().time());
        let sunset = minutes(times.sunset.unwrap().time());
        assert!((11 * 60 + 45..=12 * 60 + 40).contains(&sunrise), "sunrise {sunrise}");
        assert!((3 * 60 + 45..=4 * 60 + 40).contains(&sunset), "sunset {sunset}");
    }

    #[test]
    fn test_equinox_at_equator() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let times = sun_times(0.0, 0.0, date);
        let sunrise = minutes(times.sunrise.unwrap().time());
        let sunset = minutes(times.sunset.unwrap().time());
        assert!((5 * 60 + 45..=6 * 60 + 20).contains(&sunrise), "sunrise {sunrise}");
        assert!((17 * 60 + 55..=18 * 60 + 30).contains(&sunset), "sunset {sunset}");
    }

    #[test]
    fn test_midnight_sun_has_no_events() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        let times = sun_times(78.2, 15.6, date);
        assert_eq!(times.sunrise, None);
        assert_eq!(times.sunset, None);
    }
}
