mod tests {
    use myrtio_metar_composer::math8::{
        blend8, fraction_to_level, relative_level, scale8, step_progress8,
    };

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_blend8_reaches_target() {
        for (a, b) in [(255, 25), (25, 255), (0, 255), (200, 13)] {
            assert_eq!(blend8(a, b, 255), b);
            assert_eq!(blend8(a, b, 0), a);
        }
    }

    #[test]
    fn test_step_progress8() {
        assert_eq!(step_progress8(0, 100), 0);
        assert_eq!(step_progress8(50, 100), 127);
        assert_eq!(step_progress8(100, 100), 255);
        assert_eq!(step_progress8(1, 1), 255);
        assert_eq!(step_progress8(3, 0), 255);
    }

    #[test]
    fn test_fraction_to_level() {
        assert_eq!(fraction_to_level(0.0), 0);
        assert_eq!(fraction_to_level(1.0), 255);
        assert_eq!(fraction_to_level(0.5), 128);
        assert_eq!(fraction_to_level(-0.5), 0);
        assert_eq!(fraction_to_level(3.0), 255);
        assert_eq!(fraction_to_level(f32::NAN), 0);
    }

    #[test]
    fn test_relative_level() {
        assert_eq!(relative_level(13, 128), 25);
        assert_eq!(relative_level(128, 128), 255);
        assert_eq!(relative_level(200, 128), 255);
        assert_eq!(relative_level(10, 0), 255);
    }
}
