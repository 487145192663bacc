use multi_filter::math::{MAX_FREQUENCY, MAX_Q, MIN_FREQUENCY, MIN_Q};
use multi_filter::{AudioProcess, Filter, FilterControl, FilterParameters, FilterType, MultiFilter};
use proptest::prelude::*;

fn filter_type_strategy() -> impl Strategy<Value = FilterType> {
    (0..FilterType::ALL.len()).prop_map(|index| FilterType::ALL[index])
}

proptest! {
    #[test]
    fn parameters_are_always_clamped(
        kind in filter_type_strategy(),
        frequency in -1.0e6f32..1.0e6,
        q in -100.0f32..100.0,
        gain in -60.0f32..60.0,
    ) {
        let mut filter = Filter::new(kind);
        filter.set_parameters(frequency, q, gain);
        let params = filter.parameters();

        prop_assert!((MIN_FREQUENCY..=MAX_FREQUENCY).contains(&params.frequency));
        prop_assert!((MIN_Q..=MAX_Q).contains(&params.q));
        prop_assert_eq!(params, FilterParameters::new(frequency, q, gain));
    }

    #[test]
    fn coefficients_are_finite(
        kind in filter_type_strategy(),
        frequency in MIN_FREQUENCY..MAX_FREQUENCY,
        q in MIN_Q..MAX_Q,
        gain in -30.0f32..30.0,
        sample_rate in prop::sample::select(vec![22_050u32, 44_100, 48_000, 96_000, 192_000]),
    ) {
        let params = FilterParameters::new(frequency, q, gain);
        let c = kind.coefficients(&params, sample_rate);
        for value in [c.a0, c.a1, c.a2, c.b1, c.b2, c.c0, c.d0] {
            prop_assert!(value.is_finite());
        }
        // Poles inside the unit circle
        prop_assert!(c.b2.abs() < 1.0);
        prop_assert!(c.b1.abs() < 1.0 + c.b2 + 1e-6);
    }

    #[test]
    fn bounded_input_gives_bounded_output(
        kind in filter_type_strategy(),
        frequency in MIN_FREQUENCY..MAX_FREQUENCY,
        q in MIN_Q..2.0f32,
        gain in -30.0f32..30.0,
        input in prop::collection::vec(-1.0f32..1.0, 1..512),
    ) {
        let mut filter = MultiFilter::with_sample_rate(48_000);
        filter.select(kind);
        filter.set_parameters(frequency, q, gain);

        let mut block = input;
        filter.process_block(&mut block);
        for y in block {
            prop_assert!(y.is_finite());
            prop_assert!(y.abs() < 256.0);
        }
    }
}
