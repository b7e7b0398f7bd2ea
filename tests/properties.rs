use approx::assert_relative_eq;
use es_adapt::params::LimitParams;
use es_adapt::{
    AdaptationManager, DitherGenerator, EsParams, FesParams, Filter, MovingAverageFilter,
    SineDither,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_parameter_never_leaves_limits(
        lo in -5.0f64..0.0,
        width in 0.0f64..5.0,
        samples in prop::collection::vec(-1e3f64..1e3, 1..200),
    ) {
        let mut params = FesParams::default();
        params.limits = LimitParams { min: lo, max: lo + width };
        let mut fes = params.build().unwrap();
        for (i, u) in samples.iter().enumerate() {
            let theta = fes.update_parameter(*u, i as f64).unwrap();
            prop_assert!(theta >= lo && theta <= lo + width);
        }
    }

    #[test]
    fn test_reset_makes_runs_repeatable(
        samples in prop::collection::vec(-10.0f64..10.0, 1..100),
    ) {
        let mut es = EsParams::default().build().unwrap();
        let run = |es: &mut dyn AdaptationManager| -> Vec<f64> {
            samples
                .iter()
                .enumerate()
                .map(|(i, u)| es.update_parameter(*u, i as f64).unwrap())
                .collect()
        };
        let first = run(&mut es);
        es.reset();
        prop_assert_eq!(es.parameter(), 0.0);
        prop_assert_eq!(run(&mut es), first);
    }

    #[test]
    fn test_dither_depends_only_on_time(
        a in 0.0f64..5.0,
        w in 0.01f64..10.0,
        phi in -3.2f64..3.2,
        t in -1e3f64..1e3,
    ) {
        let dither = SineDither::new(a, w, phi).unwrap();
        let first = dither.update(t);
        dither.update(t + 1.0);
        prop_assert_eq!(dither.update(t), first);
        prop_assert!(first.abs() <= a);
    }

    #[test]
    fn test_moving_average_of_constant_is_constant(
        window in 1usize..20,
        value in -100.0f64..100.0,
        n in 1usize..50,
    ) {
        let mut filter = MovingAverageFilter::new(window).unwrap();
        for _ in 0..n {
            let y = filter.update(value);
            assert_relative_eq!(y, value, epsilon = 1e-9);
        }
    }
}
