/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

use approx::assert_relative_eq;
use ndarray::{arr1, aview0, Array1, Array2};
use pulsar_utils::stats::{
    chi2_cdf_array, ncx2_cdf, ncx2_cdf_scalar, Ncx2Cdf, Ncx2Config, StatsError,
};

const XS: [f64; 6] = [0.1, 1.0, 5.0, 20.0, 60.0, 150.0];
const KS: [f64; 5] = [0.5, 1.0, 4.0, 10.0, 50.0];
const LAMBDAS: [f64; 5] = [0.0, 0.1, 5.0, 40.0, 200.0];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_reference_scenarios() {
    init_logging();

    let cases = [
        (5.0, 4.0, 0.0, 0.7127025048163542),
        (5.0, 4.0, 15.0, 0.015699244906430973),
        (10.0, 10.0, 0.0, 0.5595067149347875),
        (40.0, 20.0, 50.0, 0.014989144847017681),
        (200.0, 150.0, 120.0, 0.003418539794364018),
    ];

    let x = Array1::from_iter(cases.iter().map(|c| c.0));
    let k = Array1::from_iter(cases.iter().map(|c| c.1));
    let lambda = Array1::from_iter(cases.iter().map(|c| c.2));
    let values = ncx2_cdf(x.view(), k.view(), lambda.view()).unwrap();

    for (value, case) in values.iter().zip(&cases) {
        assert_relative_eq!(*value, case.3, max_relative = 1e-9);
    }
}

#[test]
fn test_broadcast_scenario() {
    let values = ncx2_cdf(
        arr1(&[5.0, 5.0, 5.0]).view(),
        arr1(&[4.0, 4.0, 4.0]).view(),
        arr1(&[0.0, 15.0, 50.0]).view(),
    )
    .unwrap();

    let expected = [
        ncx2_cdf_scalar(5.0, 4.0, 0.0).unwrap(),
        ncx2_cdf_scalar(5.0, 4.0, 15.0).unwrap(),
        ncx2_cdf_scalar(5.0, 4.0, 50.0).unwrap(),
    ];
    assert_eq!(values.as_slice().unwrap(), &expected);
}

#[test]
fn test_values_lie_in_unit_interval() {
    for &k in &KS {
        for &lambda in &LAMBDAS {
            for &x in &XS {
                let value = ncx2_cdf_scalar(x, k, lambda).unwrap();
                assert!(
                    (-1e-9..=1.0 + 1e-9).contains(&value),
                    "cdf({}, {}, {}) = {}",
                    x,
                    k,
                    lambda,
                    value
                );
            }
        }
    }
}

#[test]
fn test_monotone_in_x() {
    let x = Array1::from(XS.to_vec());
    for &k in &KS {
        for &lambda in &LAMBDAS {
            let values = ncx2_cdf(x.view(), aview0(&k), aview0(&lambda)).unwrap();
            for pair in values.as_slice().unwrap().windows(2) {
                // Truncation of the series is relative to the running sum
                assert!(
                    pair[1] >= pair[0] * (1.0 - 1e-6),
                    "k={}, lambda={}: {:?}",
                    k,
                    lambda,
                    pair
                );
            }
        }
    }
}

#[test]
fn test_series_limit_matches_closed_form() {
    let x = Array1::from(XS.to_vec());
    for &k in &KS {
        let central = chi2_cdf_array(x.view(), aview0(&k)).unwrap();
        let series = ncx2_cdf(x.view(), aview0(&k), aview0(&1e-10)).unwrap();
        for (s, c) in series.iter().zip(central.iter()) {
            assert_relative_eq!(*s, *c, max_relative = 1e-6);
        }
    }
}

#[test]
fn test_zero_at_origin() {
    let k = Array2::from_shape_vec((2, 2), vec![0.5, 1.0, 4.0, 100.0]).unwrap();
    let values = ncx2_cdf(aview0(&0.0), k.view(), aview0(&25.0)).unwrap();
    assert_eq!(values.shape(), &[2, 2]);
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn test_large_degrees_of_freedom() {
    // Exact Poisson-mixture sums at 30 significant digits
    assert_relative_eq!(
        ncx2_cdf_scalar(2100.0, 2000.0, 150.0).unwrap(),
        0.2319361228796044,
        max_relative = 5e-6
    );
    assert_relative_eq!(
        ncx2_cdf_scalar(60.0, 10.0, 40.0).unwrap(),
        0.7817496552136098,
        max_relative = 5e-6
    );
}

#[test]
fn test_pathological_input_is_bounded() {
    init_logging();

    let cdf = Ncx2Cdf::new(Ncx2Config::with_max_iterations(5_000));
    let x = arr1(&[1e-3, 1e-200, 0.5]);
    let lambda = arr1(&[1e7, 1e12, 1e6]);

    match cdf.evaluate(x.view(), aview0(&1e-12), lambda.view()) {
        Ok(values) => assert!(values.iter().all(|v| (-1e-9..=1.0 + 1e-9).contains(v))),
        Err(StatsError::NumericalNonConvergence { indices, iterations }) => {
            assert!(!indices.is_empty());
            assert_eq!(iterations, 5_000);
        }
        Err(other) => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_errors_are_raised_before_computation() {
    let err = ncx2_cdf(
        arr1(&[1.0, 2.0]).view(),
        arr1(&[1.0, 2.0, 3.0]).view(),
        aview0(&1.0),
    )
    .unwrap_err();
    assert!(matches!(err, StatsError::ShapeMismatch { .. }));

    let err = ncx2_cdf(aview0(&1.0), arr1(&[4.0, 0.0]).view(), aview0(&1.0)).unwrap_err();
    assert!(matches!(err, StatsError::InvalidArgument(_)));

    let err = ncx2_cdf(aview0(&1.0), aview0(&4.0), arr1(&[1.0, -1e-3]).view()).unwrap_err();
    assert!(matches!(err, StatsError::InvalidArgument(_)));
}
