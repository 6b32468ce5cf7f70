mod common;

use approx::assert_abs_diff_eq;
use common::synthetic_image::{
    checkerboard_u8, max_abs_diff_f32, ramp_f32, star_field_f32, star_field_f64,
};
use multiscale_transform::convolution::ConvolutionStrategy;
use multiscale_transform::types::Rect;
use multiscale_transform::{Image, MultiscaleLinearTransform, TransformError, TransformParams};
use num_complex::{Complex32, Complex64};

#[test]
fn ramp_64_dyadic_gaussian_reconstructs_exactly() {
    let image = ramp_f32(64, 64);
    let mut transform = MultiscaleLinearTransform::<f32>::new(3, 0, false).unwrap();
    transform.decompose(&image).unwrap();
    assert_eq!(transform.number_of_layers(), 4);

    let mut restored = Image::<f32>::empty();
    transform.reconstruct(&mut restored).unwrap();
    assert_eq!(restored.selection(), Rect::full(64, 64));
    let err = max_abs_diff_f32(&image, &restored);
    assert!(err < 1e-6, "max error {err}");
}

#[test]
fn additive_identity_across_configurations() {
    let image = star_field_f32(48, 40);
    for layers in [0usize, 1, 4, 6] {
        for scaling in [0, 1, 3] {
            for mean in [false, true] {
                let mut t = MultiscaleLinearTransform::<f32>::new(layers, scaling, mean).unwrap();
                t.decompose(&image).unwrap();
                let mut restored = Image::<f32>::empty();
                t.reconstruct(&mut restored).unwrap();
                let err = max_abs_diff_f32(&image, &restored);
                assert!(
                    err < 1e-5,
                    "layers={layers} scaling={scaling} mean={mean} err={err}"
                );
            }
        }
    }
}

#[test]
fn double_precision_roundtrip() {
    let image = star_field_f64(33, 29);
    let mut t = MultiscaleLinearTransform::<f64>::new(5, 0, false).unwrap();
    t.decompose(&image).unwrap();
    let mut restored = Image::<f64>::empty();
    t.reconstruct(&mut restored).unwrap();
    for (a, b) in image.data().iter().zip(restored.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn detail_layers_are_differences_of_smoothings() {
    let image = star_field_f64(32, 32);
    let mut t = MultiscaleLinearTransform::<f64>::new(3, 0, false).unwrap();
    t.decompose(&image).unwrap();
    // smooth structure lives in the residual; details average out near zero
    let residual_mean = t.layer(3).unwrap().sum() / 1024.0;
    let image_mean = image.data().iter().sum::<f64>() / 1024.0;
    assert_abs_diff_eq!(residual_mean, image_mean, epsilon = 0.02);
    for j in 0..3 {
        let mean = t.layer(j).unwrap().sum() / 1024.0;
        assert!(mean.abs() < 0.02, "layer {j} mean {mean}");
    }
}

#[test]
fn integer_images_roundtrip_through_working_precision() {
    let image = checkerboard_u8(40, 24, 5);
    let mut t = MultiscaleLinearTransform::<f32>::new(4, 0, false).unwrap();
    t.decompose(&image).unwrap();
    let mut restored = Image::<u8>::empty();
    t.reconstruct(&mut restored).unwrap();
    assert_eq!(restored, image);

    let wide = Image::<u16>::from_fn(17, 13, |x, y| (x * 3000 + y * 1000) as u16);
    let mut t = MultiscaleLinearTransform::<f64>::new(2, 2, true).unwrap();
    t.decompose(&wide).unwrap();
    let mut restored = Image::<u16>::empty();
    t.reconstruct(&mut restored).unwrap();
    assert_eq!(restored, wide);
}

#[test]
fn complex_images_use_magnitude() {
    let image = Image::<Complex64>::from_fn(20, 20, |x, y| {
        Complex64::new(0.3 + 0.01 * x as f64, 0.02 * y as f64)
    });
    let mut t = MultiscaleLinearTransform::<f64>::new(3, 0, false).unwrap();
    t.decompose(&image).unwrap();
    let mut restored = Image::<Complex64>::empty();
    t.reconstruct(&mut restored).unwrap();
    for (a, b) in image.data().iter().zip(restored.data()) {
        assert_abs_diff_eq!(a.norm(), b.re, epsilon = 1e-12);
        assert_eq!(b.im, 0.0);
    }
}

#[test]
fn convolution_strategies_produce_the_same_layers() {
    let image = star_field_f64(45, 31);
    let params = TransformParams::new(4).with_scaling_sequence(0);
    let mut sep = MultiscaleLinearTransform::<f64>::from_params(
        params.clone().with_convolution(ConvolutionStrategy::Separable),
    )
    .unwrap();
    let mut full = MultiscaleLinearTransform::<f64>::from_params(
        params
            .with_convolution(ConvolutionStrategy::NonSeparable)
            .with_parallel(false, 1),
    )
    .unwrap();
    sep.decompose(&image).unwrap();
    full.decompose(&image).unwrap();
    for j in 0..5 {
        let diff = sep.layer(j).unwrap().max_abs_diff(full.layer(j).unwrap()).unwrap();
        assert!(diff < 1e-12, "layer {j} differs by {diff}");
    }
}

#[test]
fn parallel_and_sequential_agree() {
    let image = star_field_f32(130, 70);
    let mut seq = MultiscaleLinearTransform::<f32>::from_params(
        TransformParams::new(3).with_parallel(false, 1),
    )
    .unwrap();
    let mut par = MultiscaleLinearTransform::<f32>::from_params(
        TransformParams::new(3).with_parallel(true, 4),
    )
    .unwrap();
    seq.decompose(&image).unwrap();
    par.decompose(&image).unwrap();
    // thread count moves the separable crossover, so allow rounding noise
    for j in 0..4 {
        let diff = seq.layer(j).unwrap().max_abs_diff(par.layer(j).unwrap()).unwrap();
        assert!(diff < 1e-6, "layer {j} differs by {diff}");
    }
}

#[test]
fn selection_limits_decomposition_and_reconstruction() {
    let mut image = star_field_f32(40, 30);
    image.select(Rect::new(5, 4, 25, 20));
    let mut t = MultiscaleLinearTransform::<f32>::new(3, 0, false).unwrap();
    t.decompose(&image).unwrap();
    assert_eq!(t.layer(0).unwrap().dimensions(), (20, 16));

    // zero the selected region, then add the layers back onto it
    let mut target = image.clone();
    target.zero_selection();
    assert_eq!(target.get(10, 10), 0.0);
    t.reconstruct(&mut target).unwrap();
    assert!(max_abs_diff_f32(&image, &target) < 1e-5);
}

#[test]
fn reconstruction_adds_onto_existing_pixels() {
    let image = ramp_f32(16, 16);
    let mut t = MultiscaleLinearTransform::<f32>::new(2, 0, false).unwrap();
    t.decompose(&image).unwrap();

    let mut target = Image::<f32>::from_fn(16, 16, |_, _| 1.0);
    t.reconstruct(&mut target).unwrap();
    for (a, b) in image.data().iter().zip(target.data()) {
        assert_abs_diff_eq!(a + 1.0, *b, epsilon = 1e-5);
    }
}

#[test]
fn reconstruction_geometry_mismatch_leaves_target_untouched() {
    let image = ramp_f32(16, 16);
    let mut t = MultiscaleLinearTransform::<f32>::new(2, 0, false).unwrap();
    t.decompose(&image).unwrap();

    let mut target = Image::<f32>::from_fn(10, 10, |_, _| 0.5);
    let before = target.clone();
    let err = t.reconstruct(&mut target).unwrap_err();
    assert!(matches!(err, TransformError::GeometryMismatch { .. }));
    assert_eq!(target, before);
}

#[test]
fn clone_deep_copies_layers() {
    let image = ramp_f32(12, 12);
    let mut t = MultiscaleLinearTransform::<f32>::new(2, 0, false).unwrap();
    t.decompose(&image).unwrap();
    let mut copy = t.clone();
    copy.layer_mut(0).unwrap().fill(9.0);
    assert_ne!(t.layer(0).unwrap().get(3, 3), 9.0);
    assert_eq!(copy.layer(1).unwrap(), t.layer(1).unwrap());
}

#[test]
fn double_samples_require_double_layers() {
    let image = star_field_f64(32, 32);
    let mut single = MultiscaleLinearTransform::<f32>::new(3, 0, false).unwrap();
    let err = single.decompose(&image).unwrap_err();
    assert!(matches!(
        err,
        TransformError::PrecisionLoss {
            sample: "f64",
            required: "f64",
            layers: "f32"
        }
    ));
    assert!(single.layer_set().is_empty());

    let complex = Image::<Complex64>::from_fn(8, 8, |x, y| Complex64::new(x as f64, y as f64));
    assert!(matches!(
        single.decompose(&complex),
        Err(TransformError::PrecisionLoss { .. })
    ));

    let mut double = MultiscaleLinearTransform::<f64>::new(3, 0, false).unwrap();
    double.decompose(&image).unwrap();
    let mut restored = Image::<f64>::empty();
    double.reconstruct(&mut restored).unwrap();
    for (a, b) in image.data().iter().zip(restored.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }

    // single precision samples may widen into double layers
    let narrow = star_field_f32(20, 20);
    double.decompose(&narrow).unwrap();
    let mut restored = Image::<f32>::empty();
    double.reconstruct(&mut restored).unwrap();
    assert!(max_abs_diff_f32(&narrow, &restored) < 1e-6);
}

#[test]
fn integer_reconstruction_adds_onto_selected_pixels() {
    let source = Image::<u16>::from_fn(24, 20, |x, y| (x * 700 + y * 500) as u16);
    let sel = Rect::new(4, 3, 18, 15);
    let mut input = source.clone();
    input.select(sel);
    let mut t = MultiscaleLinearTransform::<f32>::new(3, 0, false).unwrap();
    t.decompose(&input).unwrap();

    let mut target = Image::<u16>::from_fn(24, 20, |_, _| 20_000);
    target.select(sel);
    t.reconstruct(&mut target).unwrap();
    for y in 0..20 {
        for x in 0..24 {
            let inside = x >= sel.x0 && x < sel.x1 && y >= sel.y0 && y < sel.y1;
            let expected = if inside {
                20_000 + source.get(x, y) as i64
            } else {
                20_000
            };
            let got = target.get(x, y) as i64;
            assert!((got - expected).abs() <= 1, "({x}, {y}): {got} vs {expected}");
        }
    }
}

#[test]
fn u32_and_complex32_roundtrip_in_single_precision() {
    let wide = Image::<u32>::from_fn(19, 23, |x, y| (x as u32 * 150_000_000) ^ (y as u32 * 7_919));
    let mut t = MultiscaleLinearTransform::<f32>::new(3, 1, false).unwrap();
    t.decompose(&wide).unwrap();
    let mut restored = Image::<u32>::empty();
    t.reconstruct(&mut restored).unwrap();
    // 24-bit significand over a 32-bit range
    let tolerance = u32::MAX as f64 * 4e-6;
    for (a, b) in wide.data().iter().zip(restored.data()) {
        assert!((*a as f64 - *b as f64).abs() <= tolerance, "{a} vs {b}");
    }

    let complex = Image::<Complex32>::from_fn(16, 12, |x, y| {
        Complex32::new(0.1 + 0.03 * x as f32, 0.05 * y as f32)
    });
    t.decompose(&complex).unwrap();
    let mut restored = Image::<Complex32>::empty();
    t.reconstruct(&mut restored).unwrap();
    for (a, b) in complex.data().iter().zip(restored.data()) {
        assert_abs_diff_eq!(a.norm(), b.re, epsilon = 1e-5);
        assert_eq!(b.im, 0.0);
    }
}

