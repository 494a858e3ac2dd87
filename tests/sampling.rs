use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use raypath::sampler::RandomDirection;
use raypath::vec3::{Float, Vec3};

fn moment(axis: Vec3, n: Float, k: i32, samples: u32, rng: &mut ChaCha8Rng) -> Float {
    let sampler = RandomDirection::new(axis, n);
    let mut sum = 0.0;
    for _ in 0..samples {
        sum += sampler.generate(rng).dot(axis).powi(k);
    }
    sum / samples as Float
}

// E[(sample . axis)^k] = (n + 1) / (n + 1 + k) for a cos^n distribution
#[test]
fn moments_match_the_cosine_power_distribution() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let axis = Vec3::unit_z();
    for n in [1.0, 10.0] {
        for k in [1, 2] {
            let expected = (n + 1.0) / (n + 1.0 + k as Float);
            let got = moment(axis, n, k, 50_000, &mut rng);
            assert!(
                (got - expected).abs() < 0.01,
                "n={n} k={k} got={got} expected={expected}"
            );
        }
    }
}

#[test]
fn samples_are_unit_length_and_stay_in_the_half_space() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let axes = [
        Vec3::unit_x(), // exercises the orthogonal-vector fallback
        Vec3::unit_y(),
        Vec3::unit_z(),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-0.3, 0.9, -0.2),
    ];
    for axis in axes {
        let sampler = RandomDirection::new(axis, 1.0);
        let unit_axis = axis.normalize();
        for _ in 0..1000 {
            let d = sampler.generate(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-3);
            assert!(d.dot(unit_axis) >= -1e-3);
        }
    }
}

#[test]
fn large_exponents_concentrate_around_the_axis() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let axis = Vec3::unit_z();
    let sampler = RandomDirection::new(axis, 1000.0);
    let mut sum = 0.0;
    for _ in 0..1000 {
        sum += sampler.generate(&mut rng).dot(axis);
    }
    assert!(sum / 1000.0 > 0.99);
}

#[test]
fn consecutive_draws_differ() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let sampler = RandomDirection::new(Vec3::unit_z(), 1.0);
    let a = sampler.generate(&mut rng);
    let b = sampler.generate(&mut rng);
    assert!((a - b).norm() > 1e-6);
}
