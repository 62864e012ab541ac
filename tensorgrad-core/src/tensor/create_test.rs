use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_and_ones() -> Result<(), TensorGradError> {
    let z = zeros(&[2, 3])?;
    assert_eq!(z.shape(), vec![2, 3]);
    assert!(z.to_vec().iter().all(|&v| v == 0.0));

    let o = ones_like(&z)?;
    assert_eq!(o.shape(), vec![2, 3]);
    assert!(o.to_vec().iter().all(|&v| v == 1.0));
    assert!(!o.requires_grad());
    Ok(())
}

#[test]
fn test_full() -> Result<(), TensorGradError> {
    let t = full(&[3], -2.5)?;
    assert_eq!(t.to_vec(), vec![-2.5, -2.5, -2.5]);
    Ok(())
}

#[test]
fn test_randn_is_seeded() -> Result<(), TensorGradError> {
    let a = randn(&[4, 4], 0.02, &mut StdRng::seed_from_u64(7))?;
    let b = randn(&[4, 4], 0.02, &mut StdRng::seed_from_u64(7))?;
    assert_eq!(a, b);
    assert!(a.to_vec().iter().any(|&v| v != 0.0));
    Ok(())
}

#[test]
fn test_randn_rejects_negative_std() {
    let result = randn(&[2], -1.0, &mut StdRng::seed_from_u64(0));
    assert!(matches!(result, Err(TensorGradError::ConfigurationError(_))));
}

#[test]
fn test_rand_uniform_bounds() -> Result<(), TensorGradError> {
    let t = rand_uniform(&[100], -0.5, 0.5, &mut StdRng::seed_from_u64(3))?;
    assert!(t.to_vec().iter().all(|&v| (-0.5..0.5).contains(&v)));
    assert!(rand_uniform(&[1], 1.0, 1.0, &mut StdRng::seed_from_u64(3)).is_err());
    Ok(())
}
