use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::nn::init::{normal_, ones_, uniform_, zeros_};
use crate::nn::Parameter;
use crate::ops::arithmetic::add_scalar_op;
use crate::tensor::zeros;

#[test]
fn test_zeros_and_ones() -> Result<(), TensorGradError> {
    let p = Parameter::new(zeros(&[2, 2])?);
    ones_(&p)?;
    assert_eq!(p.to_vec(), vec![1.0; 4]);
    zeros_(&p)?;
    assert_eq!(p.to_vec(), vec![0.0; 4]);
    Ok(())
}

#[test]
fn test_normal_is_seeded_and_scaled() -> Result<(), TensorGradError> {
    let p = Parameter::new(zeros(&[64, 64])?);
    let q = Parameter::new(zeros(&[64, 64])?);
    normal_(&p, 0.02, &mut StdRng::seed_from_u64(3))?;
    normal_(&q, 0.02, &mut StdRng::seed_from_u64(3))?;
    assert_eq!(p.to_vec(), q.to_vec());

    let data = p.to_vec();
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let var = data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / data.len() as f64;
    assert!(mean.abs() < 0.005);
    assert!((var.sqrt() - 0.02).abs() < 0.002);
    Ok(())
}

#[test]
fn test_uniform_bounds() -> Result<(), TensorGradError> {
    let p = Parameter::new(zeros(&[10, 10])?);
    let mut rng = StdRng::seed_from_u64(11);
    uniform_(&p, -0.5, 0.5, &mut rng)?;
    assert!(p.to_vec().iter().all(|v| (-0.5..0.5).contains(v)));
    assert!(matches!(
        uniform_(&p, 1.0, 1.0, &mut rng),
        Err(TensorGradError::ConfigurationError(_))
    ));
    Ok(())
}

#[test]
fn test_init_rejects_operator_output() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let p = Parameter::new(zeros(&[1, 2])?);
    let y = add_scalar_op(&graph, &p, 1.0)?;
    assert!(matches!(ones_(&y), Err(TensorGradError::ConfigurationError(_))));
    Ok(())
}
