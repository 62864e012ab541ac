use crate::error::TensorGradError;
use crate::tensor::Tensor;
use crate::utils::testing::create_test_tensor_with_grad;

#[test]
fn test_requires_grad_flag() {
    let t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    assert!(!t.requires_grad());
    t.set_requires_grad(true);
    assert!(t.requires_grad());
    assert!(t.is_leaf());
    assert!(t.creator().is_none());
}

#[test]
fn test_grad_starts_absent() {
    let t = create_test_tensor_with_grad(vec![1.0, 2.0], vec![1, 2]);
    assert!(t.grad().is_none());
}

#[test]
fn test_acc_grad_sums_contributions() -> Result<(), TensorGradError> {
    let t = create_test_tensor_with_grad(vec![0.0, 0.0], vec![1, 2]);
    t.acc_grad(&Tensor::new(vec![1.0, 2.0], vec![1, 2])?)?;
    t.acc_grad(&Tensor::new(vec![10.0, 20.0], vec![1, 2])?)?;
    assert_eq!(t.grad().unwrap().to_vec(), vec![11.0, 22.0]);
    Ok(())
}

#[test]
fn test_acc_grad_copies_first_contribution() -> Result<(), TensorGradError> {
    let t = create_test_tensor_with_grad(vec![0.0], vec![1, 1]);
    let g = Tensor::new(vec![3.0], vec![1, 1])?;
    t.acc_grad(&g)?;
    t.acc_grad(&g)?;
    // The caller's tensor is not mutated by later accumulation.
    assert_eq!(g.to_vec(), vec![3.0]);
    assert_eq!(t.grad().unwrap().to_vec(), vec![6.0]);
    Ok(())
}

#[test]
fn test_acc_grad_shape_mismatch() {
    let t = create_test_tensor_with_grad(vec![0.0, 0.0], vec![1, 2]);
    let g = Tensor::new(vec![1.0, 2.0], vec![2, 1]).unwrap();
    assert_eq!(
        t.acc_grad(&g),
        Err(TensorGradError::GradientAccumulationShapeMismatch {
            expected: vec![1, 2],
            actual: vec![2, 1],
        })
    );
}

#[test]
fn test_take_grad_clears_slot() -> Result<(), TensorGradError> {
    let t = create_test_tensor_with_grad(vec![0.0], vec![1, 1]);
    t.acc_grad(&Tensor::scalar(2.0))?;
    let taken = t.take_grad().expect("gradient should be present");
    assert_eq!(taken.to_vec(), vec![2.0]);
    assert!(t.grad().is_none());
    Ok(())
}

#[test]
fn test_clear_grad() -> Result<(), TensorGradError> {
    let t = create_test_tensor_with_grad(vec![0.0], vec![1, 1]);
    t.acc_grad(&Tensor::scalar(1.0))?;
    t.clear_grad();
    assert!(t.grad().is_none());
    Ok(())
}
