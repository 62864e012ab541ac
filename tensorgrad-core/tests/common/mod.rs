use rand::rngs::StdRng;
use rand::SeedableRng;
use tensorgrad_core::{randn, Tensor};

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Helper function to create a basic tensor for testing
#[allow(dead_code)]
pub fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor.set_requires_grad(true);
    tensor
}

/// Seeded `N(0, 1)` tensor that requires grad.
#[allow(dead_code)]
pub fn random_leaf(shape: &[usize], seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    let tensor = randn(shape, 1.0, &mut rng).expect("randn failed");
    tensor.set_requires_grad(true);
    tensor
}
