use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use toprules::TransactionStore;

/// Binary transaction matrix where each cell is set with probability
/// `density`, loaded through the matrix input path.
pub fn random_store(
    num_transactions: usize,
    num_items: usize,
    density: f64,
    seed: u64,
) -> TransactionStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let matrix = Array2::from_shape_fn((num_transactions, num_items), |_| {
        i32::from(rng.gen_bool(density))
    });
    TransactionStore::from_matrix(matrix.view()).unwrap()
}
