pub mod topk;

pub use topk::{
    format_rules, top_k_non_redundant_rules, top_k_rules, write_rules, AssociationRule,
    MinerConfig, MiningError, MiningResult, MiningStats, Redundancy, TopKMiner, TransactionStore,
};

#[cfg(feature = "python")]
mod python {
    use numpy::PyReadonlyArray2;
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::topk::{MinerConfig, MiningError, TopKMiner, TransactionStore};

    type RuleTuple = (Vec<u32>, Vec<u32>, u32, f64);

    fn to_py_err(err: MiningError) -> PyErr {
        match err {
            MiningError::Parse { .. } | MiningError::InvalidParameter { .. } => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }

    #[pyfunction]
    #[pyo3(signature = (
        transactions,
        k,
        min_confidence,
        delta=None,
        max_antecedent_size=None,
        max_consequent_size=None
    ))]
    fn top_k_rules(
        transactions: PyReadonlyArray2<'_, i32>,
        k: usize,
        min_confidence: f64,
        delta: Option<usize>,
        max_antecedent_size: Option<usize>,
        max_consequent_size: Option<usize>,
    ) -> PyResult<Vec<RuleTuple>> {
        let store = TransactionStore::from_matrix(transactions.as_array()).map_err(to_py_err)?;

        let mut config = MinerConfig::new(k, min_confidence);
        if let Some(delta) = delta {
            config = config.with_delta(delta);
        }
        if let Some(size) = max_antecedent_size {
            config = config.with_max_antecedent_size(size);
        }
        if let Some(size) = max_consequent_size {
            config = config.with_max_consequent_size(size);
        }

        let result = TopKMiner::new(config).mine(&store).map_err(to_py_err)?;

        Ok(result
            .rules
            .into_iter()
            .map(|rule| (rule.antecedent, rule.consequent, rule.support, rule.confidence))
            .collect())
    }

    #[pymodule]
    fn toprules(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(top_k_rules, m)?)?;
        Ok(())
    }
}
