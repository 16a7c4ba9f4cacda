use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use ndarray::ArrayView2;
use roaring::RoaringBitmap;
use tracing::debug;

use super::error::{MiningError, Result};

/// Per item: the transactions containing it and their count.
///
/// Items are addressed by slot, their rank among the distinct item ids of
/// the database. Slots keep the order of the ids, so a descending
/// transaction stays descending once mapped.
#[derive(Debug, Clone, Default)]
pub struct VerticalIndex {
    items: Vec<u32>,
    tidsets: Vec<Arc<RoaringBitmap>>,
    supports: Vec<u32>,
}

impl VerticalIndex {
    fn build(transactions: &[Vec<u32>]) -> Self {
        let mut items: Vec<u32> = transactions.iter().flatten().copied().collect();
        items.sort_unstable();
        items.dedup();

        let mut index = Self {
            tidsets: Vec::new(),
            supports: vec![0u32; items.len()],
            items,
        };
        let mut tidsets = vec![RoaringBitmap::new(); index.items.len()];

        for (tid, transaction) in transactions.iter().enumerate() {
            for slot in index.to_slots(transaction) {
                tidsets[slot as usize].insert(tid as u32);
                index.supports[slot as usize] += 1;
            }
        }

        index.tidsets = tidsets.into_iter().map(Arc::new).collect();
        index
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item id stored in `slot`.
    pub fn item(&self, slot: u32) -> u32 {
        self.items[slot as usize]
    }

    pub fn slot(&self, item: u32) -> Option<u32> {
        self.items.binary_search(&item).ok().map(|slot| slot as u32)
    }

    /// Maps item ids to slots, dropping ids the database never holds.
    pub fn to_slots(&self, items: &[u32]) -> Vec<u32> {
        items.iter().filter_map(|&item| self.slot(item)).collect()
    }

    pub fn support(&self, slot: u32) -> u32 {
        self.supports.get(slot as usize).copied().unwrap_or(0)
    }

    pub fn tidset(&self, slot: u32) -> &RoaringBitmap {
        &self.tidsets[slot as usize]
    }

    /// Shared handle on the tidset, used as the antecedent tidset of 1-1 rules.
    pub fn shared_tidset(&self, slot: u32) -> Arc<RoaringBitmap> {
        Arc::clone(&self.tidsets[slot as usize])
    }
}

/// Transactions with items sorted strictly descending, plus their vertical index.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Vec<u32>>,
    max_item: u32,
    index: VerticalIndex,
}

impl TransactionStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let store = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.as_ref().display(),
            transactions = store.transaction_count(),
            max_item = store.max_item,
            "loaded transaction file"
        );
        Ok(store)
    }

    /// Parses one transaction per line. Blank lines and lines starting with
    /// `#`, `%` or `@` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut transactions = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(['#', '%', '@']) {
                continue;
            }

            let items = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<u32>().map_err(|_| MiningError::Parse {
                        line: line_idx + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            transactions.push(items);
        }

        Ok(Self::from_transactions(transactions))
    }

    pub fn from_transactions(transactions: Vec<Vec<u32>>) -> Self {
        let transactions: Vec<Vec<u32>> = transactions
            .into_iter()
            .map(|mut items| {
                items.sort_unstable_by(|a, b| b.cmp(a));
                items.dedup();
                items
            })
            .collect();

        let max_item = transactions
            .iter()
            .filter_map(|items| items.first().copied())
            .max()
            .unwrap_or(0);

        let index = VerticalIndex::build(&transactions);
        Self {
            transactions,
            max_item,
            index,
        }
    }

    /// Binary matrix input: row `i` holds item `j` when cell `[i, j]` is 1.
    pub fn from_matrix(matrix: ArrayView2<i32>) -> Result<Self> {
        let transactions = matrix
            .rows()
            .into_iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut items = Vec::new();
                for (item, &cell) in row.iter().enumerate() {
                    match cell {
                        0 => {}
                        1 => items.push(item as u32),
                        other => {
                            return Err(MiningError::invalid(format!(
                                "transaction matrix must be binary, found {} at [{}, {}]",
                                other, row_idx, item
                            )))
                        }
                    }
                }
                Ok(items)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_transactions(transactions))
    }

    pub fn transactions(&self) -> &[Vec<u32>] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn max_item(&self) -> u32 {
        self.max_item
    }

    pub fn vertical_index(&self) -> &VerticalIndex {
        &self.index
    }
}
