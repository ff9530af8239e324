//! Random draws of photos and videos.
//!
//! Both draws use `SliceRandom::shuffle` (Fisher–Yates), so every ordering is
//! equally likely and every candidate has the same chance of being picked.
//! Sequence ids are 1-based, zero-padded to three digits, in draw order.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::media::MediaFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBudget {
    pub limit_bytes: u64,
    pub min_item_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selected {
    pub file: MediaFile,
    /// "001", "002", ... ("1000" past 999)
    pub sequence_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub items: Vec<Selected>,
    pub total_bytes: u64,
}

impl SelectionResult {
    fn push(&mut self, file: MediaFile) {
        let sequence_id = sequence_id(self.items.len() + 1);
        self.total_bytes += file.size;
        self.items.push(Selected { file, sequence_id });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn sequence_id(n: usize) -> String {
    format!("{:03}", n)
}

/// Uniform sample of `min(n, photos.len())` photos in random order.
pub fn select_photos<R: Rng + ?Sized>(photos: &[MediaFile], n: usize, rng: &mut R) -> SelectionResult {
    let mut pool = photos.to_vec();
    pool.shuffle(rng);
    pool.truncate(n);

    let mut result = SelectionResult::default();
    for file in pool {
        result.push(file);
    }
    result
}

/// Random first-fit packing of videos under `budget.limit_bytes`.
///
/// Videos smaller than `min_item_bytes` never qualify. After shuffling, each
/// candidate is taken if it still fits; one that doesn't is skipped and the
/// scan goes on, so a smaller file further down can still use the space.
/// The scan stops as soon as the budget is full.
pub fn select_videos<R: Rng + ?Sized>(
    videos: &[MediaFile],
    budget: SelectionBudget,
    rng: &mut R,
) -> SelectionResult {
    let mut pool: Vec<MediaFile> = videos
        .iter()
        .filter(|v| v.size >= budget.min_item_bytes)
        .cloned()
        .collect();
    pool.shuffle(rng);

    let mut result = SelectionResult::default();
    for file in pool {
        if result.total_bytes >= budget.limit_bytes {
            break;
        }
        let Some(after) = result.total_bytes.checked_add(file.size) else {
            continue;
        };
        if after <= budget.limit_bytes {
            result.push(file);
        }
    }
    result
}
