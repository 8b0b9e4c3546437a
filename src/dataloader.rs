// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Batching of image/heatmap pairs into channel-first tensors.
//!
//! [`to_dataloader`] permutes the stored (N, H, W, C) arrays to (N, C, H, W),
//! wraps them in a [`TensorDataset`] and returns a [`DataLoader`] whose
//! [`iter`](DataLoader::iter) yields [`Batch`]es.
//!
//! # Example
//!
//! ```no_run
//! use flic_heatmaps::{load_train_data, to_dataloader};
//!
//! fn main() -> flic_heatmaps::Result<()> {
//!     let (x_train, y_train) = load_train_data("./data/")?;
//!     let loader = to_dataloader(x_train, y_train, 10, true)?;
//!
//!     for batch in loader.iter() {
//!         // (10, 3, H, W) images and (10, J, H, W) heatmaps
//!         println!("{:?} {:?}", batch.images.shape(), batch.heatmaps.shape());
//!     }
//!     Ok(())
//! }
//! ```

use std::cell::Cell;
use std::sync::Arc;

use ndarray::{Array3, Array4, Axis};
use rand::SeedableRng;
use rand::seq::SliceRandom;

use crate::error::{FlicError, Result};
use crate::preprocessing::nhwc_to_nchw;

/// Default number of samples per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Build a [`DataLoader`] from (N, H, W, 3) images and (N, H, W, J) heatmaps.
///
/// Both arrays are permuted to channel-first layout before batching.
///
/// # Errors
///
/// Returns [`FlicError::ShapeMismatch`] if the sample counts differ and
/// [`FlicError::ConfigError`] if `batch_size` is zero.
pub fn to_dataloader(
    images: Array4<f32>,
    heatmaps: Array4<f32>,
    batch_size: usize,
    shuffle: bool,
) -> Result<DataLoader> {
    let dataset = TensorDataset::new(nhwc_to_nchw(images), nhwc_to_nchw(heatmaps))?;
    DataLoader::builder()
        .batch_size(batch_size)
        .shuffle(shuffle)
        .build(dataset)
}

/// In-memory pairs of channel-first image and heatmap tensors.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    images: Arc<Array4<f32>>,
    heatmaps: Arc<Array4<f32>>,
}

impl TensorDataset {
    /// Wrap (N, 3, H, W) images and (N, J, H, W) heatmaps.
    ///
    /// # Errors
    ///
    /// Returns [`FlicError::ShapeMismatch`] if the sample counts differ.
    pub fn new(images: Array4<f32>, heatmaps: Array4<f32>) -> Result<Self> {
        let (n_images, n_heatmaps) = (images.len_of(Axis(0)), heatmaps.len_of(Axis(0)));
        if n_images != n_heatmaps {
            return Err(FlicError::ShapeMismatch(format!(
                "{n_images} images but {n_heatmaps} heatmaps"
            )));
        }

        Ok(Self {
            images: Arc::new(images),
            heatmaps: Arc::new(heatmaps),
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    /// Whether the dataset holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` as (3, H, W) image and (J, H, W) heatmap.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(Array3<f32>, Array3<f32>)> {
        if index >= self.len() {
            return None;
        }

        Some((
            self.images.index_axis(Axis(0), index).to_owned(),
            self.heatmaps.index_axis(Axis(0), index).to_owned(),
        ))
    }

    /// All images, (N, 3, H, W).
    #[must_use]
    pub fn images(&self) -> &Array4<f32> {
        &self.images
    }

    /// All heatmaps, (N, J, H, W).
    #[must_use]
    pub fn heatmaps(&self) -> &Array4<f32> {
        &self.heatmaps
    }

    /// Gather the samples at `indices` into one batch.
    fn gather(&self, indices: Vec<usize>) -> Batch {
        Batch {
            images: self.images.select(Axis(0), &indices),
            heatmaps: self.heatmaps.select(Axis(0), &indices),
            indices,
        }
    }
}

/// One batch of channel-first tensors.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Images, (B, 3, H, W).
    pub images: Array4<f32>,
    /// Heatmaps, (B, J, H, W).
    pub heatmaps: Array4<f32>,
    /// Dataset indices of the samples, in batch order.
    pub indices: Vec<usize>,
}

impl Batch {
    /// Number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Restartable batch iterable over a [`TensorDataset`].
///
/// Every call to [`iter`](Self::iter) starts a new pass; with shuffling
/// enabled each pass draws a fresh permutation.
#[derive(Debug)]
pub struct DataLoader {
    dataset: TensorDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    epoch: Cell<u64>,
}

impl DataLoader {
    /// Builder with the default batch size and shuffling enabled.
    #[must_use]
    pub fn builder() -> DataLoaderBuilder {
        DataLoaderBuilder::default()
    }

    /// The wrapped dataset, for random access to individual samples.
    #[must_use]
    pub const fn dataset(&self) -> &TensorDataset {
        &self.dataset
    }

    /// Number of batches per pass.
    #[must_use]
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// Number of batches per pass, same as [`num_batches`](Self::num_batches).
    #[must_use]
    pub fn len(&self) -> usize {
        self.num_batches()
    }

    /// Whether a pass yields no batches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_batches() == 0
    }

    /// Number of samples in the dataset.
    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.dataset.len()
    }

    /// Samples per batch.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether passes are shuffled.
    #[must_use]
    pub const fn shuffles(&self) -> bool {
        self.shuffle
    }

    /// Start a new pass over the dataset.
    pub fn iter(&self) -> DataLoaderIter<'_> {
        DataLoaderIter {
            loader: self,
            order: self.sample_order(),
            cursor: 0,
        }
    }

    /// Sample order of the next pass.
    fn sample_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if !self.shuffle {
            return order;
        }

        let epoch = self.epoch.get();
        self.epoch.set(epoch.wrapping_add(1));

        if let Some(seed) = self.seed {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed.wrapping_add(epoch));
            order.shuffle(&mut rng);
        } else {
            let mut rng = rand::thread_rng();
            order.shuffle(&mut rng);
        }
        order
    }
}

impl<'a> IntoIterator for &'a DataLoader {
    type Item = Batch;
    type IntoIter = DataLoaderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass of batches.
pub struct DataLoaderIter<'a> {
    loader: &'a DataLoader,
    order: Vec<usize>,
    cursor: usize,
}

impl Iterator for DataLoaderIter<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len() - self.cursor;
        let take = remaining.min(self.loader.batch_size);
        if take == 0 || (self.loader.drop_last && take < self.loader.batch_size) {
            return None;
        }

        let indices = self.order[self.cursor..self.cursor + take].to_vec();
        self.cursor += take;

        Some(self.loader.dataset.gather(indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len() - self.cursor;
        let batch_size = self.loader.batch_size;
        let n = if self.loader.drop_last {
            remaining / batch_size
        } else {
            remaining.div_ceil(batch_size)
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for DataLoaderIter<'_> {}

/// Builder for [`DataLoader`].
#[derive(Debug, Clone)]
pub struct DataLoaderBuilder {
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl Default for DataLoaderBuilder {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            shuffle: true,
            drop_last: false,
            seed: None,
        }
    }
}

impl DataLoaderBuilder {
    /// Set the batch size.
    #[must_use]
    pub const fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Enable or disable shuffling.
    #[must_use]
    pub const fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Drop a trailing partial batch.
    #[must_use]
    pub const fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Seed the shuffle for reproducible passes.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the loader.
    ///
    /// # Errors
    ///
    /// Returns [`FlicError::ConfigError`] if the batch size is zero.
    pub fn build(self, dataset: TensorDataset) -> Result<DataLoader> {
        if self.batch_size == 0 {
            return Err(FlicError::ConfigError(
                "batch size must be at least 1".to_string(),
            ));
        }

        Ok(DataLoader {
            dataset,
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            drop_last: self.drop_last,
            seed: self.seed,
            epoch: Cell::new(0),
        })
    }
}
