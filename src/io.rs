// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Dataset storage: reading the FLIC `.npz` arrays and saving rendered figures.

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use ndarray::{Array4, ArrayD, Ix4};
use ndarray_npy::{NpzReader, NpzWriter};

use crate::error::{FlicError, Result};
use crate::joints::JOINTS;
use crate::{progress, verbose, warn};

/// Name of the array entry inside each `.npz` file (`numpy.savez` default).
pub const ARRAY_NAME: &str = "arr_0";

/// Train and test arrays: `(x_train, y_train, x_test, y_test)`.
pub type FlicData = (Array4<f32>, Array4<f32>, Array4<f32>, Array4<f32>);

/// A dataset split stored as a pair of `.npz` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training split.
    Train,
    /// Test split.
    Test,
}

impl Split {
    /// File holding the (N, H, W, 3) images.
    #[must_use]
    pub const fn images_file(self) -> &'static str {
        match self {
            Self::Train => "x_train_flic.npz",
            Self::Test => "x_test_flic.npz",
        }
    }

    /// File holding the (N, H, W, J) heatmaps.
    #[must_use]
    pub const fn heatmaps_file(self) -> &'static str {
        match self {
            Self::Train => "y_train_flic.npz",
            Self::Test => "y_test_flic.npz",
        }
    }

    /// Lowercase split name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load the training images and heatmaps from `path`.
///
/// # Errors
///
/// Returns [`FlicError::FileNotFound`] if a file is missing and
/// [`FlicError::FormatError`] if it is not a readable 4-D array archive.
pub fn load_train_data<P: AsRef<Path>>(path: P) -> Result<(Array4<f32>, Array4<f32>)> {
    load_split(path.as_ref(), Split::Train)
}

/// Load the test images and heatmaps from `path`.
///
/// # Errors
///
/// Same as [`load_train_data`].
pub fn load_test_data<P: AsRef<Path>>(path: P) -> Result<(Array4<f32>, Array4<f32>)> {
    load_split(path.as_ref(), Split::Test)
}

/// Load all four arrays from `path`.
///
/// # Errors
///
/// Same as [`load_train_data`].
pub fn load_data<P: AsRef<Path>>(path: P) -> Result<FlicData> {
    let path = path.as_ref();
    let (x_train, y_train) = load_train_data(path)?;
    let (x_test, y_test) = load_test_data(path)?;

    Ok((x_train, y_train, x_test, y_test))
}

/// Load one split. Matching sample counts are assumed, not checked.
///
/// # Errors
///
/// Same as [`load_train_data`].
pub fn load_split(path: &Path, split: Split) -> Result<(Array4<f32>, Array4<f32>)> {
    progress!("Loading {split} data from : {}... ", path.display());

    let images = read_npz_array(&path.join(split.images_file()))?;
    let heatmaps = read_npz_array(&path.join(split.heatmaps_file()))?;

    verbose!("Done.");

    let joints = heatmaps.shape()[3];
    if joints != JOINTS.len() {
        warn!(
            "{split} heatmaps have {joints} channels but {} joints are configured",
            JOINTS.len()
        );
    }

    Ok((images, heatmaps))
}

/// Read the single 4-D array stored in an `.npz` file as `f32`.
///
/// The entry named [`ARRAY_NAME`] is used, or the only entry when the
/// archive holds exactly one. `float32`, `float64` and `uint8` data are
/// accepted.
///
/// # Errors
///
/// Returns [`FlicError::FileNotFound`] if the file does not exist and
/// [`FlicError::FormatError`] for anything unreadable.
pub fn read_npz_array(file: &Path) -> Result<Array4<f32>> {
    let handle = File::open(file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FlicError::FileNotFound(file.display().to_string()),
        _ => FlicError::IoError(format!("Failed to open {}: {e}", file.display())),
    })?;

    let mut npz = NpzReader::new(handle)
        .map_err(|e| FlicError::FormatError(format!("{}: {e}", file.display())))?;
    let names = npz
        .names()
        .map_err(|e| FlicError::FormatError(format!("{}: {e}", file.display())))?;

    let index = names
        .iter()
        .position(|n| n.trim_end_matches(".npy") == ARRAY_NAME)
        .or(if names.len() == 1 { Some(0) } else { None })
        .ok_or_else(|| {
            FlicError::FormatError(format!(
                "{}: no '{ARRAY_NAME}' entry among {names:?}",
                file.display()
            ))
        })?;

    let array = read_entry_as_f32(&mut npz, index)
        .map_err(|e| FlicError::FormatError(format!("{}: {e}", file.display())))?;

    let ndim = array.ndim();
    array.into_dimensionality::<Ix4>().map_err(|_| {
        FlicError::FormatError(format!(
            "{}: expected a 4-D array, found {ndim} dimensions",
            file.display()
        ))
    })
}

/// Read entry `index`, converting wider or integer element types to `f32`.
#[allow(clippy::cast_possible_truncation)]
fn read_entry_as_f32(
    npz: &mut NpzReader<File>,
    index: usize,
) -> std::result::Result<ArrayD<f32>, ndarray_npy::ReadNpzError> {
    let first_err = match npz.by_index::<_, ndarray::IxDyn>(index) {
        Ok(array) => return Ok(array),
        Err(e) => e,
    };
    if let Ok(array) = npz.by_index::<ndarray::OwnedRepr<f64>, ndarray::IxDyn>(index) {
        return Ok(array.mapv(|v| v as f32));
    }
    if let Ok(array) = npz.by_index::<ndarray::OwnedRepr<u8>, ndarray::IxDyn>(index) {
        return Ok(array.mapv(f32::from));
    }
    Err(first_err)
}

/// Write `array` as the single `arr_0` entry of an uncompressed `.npz` file,
/// the layout `numpy.savez` produces.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_npz_array(file: &Path, array: &Array4<f32>) -> Result<()> {
    if let Some(parent) = file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            FlicError::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }

    let mut npz = NpzWriter::new(BufWriter::new(File::create(file)?));
    npz.add_array(ARRAY_NAME, array)
        .map_err(|e| FlicError::IoError(format!("Failed to write {}: {e}", file.display())))?;
    npz.finish()
        .map_err(|e| FlicError::IoError(format!("Failed to write {}: {e}", file.display())))?;
    Ok(())
}

/// Path a figure named `name` is saved to under `save_dir`.
#[must_use]
pub fn figure_path(save_dir: &Path, name: &str) -> PathBuf {
    save_dir.join("images").join(format!("{name}.png"))
}

/// Save a rendered figure to `{save_dir}/images/{name}.png`, creating the
/// intermediate directories.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the PNG cannot be
/// encoded.
pub fn save_figure(frame: &RgbaImage, save_dir: &Path, name: &str) -> Result<PathBuf> {
    let save_path = figure_path(save_dir, name);

    if let Some(parent) = save_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            FlicError::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }

    frame
        .save_with_format(&save_path, ImageFormat::Png)
        .map_err(|e| FlicError::ImageError(e.to_string()))?;

    Ok(save_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn sample_array(n: usize, c: usize) -> Array4<f32> {
        Array::from_shape_fn((n, 4, 6, c), |(i, h, w, k)| {
            (i * 1000 + h * 100 + w * 10 + k) as f32 * 0.25
        })
    }

    #[test]
    fn test_split_files() {
        assert_eq!(Split::Train.images_file(), "x_train_flic.npz");
        assert_eq!(Split::Test.heatmaps_file(), "y_test_flic.npz");
        assert_eq!(Split::Test.to_string(), "test");
    }

    #[test]
    fn test_npz_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x_train_flic.npz");
        let array = sample_array(3, 3);

        save_npz_array(&file, &array).unwrap();
        let loaded = read_npz_array(&file).unwrap();

        assert_eq!(loaded.shape(), array.shape());
        assert_eq!(loaded, array);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_npz_array(&dir.path().join("nope.npz")).unwrap_err();
        assert!(matches!(err, FlicError::FileNotFound(_)));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x_test_flic.npz");
        fs::write(&file, b"definitely not a zip archive").unwrap();

        let err = read_npz_array(&file).unwrap_err();
        assert!(matches!(err, FlicError::FormatError(_)));
    }

    #[test]
    fn test_wrong_rank() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flat.npz");
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array(ARRAY_NAME, &ndarray::Array2::<f32>::zeros((2, 2)))
            .unwrap();
        npz.finish().unwrap();

        let err = read_npz_array(&file).unwrap_err();
        assert!(err.to_string().contains("4-D"));
    }

    #[test]
    fn test_f64_arrays_are_converted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wide.npz");
        let wide = Array::from_shape_fn((1, 2, 2, 3), |(_, h, w, c)| (h + w + c) as f64);
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array(ARRAY_NAME, &wide).unwrap();
        npz.finish().unwrap();

        let loaded = read_npz_array(&file).unwrap();
        assert_eq!(loaded, wide.mapv(|v| v as f32));
    }

    #[test]
    fn test_u8_arrays_are_converted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bytes.npz");
        let bytes = Array::from_shape_fn((2, 3, 2, 3), |(n, h, w, c)| {
            (n * 100 + h * 40 + w * 10 + c) as u8
        });
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array(ARRAY_NAME, &bytes).unwrap();
        npz.finish().unwrap();

        let loaded = read_npz_array(&file).unwrap();
        assert_eq!(loaded.shape(), &[2, 3, 2, 3]);
        assert!((loaded[[1, 2, 1, 2]] - 192.0).abs() < f32::EPSILON);
        assert_eq!(loaded, bytes.mapv(f32::from));
    }

    #[test]
    fn test_single_entry_with_other_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("renamed.npz");
        let array = sample_array(2, 3);
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array("images", &array).unwrap();
        npz.finish().unwrap();

        assert_eq!(read_npz_array(&file).unwrap(), array);
    }

    #[test]
    fn test_ambiguous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("two.npz");
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array("images", &sample_array(1, 3)).unwrap();
        npz.add_array("heatmaps", &sample_array(1, 10)).unwrap();
        npz.finish().unwrap();

        let err = read_npz_array(&file).unwrap_err();
        assert!(matches!(err, FlicError::FormatError(_)));
        assert!(err.to_string().contains(ARRAY_NAME));
    }

    #[test]
    fn test_arr_0_preferred_among_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mixed.npz");
        let mut npz = NpzWriter::new(File::create(&file).unwrap());
        npz.add_array("extra", &sample_array(1, 10)).unwrap();
        npz.add_array(ARRAY_NAME, &sample_array(2, 3)).unwrap();
        npz.finish().unwrap();

        assert_eq!(read_npz_array(&file).unwrap(), sample_array(2, 3));
    }

    #[test]
    fn test_load_data() {
        let dir = tempfile::tempdir().unwrap();
        for split in [Split::Train, Split::Test] {
            save_npz_array(&dir.path().join(split.images_file()), &sample_array(2, 3)).unwrap();
            save_npz_array(&dir.path().join(split.heatmaps_file()), &sample_array(2, 10))
                .unwrap();
        }

        let (x_train, y_train, x_test, y_test) = load_data(dir.path()).unwrap();
        assert_eq!(x_train.shape(), &[2, 4, 6, 3]);
        assert_eq!(y_train.shape(), &[2, 4, 6, 10]);
        assert_eq!(x_test, sample_array(2, 3));
        assert_eq!(y_test, sample_array(2, 10));
    }

    #[test]
    fn test_save_figure_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let frame = RgbaImage::from_pixel(9, 6, image::Rgba([10, 20, 30, 255]));

        let path = save_figure(&frame, &dir.path().join("runs"), "joint5").unwrap();

        assert_eq!(path, dir.path().join("runs").join("images").join("joint5.png"));
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (9, 6));
    }
}
