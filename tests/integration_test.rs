// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the heatmap toolkit

use flic_heatmaps::io::{Split, save_npz_array};
use flic_heatmaps::{
    Canvas, FlicError, JOINTS, VizConfig, VizOptions, load_data, load_train_data, to_dataloader,
    viz_sample,
};
use ndarray::{Array4, Axis};

fn synthetic(samples: usize) -> (Array4<f32>, Array4<f32>) {
    let images = Array4::from_shape_fn((samples, 60, 90, 3), |(n, y, x, c)| {
        ((n * 31 + y * 3 + x + c) % 256) as f32
    });
    let heatmaps = Array4::from_shape_fn((samples, 60, 90, JOINTS.len()), |(n, y, x, j)| {
        let cy = ((n + j * 6) % 60) as f32;
        let cx = ((n + j * 9) % 90) as f32;
        let d2 = (y as f32 - cy).powi(2) + (x as f32 - cx).powi(2);
        (-d2 / 18.0).exp()
    });
    (images, heatmaps)
}

fn write_dataset(dir: &std::path::Path, train: usize, test: usize) {
    for (split, samples) in [(Split::Train, train), (Split::Test, test)] {
        let (images, heatmaps) = synthetic(samples);
        save_npz_array(&dir.join(split.images_file()), &images).unwrap();
        save_npz_array(&dir.join(split.heatmaps_file()), &heatmaps).unwrap();
    }
}

#[test]
fn test_batches_are_channel_first() {
    let (images, heatmaps) = synthetic(20);
    let loader = to_dataloader(images, heatmaps, 10, false).unwrap();

    let batches: Vec<_> = loader.iter().collect();
    assert_eq!(batches.len(), 2);
    for batch in &batches {
        assert_eq!(batch.images.shape(), &[10, 3, 60, 90]);
        assert_eq!(batch.heatmaps.shape(), &[10, 10, 60, 90]);
    }
    assert_eq!(batches[1].indices, (10..20).collect::<Vec<_>>());
}

#[test]
fn test_shuffled_pass_covers_every_sample() {
    let (images, heatmaps) = synthetic(23);
    let loader = to_dataloader(images, heatmaps, 10, true).unwrap();

    let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![10, 10, 3]);

    let mut seen: Vec<usize> = loader.iter().flat_map(|b| b.indices).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..23).collect::<Vec<_>>());
}

#[test]
fn test_load_from_npz_files() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), 5, 3);

    let (x_train, y_train, x_test, y_test) = load_data(dir.path()).unwrap();
    assert_eq!(x_train.shape(), &[5, 60, 90, 3]);
    assert_eq!(y_train.shape(), &[5, 60, 90, 10]);
    assert_eq!(x_test.shape(), &[3, 60, 90, 3]);
    assert_eq!(y_test.shape(), &[3, 60, 90, 10]);

    let (expected, _) = synthetic(5);
    assert_eq!(x_train, expected);
}

#[test]
fn test_missing_train_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_train_data(dir.path()).unwrap_err();
    assert!(matches!(err, FlicError::FileNotFound(_)));
}

#[test]
fn test_load_batch_and_visualize() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(data.path(), 12, 2);

    let (images, heatmaps) = load_train_data(data.path()).unwrap();
    let loader = to_dataloader(images, heatmaps, 4, true).unwrap();
    let (image, heatmap) = loader.dataset().get(10).unwrap();
    assert_eq!(image.shape(), &[3, 60, 90]);
    assert_eq!(heatmap.len_of(Axis(0)), 10);

    let mut canvas = Canvas::new();
    let opts = VizOptions::new()
        .with_permute(true)
        .with_name("train_10")
        .with_save_dir(out.path());
    let figure = viz_sample(
        &mut canvas,
        image.view(),
        heatmap.view(),
        &opts,
        &VizConfig::default(),
    )
    .unwrap();

    let saved = out.path().join("images").join("train_10.png");
    assert_eq!(figure.saved_to.as_deref(), Some(saved.as_path()));
    let reloaded = image::open(&saved).unwrap();
    assert_eq!((reloaded.width(), reloaded.height()), (90, 60));
    assert!(canvas.is_empty());
}

#[test]
fn test_full_res_figure_covers_upscaled_heatmaps() {
    let (images, heatmaps) = synthetic(1);
    let mut canvas = Canvas::new();
    let opts = VizOptions::new().with_full_res(true);

    let figure = viz_sample(
        &mut canvas,
        images.index_axis(Axis(0), 0),
        heatmaps.index_axis(Axis(0), 0),
        &opts,
        &VizConfig::default(),
    )
    .unwrap();

    assert_eq!(figure.frame.dimensions(), (720, 480));
    assert_eq!(figure.title, "Image with targets on top");
    assert!(figure.saved_to.is_none());
}
