// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::cli::args::PreviewArgs;
use crate::config::VizConfig;
use crate::dataloader::{DataLoader, to_dataloader};
use crate::error::{FlicError, Result};
use crate::io::{Split, load_data};
use crate::visualizer::{Canvas, Figure, VizOptions, viz_sample};
use crate::{VERSION, section, success, verbose, warn};

/// Load the dataset, batch both splits and visualize one sample of each.
///
/// # Errors
///
/// Returns the first loading, batching or rendering error.
pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    section!("flic-heatmaps {VERSION} 🚀 preview");

    let (x_train, y_train, x_test, y_test) = load_data(&args.data)?;

    let shuffle = !args.no_shuffle;
    let train_loader = to_dataloader(x_train, y_train, args.batch, shuffle)?;
    let test_loader = to_dataloader(x_test, y_test, args.batch, shuffle)?;
    describe(Split::Train, &train_loader);
    describe(Split::Test, &test_loader);

    let config = viz_config(args);
    let mut canvas = Canvas::new();

    for (split, loader) in [(Split::Train, &train_loader), (Split::Test, &test_loader)] {
        let figure = preview_sample(&mut canvas, split, loader, args, &config)?;

        if let Some(path) = &figure.saved_to {
            success!("Saved {split} sample {} to {}", args.index, path.display());
        }

        if args.show {
            show(&figure)?;
        }
    }

    Ok(())
}

/// Visualize sample `args.index` of one split.
fn preview_sample(
    canvas: &mut Canvas,
    split: Split,
    loader: &DataLoader,
    args: &PreviewArgs,
    config: &VizConfig,
) -> Result<Figure> {
    let dataset = loader.dataset();
    let (image, heatmap) = dataset.get(args.index).ok_or_else(|| {
        FlicError::IndexError(format!(
            "sample {} out of range for {split} split of {} samples",
            args.index,
            dataset.len()
        ))
    })?;

    let mut opts = VizOptions::new()
        .with_permute(true)
        .with_full_res(args.full_res);
    if let Some(save_dir) = &args.save_dir {
        opts = opts
            .with_name(format!("{split}_{}", args.index))
            .with_save_dir(save_dir);
    }

    viz_sample(canvas, image.view(), heatmap.view(), &opts, config)
}

fn describe(split: Split, loader: &DataLoader) {
    let dataset = loader.dataset();
    verbose!(
        "{split}: {} samples, images {:?}, heatmaps {:?}, {} batches of {}{}",
        dataset.len(),
        dataset.images().shape(),
        dataset.heatmaps().shape(),
        loader.num_batches(),
        loader.batch_size(),
        if loader.shuffles() { ", shuffled" } else { "" }
    );
}

/// Rendering configuration for the command. The title font is only looked up
/// when a figure will actually be seen.
fn viz_config(args: &PreviewArgs) -> VizConfig {
    let config = VizConfig::new();
    if let Some(font) = &args.font {
        return config.with_font(font);
    }
    if args.save_dir.is_none() && !args.show {
        return config;
    }
    match default_font() {
        Some(font) => config.with_font(font),
        None => {
            warn!("No title font available, figures are drawn without titles");
            config
        }
    }
}

#[cfg(feature = "annotate")]
fn default_font() -> Option<std::path::PathBuf> {
    crate::font::resolve_default_font()
}

#[cfg(not(feature = "annotate"))]
fn default_font() -> Option<std::path::PathBuf> {
    None
}

#[cfg(feature = "visualize")]
fn show(figure: &Figure) -> Result<()> {
    crate::visualizer::Viewer::show_blocking(&figure.title, &figure.frame)
}

#[cfg(not(feature = "visualize"))]
fn show(_figure: &Figure) -> Result<()> {
    warn!("Built without the 'visualize' feature, --show is ignored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save_npz_array;
    use ndarray::Array4;
    use std::path::Path;

    fn write_split(dir: &Path, split: Split, samples: usize) {
        let images = Array4::from_shape_fn((samples, 60, 90, 3), |(n, y, x, c)| {
            ((n + y + x + c) % 255) as f32
        });
        let heatmaps = Array4::from_shape_fn((samples, 60, 90, 10), |(_, y, x, j)| {
            if y == j * 5 && x == j * 8 { 1.0 } else { 0.0 }
        });
        save_npz_array(&dir.join(split.images_file()), &images).unwrap();
        save_npz_array(&dir.join(split.heatmaps_file()), &heatmaps).unwrap();
    }

    fn preview_args(data: &Path) -> PreviewArgs {
        PreviewArgs {
            data: data.to_path_buf(),
            index: 2,
            batch: 2,
            no_shuffle: false,
            full_res: false,
            save_dir: None,
            font: None,
            show: false,
            verbose: false,
        }
    }

    #[test]
    fn test_preview_sample_saves_named_figure() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut args = preview_args(data.path());
        args.save_dir = Some(out.path().to_path_buf());

        let loader = to_dataloader(
            Array4::zeros((4, 60, 90, 3)),
            Array4::from_elem((4, 60, 90, 10), 0.5),
            2,
            true,
        )
        .unwrap();
        let mut canvas = Canvas::new();
        let figure =
            preview_sample(&mut canvas, Split::Test, &loader, &args, &VizConfig::new()).unwrap();

        let expected = out.path().join("images").join("test_2.png");
        assert_eq!(figure.saved_to.as_deref(), Some(expected.as_path()));
        assert!(expected.exists());
        assert_eq!(figure.title, "Displaying targets: test_2");
        assert!(canvas.is_empty());
    }

    #[cfg(feature = "annotate")]
    #[test]
    fn test_preview_unreadable_font() {
        let data = tempfile::tempdir().unwrap();
        write_split(data.path(), Split::Train, 3);
        write_split(data.path(), Split::Test, 3);

        let mut args = preview_args(data.path());
        args.font = Some(data.path().join("missing.ttf"));
        let err = run_preview(&args).unwrap_err();
        assert!(matches!(err, FlicError::ConfigError(_)));
    }

    #[test]
    fn test_preview_without_save_dir_writes_nothing() {
        let data = tempfile::tempdir().unwrap();
        write_split(data.path(), Split::Train, 3);
        write_split(data.path(), Split::Test, 3);

        let args = preview_args(data.path());
        run_preview(&args).unwrap();

        assert!(!data.path().join("images").exists());
    }

    #[test]
    fn test_preview_index_out_of_range() {
        let data = tempfile::tempdir().unwrap();
        write_split(data.path(), Split::Train, 2);
        write_split(data.path(), Split::Test, 2);

        let mut args = preview_args(data.path());
        args.index = 10;
        let err = run_preview(&args).unwrap_err();
        assert!(matches!(err, FlicError::IndexError(_)));
    }

    #[test]
    fn test_preview_missing_data() {
        let data = tempfile::tempdir().unwrap();
        let err = run_preview(&preview_args(data.path())).unwrap_err();
        assert!(matches!(err, FlicError::FileNotFound(_)));
    }
}
