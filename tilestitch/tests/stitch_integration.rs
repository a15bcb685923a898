//! Integration tests for the stitch pipeline.
//!
//! These tests write real tile files into temporary directories and run the
//! full index -> assemble -> encode flow through the `image` crate codec.
//!
//! Run with: `cargo test --test stitch_integration`

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tempfile::TempDir;

use tilestitch::assembly::GridAssembler;
use tilestitch::codec::{ImageCodec, ImageFileCodec, PnmEncoding};
use tilestitch::config::StitchConfig;
use tilestitch::index::{FsDirectoryListing, TileGrid, TileIndexBuilder};
use tilestitch::stitcher::Stitcher;
use tilestitch::tile::{tile_filename, NameFilter, Tile, TileCoord};
use tilestitch::ErrorKind;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write an RGB tile whose pixels encode its coordinate.
fn write_rgb_tile(dir: &Path, column: u32, row: u32, width: u32, height: u32) {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([column as u8 * 40 + x as u8, row as u8 * 40 + y as u8, 99])
    });
    let path = dir.join(tile_filename("cell_", TileCoord::new(column, row), "png"));
    image.save(path).unwrap();
}

/// Write a plain PBM tile filled with a single bit value (1 = black).
fn write_pbm_tile(dir: &Path, column: u32, row: u32, bit: u8) {
    let path = dir.join(tile_filename("cell_", TileCoord::new(column, row), "pbm"));
    fs::write(path, format!("P1\n1 1\n{}\n", bit)).unwrap();
}

fn png_config(dir: &Path, output: PathBuf) -> StitchConfig {
    StitchConfig::default()
        .with_input_dir(dir)
        .with_extension("png")
        .with_output_path(output)
}

// ============================================================================
// End-to-end runs
// ============================================================================

#[test]
fn test_png_grid_written_and_readable() {
    let tiles = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    // Two columns (2px, 3px wide), two rows (4px, 1px tall)
    write_rgb_tile(tiles.path(), 0, 0, 2, 4);
    write_rgb_tile(tiles.path(), 0, 1, 2, 1);
    write_rgb_tile(tiles.path(), 1, 0, 3, 4);
    write_rgb_tile(tiles.path(), 1, 1, 3, 1);
    fs::write(tiles.path().join("notes.txt"), "not a tile").unwrap();

    let output = out.path().join("mosaic.png");
    let report = Stitcher::new(png_config(tiles.path(), output.clone()))
        .run()
        .unwrap();

    assert_eq!((report.width, report.height), (5, 5));
    assert_eq!((report.columns, report.rows, report.tiles), (2, 2, 4));

    let composite = image::open(&output).unwrap().into_rgb8();
    // Top-left of tile (1, 1) sits at x = 2, y = 4
    assert_eq!(*composite.get_pixel(2, 4), Rgb([40, 40, 99]));
    // Bottom-right pixel of tile (1, 0)
    assert_eq!(*composite.get_pixel(4, 3), Rgb([42, 3, 99]));
}

#[test]
fn test_pbm_checkerboard_scenario() {
    let dir = TempDir::new().unwrap();
    write_pbm_tile(dir.path(), 0, 0, 0); // white
    write_pbm_tile(dir.path(), 0, 1, 1); // black
    write_pbm_tile(dir.path(), 1, 0, 1); // black
    write_pbm_tile(dir.path(), 1, 1, 0); // white

    let codec = ImageFileCodec::new();
    let builder = TileIndexBuilder::new(NameFilter::new("cell_", "pbm").unwrap());
    let grid = builder.build(dir.path(), &FsDirectoryListing, &codec).unwrap();

    let white = grid.get(TileCoord::new(0, 0)).unwrap().image().to_luma8()[(0, 0)];
    let black = grid.get(TileCoord::new(0, 1)).unwrap().image().to_luma8()[(0, 0)];
    assert_ne!(white, black);

    let composite = GridAssembler::new().assemble(grid).unwrap();
    let image = composite.image().to_luma8();

    assert_eq!(image.dimensions(), (2, 2));
    assert_eq!(image[(0, 0)], white);
    assert_eq!(image[(0, 1)], black);
    assert_eq!(image[(1, 0)], black);
    assert_eq!(image[(1, 1)], white);
}

#[test]
fn test_pbm_checkerboard_written_in_both_encodings() {
    for (encoding, magic) in [(PnmEncoding::Ascii, b"P1"), (PnmEncoding::Binary, b"P4")] {
        let dir = TempDir::new().unwrap();
        write_pbm_tile(dir.path(), 0, 0, 0);
        write_pbm_tile(dir.path(), 0, 1, 1);
        write_pbm_tile(dir.path(), 1, 0, 1);
        write_pbm_tile(dir.path(), 1, 1, 0);

        let output = dir.path().join("cell.pbm");
        let config = StitchConfig::default()
            .with_input_dir(dir.path())
            .with_output_path(&output)
            .with_pnm_encoding(encoding);
        let report = Stitcher::new(config).run().unwrap();
        assert_eq!(report.tiles, 4);

        assert!(fs::read(&output).unwrap().starts_with(magic), "{}", encoding);
        let image = image::open(&output).unwrap().into_luma8();
        assert_eq!(image.dimensions(), (2, 2));
        // Column 0 is white over black, column 1 is black over white
        assert_eq!(image.as_raw(), &vec![255, 0, 0, 255], "{}", encoding);
    }
}

#[test]
fn test_output_in_tile_dir_is_skipped_on_rerun() {
    let dir = TempDir::new().unwrap();
    write_rgb_tile(dir.path(), 0, 0, 1, 1);
    write_rgb_tile(dir.path(), 1, 0, 1, 1);

    // Output name matches the prefix and extension of the tiles
    let config = png_config(dir.path(), dir.path().join("cell_out.png"));
    Stitcher::new(config.clone()).run().unwrap();

    // The second run would fail to parse "cell_out.png" if it were scanned
    let report = Stitcher::new(config).run().unwrap();
    assert_eq!(report.tiles, 2);
}

#[test]
fn test_malformed_name_fails_with_parse_error() {
    let dir = TempDir::new().unwrap();
    write_rgb_tile(dir.path(), 0, 0, 1, 1);
    fs::write(dir.path().join("cellx_1.png"), b"").unwrap();

    let config = png_config(dir.path(), dir.path().join("out.png")).with_prefix("cell");
    let err = Stitcher::new(config).run().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn test_missing_tile_fails_with_dimension_mismatch() {
    let dir = TempDir::new().unwrap();
    write_rgb_tile(dir.path(), 0, 0, 1, 1);
    write_rgb_tile(dir.path(), 0, 1, 1, 1);
    write_rgb_tile(dir.path(), 1, 0, 1, 1);

    let err = Stitcher::new(png_config(dir.path(), dir.path().join("out.png")))
        .run()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn test_duplicate_coordinates_fail() {
    let dir = TempDir::new().unwrap();
    write_rgb_tile(dir.path(), 1, 0, 1, 1);
    fs::copy(
        dir.path().join("cell_1_0.png"),
        dir.path().join("cell_01_0.png"),
    )
    .unwrap();

    let err = Stitcher::new(png_config(dir.path(), dir.path().join("out.png")))
        .run()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateTile);
}

#[test]
fn test_undecodable_tile_is_io_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cell_0_0.png"), b"not an image").unwrap();

    let err = Stitcher::new(png_config(dir.path(), dir.path().join("out.png")))
        .run()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let config = png_config(&dir.path().join("absent"), dir.path().join("out.png"));

    let err = Stitcher::new(config).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = TempDir::new().unwrap();
    write_rgb_tile(dir.path(), 0, 0, 1, 1);

    let output = dir.path().join("missing_dir").join("out.png");
    let err = Stitcher::new(png_config(dir.path(), output)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_listing_order_does_not_change_output() {
    let dir = TempDir::new().unwrap();
    let mut names = Vec::new();
    for column in 0..4 {
        for row in 0..3 {
            write_rgb_tile(dir.path(), column, row, 2, 2);
            names.push(tile_filename("cell_", TileCoord::new(column, row), "png"));
        }
    }

    let reference = Stitcher::new(png_config(dir.path(), dir.path().join("a.png")))
        .with_listing(names.clone())
        .assemble()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(0x7115);
    for round in 0..6 {
        names.shuffle(&mut rng);
        let config = png_config(dir.path(), dir.path().join("a.png"))
            .with_parallel_decode(round % 2 == 1);
        let composite = Stitcher::new(config)
            .with_listing(names.clone())
            .assemble()
            .unwrap();
        assert_eq!(composite.image().as_bytes(), reference.image().as_bytes());
    }
}

// ============================================================================
// Round-trip property
// ============================================================================

fn grid_from_sizes(widths: &[u32], heights: &[u32], seed: u8) -> TileGrid {
    let mut tiles = Vec::new();
    for (column, &width) in widths.iter().enumerate() {
        for (row, &height) in heights.iter().enumerate() {
            let image = GrayImage::from_fn(width, height, |x, y| {
                Luma([seed
                    .wrapping_add(column as u8 * 31)
                    .wrapping_add(row as u8 * 17)
                    .wrapping_add((x * 3 + y) as u8)])
            });
            tiles.push(Tile::new(
                TileCoord::new(column as u32, row as u32),
                PathBuf::new(),
                DynamicImage::ImageLuma8(image),
            ));
        }
    }
    TileGrid::from_tiles(tiles).unwrap()
}

proptest! {
    #[test]
    fn test_assemble_then_split_roundtrip(
        widths in prop::collection::vec(1u32..6, 1..5),
        heights in prop::collection::vec(1u32..6, 1..5),
        seed in any::<u8>(),
    ) {
        let original = grid_from_sizes(&widths, &heights, seed);
        let expected: Vec<(TileCoord, Vec<u8>)> = original
            .tiles()
            .map(|t| (t.coord(), t.image().as_bytes().to_vec()))
            .collect();

        let composite = GridAssembler::new().assemble(original).unwrap();
        prop_assert_eq!(composite.width(), widths.iter().sum::<u32>());
        prop_assert_eq!(composite.height(), heights.iter().sum::<u32>());

        let split = composite
            .layout()
            .split(composite.image(), |_| PathBuf::new())
            .unwrap();
        let actual: Vec<(TileCoord, Vec<u8>)> = split
            .tiles()
            .map(|t| (t.coord(), t.image().as_bytes().to_vec()))
            .collect();

        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn test_split_tiles_restitch_from_disk() {
    let source = TempDir::new().unwrap();
    write_rgb_tile(source.path(), 0, 0, 2, 2);
    write_rgb_tile(source.path(), 1, 0, 3, 2);
    write_rgb_tile(source.path(), 0, 1, 2, 1);
    write_rgb_tile(source.path(), 1, 1, 3, 1);

    let composite = Stitcher::new(png_config(source.path(), source.path().join("x.png")))
        .assemble()
        .unwrap();

    // Split into a fresh directory and stitch again
    let target = TempDir::new().unwrap();
    let codec = ImageFileCodec::new();
    let tiles = composite
        .layout()
        .split(composite.image(), |coord| {
            target.path().join(tile_filename("cell_", coord, "png"))
        })
        .unwrap();
    for tile in tiles.tiles() {
        codec.encode(tile.image(), tile.source()).unwrap();
    }

    let again = Stitcher::new(png_config(target.path(), target.path().join("y.png")))
        .assemble()
        .unwrap();
    assert_eq!(again.image().as_bytes(), composite.image().as_bytes());
}
