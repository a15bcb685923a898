//! Tile index builder.
//!
//! Turns a directory of tile files into a [`TileGrid`]:
//!
//! 1. List the directory and sort entry names
//! 2. Skip excluded names and names outside `<prefix>*.<extension>`
//! 3. Parse every remaining name and reject duplicate coordinates
//! 4. Decode each tile, sequentially or on the rayon pool
//! 5. Group tiles by column, rows ascending
//!
//! All names are validated before any file is decoded, so a malformed or
//! duplicate name fails fast.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::{DirectoryListing, TileGrid};
use crate::codec::ImageCodec;
use crate::error::{StitchError, StitchResult};
use crate::tile::{NameFilter, Tile, TileCoord};

/// Builds a [`TileGrid`] from a directory listing.
#[derive(Debug, Clone)]
pub struct TileIndexBuilder {
    filter: NameFilter,
    excluded: BTreeSet<String>,
    parallel_decode: bool,
}

impl TileIndexBuilder {
    pub fn new(filter: NameFilter) -> Self {
        Self {
            filter,
            excluded: BTreeSet::new(),
            parallel_decode: false,
        }
    }

    /// Skip an entry name even if it matches the filter.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Decode tiles on the rayon thread pool.
    pub fn with_parallel_decode(mut self, parallel: bool) -> Self {
        self.parallel_decode = parallel;
        self
    }

    /// Select tile names from `names` and map them to grid coordinates.
    ///
    /// Returns `(coordinate, entry name)` pairs in coordinate order.
    ///
    /// # Errors
    ///
    /// - [`StitchError::Parse`] for a name that passes the filter but is malformed
    /// - [`StitchError::DuplicateTile`] when two names share a coordinate
    pub fn select(
        &self,
        dir: &Path,
        mut names: Vec<String>,
    ) -> StitchResult<BTreeMap<TileCoord, String>> {
        names.sort();

        let mut selected: BTreeMap<TileCoord, String> = BTreeMap::new();
        for name in names {
            if self.excluded.contains(&name) || !self.filter.matches(&name) {
                trace!(name = %name, "Skipping entry");
                continue;
            }

            let coord = self.filter.parse(&name)?.coord;
            if let Some(first) = selected.get(&coord) {
                return Err(StitchError::DuplicateTile {
                    coord,
                    first: dir.join(first),
                    second: dir.join(&name),
                });
            }
            selected.insert(coord, name);
        }

        Ok(selected)
    }

    /// Index and decode every tile in `dir`.
    ///
    /// When several tiles fail to decode, the error for the first in
    /// column-major order is returned in both sequential and parallel mode.
    pub fn build<L, C>(&self, dir: &Path, listing: &L, codec: &C) -> StitchResult<TileGrid>
    where
        L: DirectoryListing + ?Sized,
        C: ImageCodec + ?Sized,
    {
        let names = listing
            .list(dir)
            .map_err(|source| StitchError::ListDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        let entry_count = names.len();

        let selected = self.select(dir, names)?;
        info!(
            dir = %dir.display(),
            entries = entry_count,
            tiles = selected.len(),
            parallel = self.parallel_decode,
            "Indexed tile names"
        );

        let decode = |(coord, name): (TileCoord, String)| -> StitchResult<Tile> {
            let path = dir.join(&name);
            let image = codec.decode(&path).map_err(|source| StitchError::Decode {
                path: path.clone(),
                source,
            })?;
            debug!(
                %coord,
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "Decoded tile"
            );
            Ok(Tile::new(coord, path, image))
        };

        let decoded: Vec<StitchResult<Tile>> = if self.parallel_decode {
            selected.into_par_iter().map(decode).collect()
        } else {
            selected.into_iter().map(decode).collect()
        };

        let mut grid = TileGrid::new();
        for tile in decoded {
            grid.insert(tile?)?;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::{DynamicImage, GrayImage, ImageError, ImageResult};
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Codec that fabricates a 1x1 image per path and records decode calls.
    #[derive(Default)]
    struct RecordingCodec {
        decoded: Mutex<Vec<PathBuf>>,
        fail_on: Option<&'static str>,
    }

    impl ImageCodec for RecordingCodec {
        fn decode(&self, path: &Path) -> ImageResult<DynamicImage> {
            self.decoded.lock().unwrap().push(path.to_path_buf());
            if let Some(bad) = self.fail_on {
                if path.ends_with(bad) {
                    return Err(ImageError::IoError(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "corrupt",
                    )));
                }
            }
            Ok(DynamicImage::ImageLuma8(GrayImage::new(1, 1)))
        }

        fn encode(&self, _image: &DynamicImage, _path: &Path) -> ImageResult<()> {
            Ok(())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn builder() -> TileIndexBuilder {
        TileIndexBuilder::new(NameFilter::new("cell_", "pbm").unwrap())
    }

    #[test]
    fn test_non_matching_entries_skipped() {
        let listing = names(&["cell_0_0.pbm", "readme.txt", "cell.pbm", "other_0_1.pbm"]);
        let codec = RecordingCodec::default();

        let grid = builder().build(Path::new("tiles"), &listing, &codec).unwrap();

        assert_eq!(grid.coords(), vec![TileCoord::new(0, 0)]);
        assert_eq!(
            *codec.decoded.lock().unwrap(),
            vec![PathBuf::from("tiles/cell_0_0.pbm")]
        );
    }

    #[test]
    fn test_malformed_name_fails_before_decoding() {
        let listing = names(&["cell_0_0.pbm", "cell_x_1.pbm"]);
        let codec = RecordingCodec::default();

        let err = builder().build(Path::new("."), &listing, &codec).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(codec.decoded.lock().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_coordinate_names_both_files() {
        let listing = names(&["cell_1_0.pbm", "cell_01_0.pbm"]);
        let codec = RecordingCodec::default();

        let err = builder().build(Path::new("d"), &listing, &codec).unwrap_err();

        match err {
            StitchError::DuplicateTile {
                coord,
                first,
                second,
            } => {
                assert_eq!(coord, TileCoord::new(1, 0));
                // Sorted order: "cell_01_0.pbm" < "cell_1_0.pbm"
                assert_eq!(first, PathBuf::from("d/cell_01_0.pbm"));
                assert_eq!(second, PathBuf::from("d/cell_1_0.pbm"));
            }
            other => panic!("expected duplicate tile error, got {other:?}"),
        }
    }

    #[test]
    fn test_excluded_name_not_parsed() {
        let filter = NameFilter::new("cell", "pbm").unwrap();
        let builder = TileIndexBuilder::new(filter).exclude("cell.pbm");
        let listing = names(&["cell.pbm", "cell_0_0.pbm"]);

        let grid = builder
            .build(Path::new("."), &listing, &RecordingCodec::default())
            .unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_decode_failure_surfaces_path() {
        let listing = names(&["cell_0_0.pbm", "cell_0_1.pbm"]);
        let codec = RecordingCodec {
            fail_on: Some("cell_0_1.pbm"),
            ..Default::default()
        };

        let err = builder().build(Path::new("in"), &listing, &codec).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("cell_0_1.pbm"));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let listing = names(&[
            "cell_2_1.pbm",
            "cell_0_0.pbm",
            "cell_1_1.pbm",
            "cell_2_0.pbm",
            "cell_0_1.pbm",
            "cell_1_0.pbm",
        ]);

        let sequential = builder()
            .build(Path::new("."), &listing, &RecordingCodec::default())
            .unwrap();
        let parallel = builder()
            .with_parallel_decode(true)
            .build(Path::new("."), &listing, &RecordingCodec::default())
            .unwrap();

        assert_eq!(sequential.coords(), parallel.coords());
        assert_eq!(sequential.column_count(), 3);
    }

    #[test]
    fn test_select_orders_by_coordinate() {
        let selected = builder()
            .select(
                Path::new("."),
                names(&["cell_10_0.pbm", "cell_2_0.pbm", "cell_2_10.pbm", "cell_2_9.pbm"]),
            )
            .unwrap();

        let coords: Vec<TileCoord> = selected.keys().copied().collect();
        assert_eq!(
            coords,
            vec![
                TileCoord::new(2, 0),
                TileCoord::new(2, 9),
                TileCoord::new(2, 10),
                TileCoord::new(10, 0),
            ]
        );
    }
}
