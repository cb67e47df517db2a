//! Whole-deck conversion into an output directory.

use deck_core::html::{
    cell_fragment_file, fragment_file, slide_file, INDEX_FILE, STYLESHEET_FILE,
};
use deck_core::{Error, PageRenderer, Presentation, Result};
use deck_pptx::PptxParser;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Stylesheet bundled into the binary.
pub const BUNDLED_STYLESHEET: &str = include_str!("../resources/style.css");

/// Where `style.css` comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stylesheet {
    /// The stylesheet compiled into this crate.
    #[default]
    Bundled,
    /// A stylesheet file copied verbatim.
    File(PathBuf),
}

/// Counts of the pages written by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub slides: usize,
    pub shape_fragments: usize,
    pub cell_fragments: usize,
}

/// Converts one presentation into index, slide, and fragment pages.
#[derive(Debug)]
pub struct Converter {
    input_path: PathBuf,
    output_dir: PathBuf,
    presentation: Presentation,
    stylesheet: Stylesheet,
}

impl Converter {
    /// Ensure the output directory exists, then load the presentation.
    pub fn new(input_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Self> {
        let input_path = input_path.as_ref().to_path_buf();
        let output_dir = output_dir.as_ref().to_path_buf();

        fs::create_dir_all(&output_dir).map_err(|source| Error::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let presentation = PptxParser::new().open(&input_path)?;
        log::info!(
            "Loaded {} with {} slides",
            input_path.display(),
            presentation.slides.len()
        );

        Ok(Self {
            input_path,
            output_dir,
            presentation,
            stylesheet: Stylesheet::default(),
        })
    }

    /// Use a different stylesheet resource.
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Slide size in pixels; an undeclared dimension is zero.
    pub fn slide_size_px(&self) -> (i64, i64) {
        self.presentation.slide_size_px()
    }

    /// Write every page. Any failure aborts the run; pages already written
    /// stay on disk.
    pub fn run(&self) -> Result<RunSummary> {
        self.copy_stylesheet()?;

        let renderer = PageRenderer::new(&self.presentation, self.input_path.display().to_string());
        self.write_page(INDEX_FILE, &renderer.index())?;

        let mut summary = RunSummary::default();
        for (slide_id, slide) in self.presentation.slides.iter().enumerate() {
            self.write_page(&slide_file(slide_id), &renderer.slide_overview(slide_id, slide))?;
            summary.slides += 1;

            for (shape_id, shape) in slide.shapes.iter().enumerate() {
                self.write_page(
                    &fragment_file(slide_id, shape_id),
                    &renderer.shape_fragment(slide_id, shape_id, shape),
                )?;
                summary.shape_fragments += 1;

                let Some(table) = shape.table() else {
                    continue;
                };
                log::debug!(
                    "Table on slide {} shape {}: {}x{}, {} merged regions",
                    slide_id,
                    shape_id,
                    table.row_count(),
                    table.column_count(),
                    table
                        .rows
                        .iter()
                        .flat_map(|row| &row.cells)
                        .filter(|cell| cell.is_merge_origin())
                        .count()
                );
                for (row_id, row) in table.rows.iter().enumerate() {
                    for (col_id, cell) in row.cells.iter().enumerate() {
                        if cell.is_spanned {
                            continue;
                        }
                        self.write_page(
                            &cell_fragment_file(slide_id, shape_id, row_id, col_id),
                            &renderer.cell_fragment(slide_id, shape_id, row_id, col_id, &cell.text_frame),
                        )?;
                        summary.cell_fragments += 1;
                    }
                }
            }
        }

        log::info!(
            "Wrote {} slides, {} shape fragments, {} cell fragments to {}",
            summary.slides,
            summary.shape_fragments,
            summary.cell_fragments,
            self.output_dir.display()
        );
        Ok(summary)
    }

    fn copy_stylesheet(&self) -> Result<()> {
        match &self.stylesheet {
            Stylesheet::Bundled => self.write_page(STYLESHEET_FILE, BUNDLED_STYLESHEET),
            Stylesheet::File(source) => {
                if !source.is_file() {
                    return Err(Error::MissingStylesheet {
                        path: source.clone(),
                    });
                }
                let target = self.output_dir.join(STYLESHEET_FILE);
                fs::copy(source, &target).map_err(|source| Error::Write {
                    path: target.clone(),
                    source,
                })?;
                log::debug!("Copied stylesheet to {}", target.display());
                Ok(())
            }
        }
    }

    /// Create, fully write, and close one output file.
    fn write_page(&self, file_name: &str, content: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        let write_error = |source| Error::Write {
            path: path.clone(),
            source,
        };

        let mut file = File::create(&path).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;

        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}
