//! Matrix file loading and storage layout selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use splitsparse_core::{Layout, SplitSparseMatrix};

/// Storage layout the file was written with. Binary files do not record it.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutArg {
    #[default]
    Row,
    Col,
    RowSym,
    ColSym,
    RowHerm,
    ColHerm,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFormat {
    /// Text for `.txt`, `.dat` and `.mtx` files, binary otherwise.
    #[default]
    Auto,
    Binary,
    Text,
}

impl FileFormat {
    /// Resolve `Auto` against the file extension.
    pub fn resolve(self, path: &Path) -> FileFormat {
        match self {
            FileFormat::Auto => {
                let ext = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_ascii_lowercase());
                match ext.as_deref() {
                    Some("txt" | "dat" | "mtx") => FileFormat::Text,
                    _ => FileFormat::Binary,
                }
            }
            other => other,
        }
    }
}

/// A matrix file plus how to interpret it.
#[derive(Args, Debug, Clone)]
pub struct MatrixSource {
    /// Matrix file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Storage layout of the file.
    #[arg(long, value_enum, default_value_t = LayoutArg::Row)]
    pub layout: LayoutArg,

    /// File format.
    #[arg(long, value_enum, default_value_t = FileFormat::Auto)]
    pub format: FileFormat,
}

/// Load a double-precision matrix in layout `L`.
pub fn load<L: Layout>(source: &MatrixSource) -> Result<SplitSparseMatrix<f64, L>> {
    let path = &source.file;
    let matrix = match source.format.resolve(path) {
        FileFormat::Text => SplitSparseMatrix::<f64, L>::read_text_file(path),
        _ => SplitSparseMatrix::<f64, L>::read_from_file(path),
    }
    .with_context(|| format!("Failed to read matrix from {}", path.display()))?;

    log::info!(
        "Loaded {}x{} {} matrix from {} ({} real, {} imaginary nonzeros)",
        matrix.rows(),
        matrix.cols(),
        L::NAME,
        path.display(),
        matrix.real_nnz(),
        matrix.imag_nnz()
    );
    Ok(matrix)
}

/// Run `$body` with `$L` bound to the layout type selected by `$layout`.
macro_rules! with_layout {
    ($layout:expr, $L:ident => $body:expr) => {
        match $layout {
            $crate::input::LayoutArg::Row => {
                type $L = splitsparse_core::RowMajor;
                $body
            }
            $crate::input::LayoutArg::Col => {
                type $L = splitsparse_core::ColMajor;
                $body
            }
            $crate::input::LayoutArg::RowSym => {
                type $L = splitsparse_core::RowSym;
                $body
            }
            $crate::input::LayoutArg::ColSym => {
                type $L = splitsparse_core::ColSym;
                $body
            }
            $crate::input::LayoutArg::RowHerm => {
                type $L = splitsparse_core::RowHerm;
                $body
            }
            $crate::input::LayoutArg::ColHerm => {
                type $L = splitsparse_core::ColHerm;
                $body
            }
        }
    };
}

pub(crate) use with_layout;

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64 as C64;
    use splitsparse_core::{ColSym, RowMajor};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("splitsparse-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn auto_format_follows_extension() {
        assert_eq!(FileFormat::Auto.resolve(Path::new("a.txt")), FileFormat::Text);
        assert_eq!(FileFormat::Auto.resolve(Path::new("a.MTX")), FileFormat::Text);
        assert_eq!(FileFormat::Auto.resolve(Path::new("a.bin")), FileFormat::Binary);
        assert_eq!(FileFormat::Auto.resolve(Path::new("matrix")), FileFormat::Binary);
        assert_eq!(FileFormat::Text.resolve(Path::new("a.bin")), FileFormat::Text);
    }

    #[test]
    fn loads_binary_and_text() {
        let m = SplitSparseMatrix::<f64, RowMajor>::from_triplets(
            2,
            3,
            &[(0, 0, C64::new(1.0, 2.0)), (1, 2, C64::new(0.0, -1.5))],
        )
        .unwrap();

        let bin = temp_path("load.bin");
        m.write_to_file(&bin).unwrap();
        let source = MatrixSource {
            file: bin.clone(),
            layout: LayoutArg::Row,
            format: FileFormat::Auto,
        };
        assert_eq!(load::<RowMajor>(&source).unwrap(), m);

        let txt = temp_path("load.txt");
        m.write_text_file(&txt, false).unwrap();
        let source = MatrixSource {
            file: txt.clone(),
            ..source
        };
        assert_eq!(load::<RowMajor>(&source).unwrap().to_dense(), m.to_dense());

        std::fs::remove_file(bin).unwrap();
        std::fs::remove_file(txt).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let source = MatrixSource {
            file: temp_path("missing.bin"),
            layout: LayoutArg::Row,
            format: FileFormat::Auto,
        };
        let err = load::<RowMajor>(&source).unwrap_err();
        assert!(format!("{err}").contains("missing.bin"));
    }

    #[test]
    fn layout_macro_binds_the_type() {
        let name = with_layout!(LayoutArg::ColSym, L => L::NAME);
        assert_eq!(name, ColSym::NAME);
    }
}
