//! Fixed-width text tables.
//!
//! This module renders tabular data as a bordered, monospace table suitable
//! for a terminal or a static text file. It provides:
//!
//! - **Texttable**: the table builder and renderer
//! - **CellValue**: raw cell values, normalized per column [`Dtype`]
//! - **Options**: per-column alignment, datatypes, decorations and line characters
//! - **Measuring**: style-code aware visual length ([`visual_len`])
//!
//! Rendering goes through three steps on every [`Texttable::draw`]:
//! 1. Column widths (natural widths, fitted into the width budget)
//! 2. Wrapping and vertical filling of each row
//! 3. Emitting border, header, separator and row lines
//!
//! ## Example
//!
//! ```rust
//! use tabroomlib::table::{Align, Texttable};
//!
//! let mut table = Texttable::with_max_width(40);
//! table
//!     .set_cols_align(&[Align::Left, Align::Center])
//!     .unwrap();
//! table
//!     .add_rows(
//!         vec![
//!             vec!["Tournament", "Date"],
//!             vec!["Example Invitational", "2024-01-15"],
//!         ],
//!         true,
//!     )
//!     .unwrap();
//!
//! let out = table.draw();
//! assert_eq!(out.lines().count(), 5);
//! ```

pub mod cell;
pub mod layout;
pub mod measure;
pub mod options;
pub mod texttable;
pub mod wrap;

pub use cell::CellValue;
pub use layout::fit_widths;
pub use measure::{strip_styles, visual_len};
pub use options::{parse_list, Align, BorderChars, CharWidth, Decorations, Dtype, VAlign};
pub use texttable::{Texttable, DEFAULT_MAX_WIDTH, DEFAULT_PRECISION};
pub use wrap::wrap_cell;
