//! The [`Texttable`] builder and its renderer.

use tracing::debug;

use crate::error::TableError;

use super::cell::CellValue;
use super::layout::fit_widths;
use super::measure::visual_len;
use super::options::{Align, BorderChars, CharWidth, Decorations, Dtype, VAlign};
use super::wrap::wrap_row;

/// Default total width budget.
pub const DEFAULT_MAX_WIDTH: usize = 80;

/// Default digit count for float and exponential formats.
pub const DEFAULT_PRECISION: usize = 3;

/// A fixed-width plain-text table.
///
/// Configure it with the setters, add rows, then call [`Texttable::draw`].
/// The first non-empty header, row or per-column array fixes the column
/// count; every later array must match it. A failed call leaves the table
/// unchanged.
///
/// ```rust
/// use tabroomlib::{Align, Texttable};
///
/// let mut table = Texttable::new();
/// table.set_cols_align(&[Align::Left, Align::Right]).unwrap();
/// table.header(["Name", "Wins"]).unwrap();
/// table.add_row(["Lincoln", "5"]).unwrap();
///
/// let out = table.draw();
/// assert!(out.starts_with("+---------+------+"));
/// assert!(out.contains("| Lincoln |    5 |"));
/// ```
#[derive(Debug, Clone)]
pub struct Texttable {
    max_width: usize,
    precision: usize,
    deco: Decorations,
    chars: BorderChars,
    char_width: CharWidth,
    column_count: Option<usize>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Option<Vec<Align>>,
    valign: Option<Vec<VAlign>>,
    dtype: Option<Vec<Dtype>>,
    width: Option<Vec<usize>>,
}

impl Default for Texttable {
    fn default() -> Self {
        Self::new()
    }
}

impl Texttable {
    /// Create a table with an 80-column budget and every decoration enabled.
    pub fn new() -> Self {
        Self::with_max_width(DEFAULT_MAX_WIDTH)
    }

    /// Create a table with the given width budget (0 = unlimited, no wrapping).
    pub fn with_max_width(max_width: usize) -> Self {
        Texttable {
            max_width,
            precision: DEFAULT_PRECISION,
            deco: Decorations::all(),
            chars: BorderChars::default(),
            char_width: CharWidth::default(),
            column_count: None,
            header: Vec::new(),
            rows: Vec::new(),
            align: None,
            valign: None,
            dtype: None,
            width: None,
        }
    }

    /// Clear the header and rows.
    ///
    /// Per-column settings survive, and so does the column count they fixed.
    pub fn reset(&mut self) -> &mut Self {
        self.header.clear();
        self.rows.clear();
        self.column_count = [
            self.align.as_ref().map(Vec::len),
            self.valign.as_ref().map(Vec::len),
            self.dtype.as_ref().map(Vec::len),
            self.width.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
        .find(|&len| len > 0);
        self
    }

    /// Set the total width budget (0 = unlimited, no wrapping).
    pub fn set_max_width(&mut self, max_width: usize) -> &mut Self {
        self.max_width = max_width;
        self
    }

    /// Set which lines are drawn.
    pub fn set_deco(&mut self, deco: Decorations) -> &mut Self {
        self.deco = deco;
        self
    }

    /// Set how visible characters are measured.
    pub fn set_char_width(&mut self, char_width: CharWidth) -> &mut Self {
        self.char_width = char_width;
        self
    }

    /// Set the line characters as `[horizontal, vertical, corner, header]`.
    pub fn set_chars<S: AsRef<str>>(&mut self, chars: &[S]) -> Result<&mut Self, TableError> {
        self.chars = BorderChars::from_slice(chars)?;
        Ok(self)
    }

    /// Set the digit count used by float and exponential formats.
    ///
    /// Applies to rows added after the call.
    pub fn set_precision(&mut self, precision: i64) -> Result<&mut Self, TableError> {
        self.precision =
            usize::try_from(precision).map_err(|_| TableError::InvalidPrecision(precision))?;
        Ok(self)
    }

    /// Set per-column horizontal alignment (default: left).
    pub fn set_cols_align(&mut self, align: &[Align]) -> Result<&mut Self, TableError> {
        self.fix_columns(align.len())?;
        self.align = Some(align.to_vec());
        Ok(self)
    }

    /// Set per-column vertical alignment (default: top).
    pub fn set_cols_valign(&mut self, valign: &[VAlign]) -> Result<&mut Self, TableError> {
        self.fix_columns(valign.len())?;
        self.valign = Some(valign.to_vec());
        Ok(self)
    }

    /// Set per-column datatypes (default: auto).
    ///
    /// Applies to rows added after the call.
    pub fn set_cols_dtype(&mut self, dtype: &[Dtype]) -> Result<&mut Self, TableError> {
        self.fix_columns(dtype.len())?;
        self.dtype = Some(dtype.to_vec());
        Ok(self)
    }

    /// Set explicit column widths.
    ///
    /// Explicit widths replace automatic sizing for every column, for as
    /// long as the table lives.
    pub fn set_cols_width(&mut self, width: &[usize]) -> Result<&mut Self, TableError> {
        self.check_columns(width.len())?;
        if let Some((column, &w)) = width.iter().enumerate().find(|&(_, &w)| w == 0) {
            return Err(TableError::InvalidWidth { column, width: w });
        }
        self.fix_columns(width.len())?;
        self.width = Some(width.to_vec());
        Ok(self)
    }

    /// Set the header row. Header cells are kept as plain text.
    pub fn header<I>(&mut self, cells: I) -> Result<&mut Self, TableError>
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let cells: Vec<String> = cells
            .into_iter()
            .map(|c| Into::<CellValue>::into(c).plain())
            .collect();
        self.fix_columns(cells.len())?;
        self.header = cells;
        Ok(self)
    }

    /// Add a data row. Cells may contain newlines and tabs.
    ///
    /// A row needs at least one cell, even before the column count is fixed.
    pub fn add_row<I>(&mut self, cells: I) -> Result<&mut Self, TableError>
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let values: Vec<CellValue> = cells.into_iter().map(Into::into).collect();
        self.check_columns(values.len())?;
        if values.is_empty() {
            return Err(TableError::Sizing {
                expected: 1,
                found: 0,
            });
        }
        self.fix_columns(values.len())?;
        let row = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.normalize(self.dtype_of(i), self.precision))
            .collect();
        self.rows.push(row);
        Ok(self)
    }

    /// Add several rows, using the first as the header when `with_header`
    /// is set.
    ///
    /// Stops at the first row that does not fit; rows before it stay added.
    pub fn add_rows<R, I>(&mut self, rows: R, with_header: bool) -> Result<&mut Self, TableError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let mut rows = rows.into_iter();
        if with_header {
            if let Some(first) = rows.next() {
                self.header(first)?;
            }
        }
        for row in rows {
            self.add_row(row)?;
        }
        Ok(self)
    }

    /// The column count, once fixed.
    pub fn column_count(&self) -> Option<usize> {
        self.column_count
    }

    /// Current header cells (empty if headerless).
    pub fn header_cells(&self) -> &[String] {
        &self.header
    }

    /// Normalized data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn dtype_of(&self, column: usize) -> Dtype {
        self.dtype
            .as_ref()
            .and_then(|d| d.get(column).copied())
            .unwrap_or_default()
    }

    fn check_columns(&self, len: usize) -> Result<(), TableError> {
        match self.column_count {
            Some(expected) if expected != len => Err(TableError::Sizing {
                expected,
                found: len,
            }),
            _ => Ok(()),
        }
    }

    fn fix_columns(&mut self, len: usize) -> Result<(), TableError> {
        self.check_columns(len)?;
        if self.column_count.is_none() && len > 0 {
            self.column_count = Some(len);
        }
        Ok(())
    }

    /// Column widths for this render: explicit widths if set, otherwise the
    /// natural widths fitted into the budget.
    pub fn column_widths(&self) -> Vec<usize> {
        let columns = self.column_count.unwrap_or(0);
        if let Some(width) = self.width.as_ref().filter(|w| w.len() == columns) {
            return width.clone();
        }
        let mut natural = vec![0; columns];
        let all_rows = std::iter::once(&self.header)
            .filter(|h| !h.is_empty())
            .chain(self.rows.iter());
        for row in all_rows {
            for (col, cell) in row.iter().enumerate() {
                natural[col] = natural[col].max(visual_len(cell, self.char_width));
            }
        }
        fit_widths(&natural, self.max_width)
    }

    /// Render the table.
    ///
    /// Layout is recomputed from the current state on every call. A table
    /// with neither header nor rows renders as an empty string.
    pub fn draw(&self) -> String {
        if self.header.is_empty() && self.rows.is_empty() {
            return String::new();
        }

        let columns = self.column_count.unwrap_or(0);
        let widths = self.column_widths();
        // an empty per-column array set before the count was fixed counts as unset
        let align = match &self.align {
            Some(align) if align.len() == columns => align.clone(),
            _ => vec![Align::Left; columns],
        };
        let valign = match &self.valign {
            Some(valign) if valign.len() == columns => valign.clone(),
            _ => vec![VAlign::Top; columns],
        };
        debug!(?widths, rows = self.rows.len(), "drawing table");

        let hline = self.build_hline(&widths, false);
        let mut out = String::new();

        if self.deco.border {
            out.push_str(&hline);
        }
        if !self.header.is_empty() {
            let header_align = vec![Align::Center; columns];
            let header_valign = vec![VAlign::Top; columns];
            out.push_str(&self.draw_line(&self.header, &widths, &header_align, &header_valign));
            if self.deco.header {
                out.push_str(&self.build_hline(&widths, true));
            }
        }
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&self.draw_line(row, &widths, &align, &valign));
            if self.deco.hlines && i + 1 < self.rows.len() {
                out.push_str(&hline);
            }
        }
        if self.deco.border {
            out.push_str(&hline);
        }

        out.pop();
        out
    }

    fn build_hline(&self, widths: &[usize], is_header: bool) -> String {
        let horiz = if is_header {
            &self.chars.header
        } else {
            &self.chars.horizontal
        };
        let cross = if self.deco.vlines {
            &self.chars.corner
        } else {
            horiz
        };
        let sep = format!("{horiz}{cross}{horiz}");
        let body = widths
            .iter()
            .map(|&w| horiz.repeat(w))
            .collect::<Vec<_>>()
            .join(&sep);

        if self.deco.border {
            let corner = &self.chars.corner;
            format!("{corner}{horiz}{body}{horiz}{corner}\n")
        } else {
            format!("{body}\n")
        }
    }

    fn draw_line(
        &self,
        cells: &[String],
        widths: &[usize],
        align: &[Align],
        valign: &[VAlign],
    ) -> String {
        let wrapped = wrap_row(cells, widths, valign, self.char_width);
        let height = wrapped.first().map_or(0, Vec::len);
        let column_sep = if self.deco.vlines {
            self.chars.vertical.as_str()
        } else {
            " "
        };

        let mut out = String::new();
        for line in 0..height {
            if self.deco.border {
                out.push_str(&self.chars.vertical);
                out.push(' ');
            }
            for (col, cell) in wrapped.iter().enumerate() {
                let text = &cell[line];
                let fill = widths[col].saturating_sub(visual_len(text, self.char_width));
                match align[col] {
                    Align::Right => {
                        out.push_str(&" ".repeat(fill));
                        out.push_str(text);
                    }
                    Align::Center => {
                        out.push_str(&" ".repeat(fill / 2));
                        out.push_str(text);
                        out.push_str(&" ".repeat(fill - fill / 2));
                    }
                    Align::Left => {
                        out.push_str(text);
                        out.push_str(&" ".repeat(fill));
                    }
                }
                out.push(' ');
                if col + 1 < wrapped.len() {
                    out.push_str(column_sep);
                    out.push(' ');
                }
            }
            if self.deco.border {
                out.push_str(&self.chars.vertical);
            }
            out.push('\n');
        }
        out
    }
}
