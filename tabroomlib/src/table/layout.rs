//! Column width negotiation.

use tracing::debug;

/// Horizontal space taken by separators: `"| "` before the first column,
/// `" | "` between columns and `" |"` after the last.
pub fn chrome_width(columns: usize) -> usize {
    columns * 3 + 1
}

/// Fit natural column widths into `max_width`.
///
/// `max_width == 0` disables fitting. When the natural widths do not fit,
/// every column first gets an equal share of the space left after the
/// separators. Columns that need less than their share give the slack back,
/// and the freed space is handed to the still-oversized columns in passes:
/// each pass offers every oversized column `ceil(free / oversized)` until no
/// free space is left.
pub fn fit_widths(natural: &[usize], max_width: usize) -> Vec<usize> {
    let items = natural.len();
    if items == 0 || max_width == 0 {
        return natural.to_vec();
    }

    let total: usize = natural.iter().sum();
    if total + chrome_width(items) <= max_width {
        return natural.to_vec();
    }

    let share = (max_width.saturating_sub(chrome_width(items)) / items).max(1);
    let mut widths = vec![share; items];

    let mut free: i64 = 0;
    let mut oversized: i64 = 0;
    for (col, &max_len) in natural.iter().enumerate() {
        if widths[col] > max_len {
            free += (widths[col] - max_len) as i64;
            widths[col] = max_len;
        } else if max_len > widths[col] {
            oversized += 1;
        }
    }

    while free > 0 && oversized > 0 {
        let free_part = (free + oversized - 1) / oversized;

        for (col, &max_len) in natural.iter().enumerate() {
            if widths[col] < max_len {
                let needed = (max_len - widths[col]) as i64;
                if needed <= free_part {
                    widths[col] = max_len;
                    free -= needed;
                    oversized -= 1;
                } else {
                    widths[col] += free_part as usize;
                    free -= free_part;
                }
            }
        }
    }

    debug!(?natural, ?widths, max_width, "shrunk column widths");
    widths
}
